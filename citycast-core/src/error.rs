//! Error types for provider access and configuration

use std::path::PathBuf;

use thiserror::Error;

/// Failure while talking to the city dataset or the weather provider.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider answered {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("no weather API key configured (set OPENWEATHER_API_KEY or pass --api-key)")]
    MissingApiKey,
}

impl ApiError {
    /// Whether repeating the same request may succeed.
    ///
    /// Timeouts, connection failures, 5xx, 408 and 429 are transient.
    /// Everything else (bad key, unknown city, malformed payload) is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Request(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                e.status()
                    .map(|s| is_retryable_status(s.as_u16()))
                    .unwrap_or(false)
            }
            ApiError::Status { status, .. } => is_retryable_status(*status),
            ApiError::Decode(_) | ApiError::MissingApiKey => false,
        }
    }
}

fn is_retryable_status(status: u16) -> bool {
    status >= 500 || status == 408 || status == 429
}

/// Cloneable summary of an [`ApiError`], carried inside result actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiFailure {
    pub message: String,
    pub retryable: bool,
}

impl ApiFailure {
    pub fn new(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            message: message.into(),
            retryable,
        }
    }
}

impl From<&ApiError> for ApiFailure {
    fn from(error: &ApiError) -> Self {
        Self {
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }
}

impl From<ApiError> for ApiFailure {
    fn from(error: ApiError) -> Self {
        Self::from(&error)
    }
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Failure while loading `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let server = ApiError::Status {
            status: 503,
            message: "unavailable".into(),
        };
        let throttled = ApiError::Status {
            status: 429,
            message: "slow down".into(),
        };
        let unknown_city = ApiError::Status {
            status: 404,
            message: "city not found".into(),
        };

        assert!(server.is_retryable());
        assert!(throttled.is_retryable());
        assert!(!unknown_city.is_retryable());
        assert!(!ApiError::MissingApiKey.is_retryable());
        assert!(!ApiError::Decode("bad".into()).is_retryable());
    }

    #[test]
    fn test_failure_from_error() {
        let failure = ApiFailure::from(ApiError::Status {
            status: 502,
            message: "bad gateway".into(),
        });
        assert!(failure.retryable);
        assert_eq!(failure.message, "provider answered 502: bad gateway");
    }
}
