//! Configuration loaded from `config.toml`, overlaid by the environment

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::weather::{Units, FORECAST_LIMIT};

pub const DEFAULT_DATASET_URL: &str = "https://public.opendatasoft.com";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org";

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const UNITS_ENV: &str = "CITYCAST_UNITS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub display: DisplayConfig,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the OpenDataSoft instance serving the city dataset
    pub dataset_url: String,

    /// Base URL of the OpenWeatherMap API
    pub weather_url: String,

    /// OpenWeatherMap key. Prefer the environment over writing it here.
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub units: Units,

    /// Forecast entries to show, at most 5
    pub forecast_entries: usize,

    /// Rows from the end of the table at which the next page is requested
    pub prefetch_margin: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            units: Units::Metric,
            forecast_entries: FORECAST_LIMIT,
            prefetch_margin: 10,
        }
    }
}

/// Backoff for failed directory page loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 8000,
        }
    }
}

impl RetryConfig {
    /// `initial_delay * 2^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = self.initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }
}

impl Config {
    /// `{config_dir}/citycast/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("citycast").join("config.toml"))
    }

    /// Load from `path`, or from [`Config::default_path`] when it exists.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path)?,
                _ => {
                    tracing::debug!("no config file, using defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Apply `OPENWEATHER_API_KEY` and `CITYCAST_UNITS` from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api.api_key = Some(key.trim().to_string());
        }
        if let Some(units) = lookup(UNITS_ENV) {
            self.display.units = units
                .parse()
                .map_err(|message| ConfigError::Invalid {
                    field: UNITS_ENV,
                    message,
                })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "api.timeout_secs",
                message: "must be at least 1".into(),
            });
        }
        if self.display.forecast_entries == 0 || self.display.forecast_entries > FORECAST_LIMIT {
            return Err(ConfigError::Invalid {
                field: "display.forecast_entries",
                message: format!("must be between 1 and {FORECAST_LIMIT}"),
            });
        }
        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::Invalid {
                field: "retry.initial_delay_ms",
                message: "must not exceed retry.max_delay_ms".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
            [api]
            api_key = "abc"

            [display]
            units = "imperial"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.api_key.as_deref(), Some("abc"));
        assert_eq!(config.api.dataset_url, DEFAULT_DATASET_URL);
        assert_eq!(config.display.units, Units::Imperial);
        assert_eq!(config.display.prefetch_margin, 10);
        assert_eq!(config.retry, RetryConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.api.api_key = Some("from-file".into());

        config
            .apply_env_from(|name| match name {
                API_KEY_ENV => Some("from-env".into()),
                UNITS_ENV => Some("imperial".into()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.api.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.display.units, Units::Imperial);
    }

    #[test]
    fn test_bad_units_env() {
        let mut config = Config::default();
        let err = config
            .apply_env_from(|name| (name == UNITS_ENV).then(|| "kelvin".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: UNITS_ENV, .. }));
    }

    #[test]
    fn test_forecast_entries_capped() {
        let mut config = Config::default();
        config.display.forecast_entries = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_delay_for_attempt() {
        let retry = RetryConfig::default();
        assert_eq!(retry.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(retry.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(retry.delay_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(retry.delay_for_attempt(10), Duration::from_millis(8000));
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let err = Config::load(Some(Path::new("/nonexistent/citycast.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
