//! HTTP clients for the city dataset and the weather provider

mod dataset;
mod openweather;

pub use dataset::{DatasetClient, DATASET_ID};
pub use openweather::WeatherClient;

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;

/// Shared client with a per-request timeout.
pub fn http_client(timeout: Duration) -> Result<Client, ApiError> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("citycast/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Error payload both providers use (`{"cod": "404", "message": "city not found"}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Decode a 2xx body as `T`, or turn anything else into [`ApiError::Status`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}
