use reqwest::Client;
use serde::Deserialize;

use super::decode;
use crate::error::ApiError;
use crate::weather::{CurrentConditions, ForecastEntry, Units};

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    #[serde(default)]
    humidity: f64,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    weather: Vec<Condition>,
    main: Main,
    #[serde(default)]
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastSlot>,
}

#[derive(Debug, Deserialize)]
struct ForecastSlot {
    dt_txt: String,
    weather: Vec<Condition>,
    main: Main,
}

fn first_condition(conditions: Vec<Condition>) -> Result<Condition, ApiError> {
    conditions
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Decode("response has no weather conditions".into()))
}

impl TryFrom<CurrentResponse> for CurrentConditions {
    type Error = ApiError;

    fn try_from(data: CurrentResponse) -> Result<Self, Self::Error> {
        let condition = first_condition(data.weather)?;
        Ok(CurrentConditions {
            name: data.name,
            description: condition.description,
            icon: condition.icon,
            temperature: data.main.temp,
            temp_min: data.main.temp_min,
            temp_max: data.main.temp_max,
            humidity: data.main.humidity,
            wind_speed: data.wind.speed,
            pressure: data.main.pressure,
        })
    }
}

impl TryFrom<ForecastSlot> for ForecastEntry {
    type Error = ApiError;

    fn try_from(slot: ForecastSlot) -> Result<Self, Self::Error> {
        let condition = first_condition(slot.weather)?;
        Ok(ForecastEntry {
            timestamp: slot.dt_txt,
            description: condition.description,
            icon: condition.icon,
            temp_min: slot.main.temp_min,
            temp_max: slot.main.temp_max,
        })
    }
}

/// OpenWeatherMap 2.5 client (current weather and 5 day / 3 hour forecast).
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn url(&self, endpoint: &str, city: &str, units: Units) -> Result<String, ApiError> {
        let api_key = self.api_key.as_deref().ok_or(ApiError::MissingApiKey)?;
        Ok(format!(
            "{}/data/2.5/{}?q={}&appid={}&units={}",
            self.base_url,
            endpoint,
            urlencoding::encode(city),
            urlencoding::encode(api_key),
            units.as_query()
        ))
    }

    pub async fn current(&self, city: &str, units: Units) -> Result<CurrentConditions, ApiError> {
        let url = self.url("weather", city, units)?;
        tracing::debug!(city, "fetching current weather");

        let response = self.client.get(&url).send().await?;
        let data: CurrentResponse = decode(response).await?;
        CurrentConditions::try_from(data)
    }

    pub async fn forecast(&self, city: &str, units: Units) -> Result<Vec<ForecastEntry>, ApiError> {
        let url = self.url("forecast", city, units)?;
        tracing::debug!(city, "fetching forecast");

        let response = self.client.get(&url).send().await?;
        let data: ForecastResponse = decode(response).await?;
        data.list.into_iter().map(ForecastEntry::try_from).collect()
    }
}
