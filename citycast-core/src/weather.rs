//! Weather snapshot model and presentation rules

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ApiFailure;

/// Shown when the current-conditions request fails.
pub const WEATHER_FETCH_FAILED: &str = "Failed to fetch weather data";

/// Shown when the forecast request fails.
pub const FORECAST_FETCH_FAILED: &str = "Failed to fetch forecast data";

/// Forecast entries rendered at most.
pub const FORECAST_LIMIT: usize = 5;

/// Measurement system sent to the provider as `units=`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_query(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Units::Metric => Units::Imperial,
            Units::Imperial => Units::Metric,
        }
    }

    pub fn temperature_suffix(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn speed_suffix(self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }

    pub fn format_temperature(self, value: f64) -> String {
        format!("{:.1}{}", value, self.temperature_suffix())
    }

    /// Temperature in Celsius, for colouring.
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            Units::Metric => value,
            Units::Imperial => (value - 32.0) * 5.0 / 9.0,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Units::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Units::Imperial),
            other => Err(format!("unknown units '{other}' (expected metric or imperial)")),
        }
    }
}

/// Current conditions for one city.
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentConditions {
    /// City name as the provider spells it.
    pub name: String,
    pub description: String,
    pub icon: String,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Percent.
    pub humidity: f64,
    pub wind_speed: f64,
    /// hPa.
    pub pressure: f64,
}

impl CurrentConditions {
    pub fn backdrop(&self) -> Backdrop {
        select_background(&self.description)
    }
}

/// One 3-hour forecast slot.
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastEntry {
    /// Provider `dt_txt`, e.g. `2024-05-01 12:00:00`.
    pub timestamp: String,
    pub description: String,
    pub icon: String,
    pub temp_min: f64,
    pub temp_max: f64,
}

impl ForecastEntry {
    pub fn date_label(&self) -> String {
        format_forecast_date(&self.timestamp)
    }
}

/// Background theme picked from the current weather description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backdrop {
    ClearSky,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    None,
}

impl Backdrop {
    /// Background image of the backdrop; empty for [`Backdrop::None`].
    pub fn asset(self) -> &'static str {
        match self {
            Backdrop::ClearSky => "https://media.istockphoto.com/id/1188520316/photo/landscape-of-the-clear-sky.jpg?s=612x612&w=0&k=20&c=Vnk6XNgITN9AkTk7KMSdYZG7Olk4rAIvJNpm_nCM7t0",
            Backdrop::Clouds => "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSPmLZt9KxMo2xsoyRpyzx6mZmjdKvD5AMz4w&s",
            Backdrop::Rain => "https://t4.ftcdn.net/jpg/01/59/19/81/360_F_159198166_N6hs0y3lnoeWm6uiaBgHgpYZf3xjQNke.jpg",
            Backdrop::Snow => "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcRjacAoEWVClJrz3AEv4L4MEP57K0sE9Gn_VQ&s",
            Backdrop::Thunderstorm => "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSnJcLWr0N8mVPMdHQC4Xxbi5XrbFqCr8-7xQ&s",
            Backdrop::None => "",
        }
    }
}

/// Case-insensitive exact lookup. Unknown descriptions give [`Backdrop::None`].
pub fn select_background(description: &str) -> Backdrop {
    match description.to_lowercase().as_str() {
        "clear sky" => Backdrop::ClearSky,
        "few clouds" | "scattered clouds" | "broken clouds" => Backdrop::Clouds,
        "rain" | "shower rain" => Backdrop::Rain,
        "snow" => Backdrop::Snow,
        "thunderstorm" => Backdrop::Thunderstorm,
        _ => Backdrop::None,
    }
}

/// Glyph for an OpenWeatherMap icon id (`01d`, `10n`, ...).
pub fn icon_glyph(icon: &str) -> &'static str {
    let night = icon.ends_with('n');
    match icon.get(..2) {
        Some("01") if night => "☾",
        Some("01") => "☀",
        Some("02") => "⛅",
        Some("03") | Some("04") => "☁",
        Some("09") => "🌧",
        Some("10") => "🌦",
        Some("11") => "⛈",
        Some("13") => "❄",
        Some("50") => "🌫",
        _ => "?",
    }
}

/// Format a provider `dt_txt` for display. Unparseable input is shown as-is.
pub fn format_forecast_date(dt_txt: &str) -> String {
    NaiveDateTime::parse_from_str(dt_txt, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.format("%a %d %b %H:%M").to_string())
        .unwrap_or_else(|_| dt_txt.to_string())
}

/// Weather state of one detail view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeatherView {
    pub loading: bool,
    pub current: Option<CurrentConditions>,
    pub forecast: Option<Vec<ForecastEntry>>,
    pub error: Option<String>,
}

/// What the detail view shows. The states are mutually exclusive.
#[derive(Debug, PartialEq)]
pub enum Presentation<'a> {
    Loading,
    Error(&'a str),
    Ready {
        current: &'a CurrentConditions,
        forecast: &'a [ForecastEntry],
    },
}

impl WeatherView {
    /// Fresh view with a fetch in progress.
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Record the current-conditions result. Loading stays on until the forecast lands.
    pub fn apply_current(&mut self, result: Result<CurrentConditions, ApiFailure>) {
        match result {
            Ok(current) => self.current = Some(current),
            Err(_) => self.error = Some(WEATHER_FETCH_FAILED.to_string()),
        }
    }

    /// Record the forecast result and end the fetch.
    pub fn apply_forecast(&mut self, result: Result<Vec<ForecastEntry>, ApiFailure>) {
        match result {
            Ok(forecast) => self.forecast = Some(forecast),
            Err(_) => self.error = Some(FORECAST_FETCH_FAILED.to_string()),
        }
        self.loading = false;
    }

    /// A view with no conditions and no error has nothing to show yet and
    /// reads as loading.
    pub fn presentation(&self) -> Presentation<'_> {
        if self.loading {
            return Presentation::Loading;
        }
        match (self.error.as_deref(), self.current.as_ref()) {
            (Some(error), _) => Presentation::Error(error),
            (None, Some(current)) => {
                let forecast = self
                    .forecast
                    .as_deref()
                    .map(|entries| &entries[..entries.len().min(FORECAST_LIMIT)])
                    .unwrap_or(&[]);
                Presentation::Ready { current, forecast }
            }
            (None, None) => Presentation::Loading,
        }
    }
}
