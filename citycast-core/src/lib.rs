//! Core logic for citycast
//!
//! Everything here is terminal-agnostic:
//!
//! - [`city`] - dataset records and country normalization
//! - [`directory`] - paged accumulation and the filtered/sorted view
//! - [`weather`] - weather snapshot, backdrop lookup and presentation states
//! - [`api`] - HTTP clients for the dataset and OpenWeatherMap
//! - [`config`] - `config.toml` plus environment overrides
//! - [`error`] - error types

pub mod api;
pub mod city;
pub mod config;
pub mod directory;
pub mod error;
pub mod weather;

pub use city::CityRecord;
pub use config::Config;
pub use directory::{
    derive_view, CityDirectory, DirectoryQuery, PageRequest, SortDirection, SortKey,
};
pub use error::{ApiError, ApiFailure, ConfigError};
pub use weather::{CurrentConditions, ForecastEntry, Units, WeatherView};
