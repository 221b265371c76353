//! Effects declared by the reducer and the handler that runs them
//!
//! The reducer stays synchronous; every network call happens in a task
//! spawned here, and comes back as a `*Did*` action.

use std::time::Duration;

use citycast_core::api::{DatasetClient, WeatherClient};
use citycast_core::{ApiFailure, PageRequest, Units};
use tui_dispatch::{TaskKey, TaskManager};

use crate::action::Action;
use crate::state::{TabId, WeatherTicket};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Load one dataset page, optionally after a backoff delay
    FetchCityPage {
        request: PageRequest,
        delay: Option<Duration>,
    },

    /// Fetch current conditions for one tab
    FetchWeather {
        ticket: WeatherTicket,
        city: String,
        units: Units,
    },

    /// Fetch the forecast once current conditions have settled
    FetchForecast {
        ticket: WeatherTicket,
        city: String,
        units: Units,
    },

    /// Abort whatever weather fetch a tab has in flight
    CancelWeather { tab: TabId },
}

/// Clients the effect handler talks to.
#[derive(Debug, Clone)]
pub struct Services {
    pub cities: DatasetClient,
    pub weather: WeatherClient,
}

pub const CITIES_TASK: &str = "cities";

/// Both weather requests of a tab share one key, so a new fetch or a
/// cancel aborts either stage.
pub fn weather_task(tab: TabId) -> TaskKey {
    TaskKey::new(format!("weather:{tab}"))
}

pub fn handle_effect(effect: Effect, tasks: &mut TaskManager<Action>, services: &Services) {
    match effect {
        Effect::FetchCityPage { request, delay } => {
            let client = services.cities.clone();
            let task = async move {
                match client.fetch_page(request).await {
                    Ok(cities) => Action::CitiesDidLoad { request, cities },
                    Err(e) => {
                        tracing::warn!(
                            page = request.page,
                            attempt = request.attempt,
                            error = %e,
                            "city page failed"
                        );
                        Action::CitiesDidError {
                            request,
                            failure: ApiFailure::from(&e),
                        }
                    }
                }
            };
            match delay {
                Some(delay) => tasks.debounce(CITIES_TASK, delay, task),
                None => tasks.spawn(CITIES_TASK, task),
            };
        }

        Effect::FetchWeather {
            ticket,
            city,
            units,
        } => {
            let client = services.weather.clone();
            tasks.spawn(weather_task(ticket.tab), async move {
                let result = client.current(&city, units).await.map_err(|e| {
                    tracing::warn!(city = %city, error = %e, "current weather failed");
                    ApiFailure::from(&e)
                });
                if result.is_ok() {
                    tracing::info!(city = %city, "current weather loaded");
                }
                Action::WeatherCurrentDidLoad { ticket, result }
            });
        }

        Effect::FetchForecast {
            ticket,
            city,
            units,
        } => {
            let client = services.weather.clone();
            tasks.spawn(weather_task(ticket.tab), async move {
                let result = client.forecast(&city, units).await.map_err(|e| {
                    tracing::warn!(city = %city, error = %e, "forecast failed");
                    ApiFailure::from(&e)
                });
                Action::WeatherForecastDidLoad { ticket, result }
            });
        }

        Effect::CancelWeather { tab } => {
            tasks.cancel(&weather_task(tab));
        }
    }
}
