//! Reducer: `(state, action) -> (changed, effects)`
//!
//! All state transitions happen here. No I/O; network work is returned as
//! [`Effect`]s.

use tracing::{debug, info, warn};
use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{Activation, AppState, Tab, WeatherTicket};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Directory data =====
        Action::CitiesFetch => match request_page(state) {
            Some(effect) => DispatchResult::changed_with(effect),
            None => DispatchResult::unchanged(),
        },

        Action::CitiesRetry => {
            if state.directory.catalog.failure().is_none() {
                return DispatchResult::unchanged();
            }
            info!("retrying city page after failure");
            match request_page(state) {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::unchanged(),
            }
        }

        Action::CitiesDidLoad { request, cities } => {
            let count = cities.len();
            if !state.directory.catalog.page_loaded(request, cities) {
                debug!(page = request.page, "ignoring page that is no longer in flight");
                return DispatchResult::unchanged();
            }
            if count == 0 {
                info!(total = state.directory.catalog.len(), "city dataset exhausted");
            }
            state.directory.refresh_view();

            // Keep filling until the unfiltered table is longer than the prefetch margin.
            let follow_up = if state.directory.query.search.is_empty() {
                prefetch(state)
            } else {
                None
            };
            changed_with_opt(follow_up)
        }

        Action::CitiesDidError { request, failure } => {
            if failure.retryable && request.attempt < state.retry.max_retries {
                let Some(next) = state.directory.catalog.retry(request) else {
                    return DispatchResult::unchanged();
                };
                let delay = state.retry.delay_for_attempt(request.attempt);
                warn!(
                    page = request.page,
                    attempt = next.attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %failure,
                    "retrying city page"
                );
                return DispatchResult::effect(Effect::FetchCityPage {
                    request: next,
                    delay: Some(delay),
                });
            }

            let message = format!("Failed to load cities: {}", failure.message);
            if state.directory.catalog.page_failed(request, message) {
                warn!(page = request.page, error = %failure, "giving up on city page");
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Directory view =====
        Action::DirectorySearchFocus => {
            if state.directory.search_focused {
                return DispatchResult::unchanged();
            }
            state.directory.search_focused = true;
            DispatchResult::changed()
        }

        Action::DirectorySearchBlur => {
            if !state.directory.search_focused {
                return DispatchResult::unchanged();
            }
            state.directory.search_focused = false;
            DispatchResult::changed()
        }

        Action::DirectorySearchChange(search) => {
            if state.directory.query.search == search {
                return DispatchResult::unchanged();
            }
            state.directory.query.search = search;
            state.directory.refresh_view();
            state.directory.cursor = 0;
            changed_with_opt(prefetch(state))
        }

        Action::DirectorySortToggle(key) => {
            state.directory.query.toggle_sort(key);
            state.directory.refresh_view();
            DispatchResult::changed()
        }

        Action::DirectoryCursorMove(delta) => {
            let target = state.directory.cursor.saturating_add_signed(delta);
            move_cursor(state, target)
        }

        Action::DirectoryCursorSet(row) => move_cursor(state, row),

        // ===== Navigation =====
        Action::CitySelect { name, activation } => {
            if name.trim().is_empty() {
                return DispatchResult::unchanged();
            }
            info!(city = %name, ?activation, "opening weather");
            let ticket = match activation {
                Activation::Primary => state.open_in_active(name.clone()),
                Activation::Alternate => state.open_in_new_tab(name.clone()),
            };
            DispatchResult::changed_with(fetch_weather(state, ticket, name))
        }

        Action::NavigateBack => match state.navigate_back() {
            Some(tab) => DispatchResult::changed_with(Effect::CancelWeather { tab }),
            None => DispatchResult::unchanged(),
        },

        Action::TabNext => changed_if(state.cycle_tab(true)),
        Action::TabPrev => changed_if(state.cycle_tab(false)),

        Action::TabClose => match state.close_active() {
            Some(tab) => DispatchResult::changed_with(Effect::CancelWeather { tab }),
            None => DispatchResult::unchanged(),
        },

        // ===== Weather =====
        Action::WeatherRefresh => match state.active_mut().reload() {
            Some((ticket, city)) => {
                DispatchResult::changed_with(fetch_weather(state, ticket, city))
            }
            None => DispatchResult::unchanged(),
        },

        Action::WeatherCurrentDidLoad { ticket, result } => {
            let units = state.units;
            let Some(tab) = current_tab(state, ticket) else {
                return DispatchResult::unchanged();
            };
            if let Ok(current) = &result {
                let backdrop = current.backdrop();
                debug!(
                    city = %current.name,
                    ?backdrop,
                    asset = backdrop.asset(),
                    "current conditions loaded"
                );
            }
            tab.weather.apply_current(result);

            // Forecast starts only once current conditions have settled.
            match tab.city() {
                Some(city) => DispatchResult::changed_with(Effect::FetchForecast {
                    ticket,
                    city: city.to_string(),
                    units,
                }),
                None => DispatchResult::changed(),
            }
        }

        Action::WeatherForecastDidLoad { ticket, result } => {
            let Some(tab) = current_tab(state, ticket) else {
                return DispatchResult::unchanged();
            };
            tab.weather.apply_forecast(result);
            DispatchResult::changed()
        }

        // ===== UI =====
        Action::UiToggleUnits => {
            state.units = state.units.toggle();
            info!(units = %state.units, "units changed");

            let reloads: Vec<_> = state.tabs.iter_mut().filter_map(|tab| tab.reload()).collect();
            let effects = reloads
                .into_iter()
                .map(|(ticket, city)| fetch_weather(state, ticket, city))
                .collect();
            DispatchResult::changed_with_many(effects)
        }

        // ===== Global =====
        Action::Tick => {
            state.tick_count = state.tick_count.wrapping_add(1);
            // Only re-render while a spinner is visible
            changed_if(state.is_loading())
        }

        // Handled by the runtime loop
        Action::Quit => DispatchResult::unchanged(),
    }
}

fn changed_if(changed: bool) -> DispatchResult<Effect> {
    if changed {
        DispatchResult::changed()
    } else {
        DispatchResult::unchanged()
    }
}

fn changed_with_opt(effect: Option<Effect>) -> DispatchResult<Effect> {
    match effect {
        Some(effect) => DispatchResult::changed_with(effect),
        None => DispatchResult::changed(),
    }
}

fn request_page(state: &mut AppState) -> Option<Effect> {
    let request = state.directory.catalog.request_next_page()?;
    debug!(page = request.page, "requesting city page");
    Some(Effect::FetchCityPage {
        request,
        delay: None,
    })
}

/// Request the next page if the cursor is near the end of the view.
fn prefetch(state: &mut AppState) -> Option<Effect> {
    if !state.directory.near_end(state.prefetch_margin) {
        return None;
    }
    request_page(state)
}

fn move_cursor(state: &mut AppState, target: usize) -> DispatchResult<Effect> {
    let last = state.directory.visible.len().saturating_sub(1);
    let target = target.min(last);
    let moved = target != state.directory.cursor;
    state.directory.cursor = target;

    let follow_up = prefetch(state);
    if moved || follow_up.is_some() {
        changed_with_opt(follow_up)
    } else {
        DispatchResult::unchanged()
    }
}

fn fetch_weather(state: &AppState, ticket: WeatherTicket, city: String) -> Effect {
    Effect::FetchWeather {
        ticket,
        city,
        units: state.units,
    }
}

/// The tab a ticket belongs to, if the ticket is still current.
fn current_tab(state: &mut AppState, ticket: WeatherTicket) -> Option<&mut Tab> {
    let tab = state.tab_mut(ticket.tab);
    match tab {
        Some(tab) if tab.generation == ticket.generation => Some(tab),
        Some(tab) => {
            debug!(
                tab = ticket.tab,
                stale = ticket.generation,
                current = tab.generation,
                "dropping stale weather result"
            );
            None
        }
        None => {
            debug!(tab = ticket.tab, "dropping weather result for closed tab");
            None
        }
    }
}
