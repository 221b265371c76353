//! Root UI: tab bar, the active tab's view, help bar

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};
use tui_dispatch::{EventKind, EventOutcome};

use crate::action::Action;
use crate::components::{
    Component, DirectoryView, DirectoryViewProps, HelpBar, HelpBarProps, HelpContext, TabBar,
    TabBarProps, WeatherPage, WeatherPageProps,
};
use crate::state::{AppState, Route};

/// Owns the components and their view-only state.
#[derive(Default)]
pub struct CitycastUi {
    tab_bar: TabBar,
    directory: DirectoryView,
    weather: WeatherPage,
    help: HelpBar,
}

impl CitycastUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let [tabs_area, body_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        self.tab_bar.render(
            frame,
            tabs_area,
            TabBarProps {
                tabs: &state.tabs,
                active: state.active_tab,
            },
        );

        let tab = state.active();
        let context = match tab.route {
            Route::Directory => {
                self.directory.render(
                    frame,
                    body_area,
                    DirectoryViewProps {
                        directory: &state.directory,
                        tick_count: state.tick_count,
                    },
                );
                if state.directory.search_focused {
                    HelpContext::Search
                } else {
                    HelpContext::Directory
                }
            }
            Route::Weather { .. } => {
                self.weather.render(
                    frame,
                    body_area,
                    WeatherPageProps {
                        tab,
                        units: state.units,
                        forecast_entries: state.forecast_entries,
                        tick_count: state.tick_count,
                    },
                );
                HelpContext::Weather
            }
        };

        self.help.render(
            frame,
            help_area,
            HelpBarProps {
                context,
                has_tabs: state.tabs.len() > 1,
            },
        );
    }

    /// Global keys first, then the active view.
    pub fn map_event(&mut self, event: &EventKind, state: &AppState) -> EventOutcome<Action> {
        if let EventKind::Key(key) = event {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return EventOutcome::action(Action::Quit);
            }

            let typing = state.active().route == Route::Directory && state.directory.search_focused;
            if !typing {
                let global = match key.code {
                    KeyCode::Char('q') => Some(Action::Quit),
                    KeyCode::Tab => Some(Action::TabNext),
                    KeyCode::BackTab => Some(Action::TabPrev),
                    KeyCode::Char('x') => Some(Action::TabClose),
                    KeyCode::Char('u') => Some(Action::UiToggleUnits),
                    _ => None,
                };
                if let Some(action) = global {
                    return EventOutcome::action(action);
                }
            }
        }

        if let EventKind::Resize(..) = event {
            return EventOutcome::needs_render();
        }

        let tab = state.active();
        match tab.route {
            Route::Directory => EventOutcome::actions(self.directory.handle_event(
                event,
                DirectoryViewProps {
                    directory: &state.directory,
                    tick_count: state.tick_count,
                },
            )),
            Route::Weather { .. } => EventOutcome::actions(self.weather.handle_event(
                event,
                WeatherPageProps {
                    tab,
                    units: state.units,
                    forecast_entries: state.forecast_entries,
                    tick_count: state.tick_count,
                },
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Activation;
    use citycast_core::CityRecord;
    use tui_dispatch::testing::{key, RenderHarness};

    fn actions(ui: &mut CitycastUi, state: &AppState, k: &str) -> Vec<Action> {
        ui.map_event(&EventKind::Key(key(k)), state).actions
    }

    fn with_cities() -> AppState {
        let mut state = AppState::default();
        let request = state.directory.catalog.request_next_page().unwrap();
        state.directory.catalog.page_loaded(
            request,
            vec![
                CityRecord::new("Bergen", "Norway", "Europe/Oslo", 285_000),
                CityRecord::new("Aarhus", "Denmark", "Europe/Copenhagen", 280_000),
            ],
        );
        state.directory.refresh_view();
        state
    }

    #[test]
    fn test_global_keys() {
        let mut ui = CitycastUi::new();
        let state = AppState::default();
        assert_eq!(actions(&mut ui, &state, "q"), vec![Action::Quit]);
        assert_eq!(actions(&mut ui, &state, "ctrl+c"), vec![Action::Quit]);
        assert_eq!(actions(&mut ui, &state, "tab"), vec![Action::TabNext]);
        assert_eq!(actions(&mut ui, &state, "shift+tab"), vec![Action::TabPrev]);
        assert_eq!(actions(&mut ui, &state, "u"), vec![Action::UiToggleUnits]);
    }

    #[test]
    fn test_search_swallows_global_keys() {
        let mut ui = CitycastUi::new();
        let mut state = AppState::default();
        state.directory.search_focused = true;

        assert_eq!(
            actions(&mut ui, &state, "q"),
            vec![Action::DirectorySearchChange("q".into())]
        );
        assert_eq!(actions(&mut ui, &state, "ctrl+c"), vec![Action::Quit]);
    }

    #[test]
    fn test_enter_opens_selected_city() {
        let mut ui = CitycastUi::new();
        let state = with_cities();
        assert_eq!(
            actions(&mut ui, &state, "enter"),
            vec![Action::CitySelect {
                name: "Aarhus".into(),
                activation: Activation::Primary,
            }]
        );
    }

    #[test]
    fn test_weather_route_keys() {
        let mut ui = CitycastUi::new();
        let mut state = AppState::default();
        state.open_in_active("Paris");
        assert_eq!(actions(&mut ui, &state, "esc"), vec![Action::NavigateBack]);
        assert_eq!(actions(&mut ui, &state, "r"), vec![Action::WeatherRefresh]);
    }

    #[test]
    fn test_render_switches_on_route() {
        let mut ui = CitycastUi::new();
        let mut state = with_cities();
        let mut harness = RenderHarness::new(80, 16);

        let out = harness.render_to_string_plain(|frame| ui.render(frame, frame.area(), &state));
        assert!(out.contains("1:Cities"));
        assert!(out.contains("Aarhus"));
        assert!(out.contains("/ search"));

        state.open_in_active("Bergen");
        let out = harness.render_to_string_plain(|frame| ui.render(frame, frame.area(), &state));
        assert!(out.contains("1:Bergen"));
        assert!(out.contains("Fetching weather for Bergen"));
        assert!(out.contains("r refresh"));
    }
}
