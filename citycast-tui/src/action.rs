//! Actions
//!
//! Naming: the prefix names the area (`Cities`, `Directory`, `Weather`,
//! `Tab`, `Ui`), `Did` marks the result of an async task, the verb comes last.

use citycast_core::{ApiFailure, CityRecord, CurrentConditions, ForecastEntry, PageRequest, SortKey};

use crate::state::{Activation, WeatherTicket};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq)]
#[action(infer_categories)]
pub enum Action {
    // ===== Directory data =====
    /// Intent: load the next dataset page if none is in flight
    CitiesFetch,

    /// Intent: retry after a permanently failed page
    CitiesRetry,

    /// Result: a page arrived (empty means exhausted)
    CitiesDidLoad {
        request: PageRequest,
        cities: Vec<CityRecord>,
    },

    /// Result: a page request failed
    CitiesDidError {
        request: PageRequest,
        failure: ApiFailure,
    },

    // ===== Directory view =====
    DirectorySearchFocus,
    DirectorySearchBlur,
    DirectorySearchChange(String),
    DirectorySortToggle(SortKey),

    /// Move the cursor by a number of rows
    DirectoryCursorMove(isize),

    /// Put the cursor on a row (clamped to the visible rows)
    DirectoryCursorSet(usize),

    // ===== Navigation =====
    CitySelect {
        name: String,
        activation: Activation,
    },
    NavigateBack,
    TabNext,
    TabPrev,
    TabClose,

    // ===== Weather =====
    /// Intent: re-fetch the active tab's city
    WeatherRefresh,

    /// Result: current conditions for a ticket
    WeatherCurrentDidLoad {
        ticket: WeatherTicket,
        result: Result<CurrentConditions, ApiFailure>,
    },

    /// Result: forecast for a ticket; ends the fetch
    WeatherForecastDidLoad {
        ticket: WeatherTicket,
        result: Result<Vec<ForecastEntry>, ApiFailure>,
    },

    // ===== UI =====
    /// Switch metric/imperial and re-fetch open weather views
    UiToggleUnits,

    // ===== Global =====
    /// Spinner animation tick
    Tick,
    Quit,
}
