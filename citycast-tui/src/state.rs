//! Application state, the single source of truth
//!
//! Components receive `&AppState` (or slices of it) as props. Only the
//! reducer mutates it.

use citycast_core::config::RetryConfig;
use citycast_core::directory::derive_view;
use citycast_core::weather::FORECAST_LIMIT;
use citycast_core::{CityDirectory, CityRecord, Config, DirectoryQuery, Units, WeatherView};

pub type TabId = u64;

/// Identifies which navigation a weather result belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WeatherTicket {
    pub tab: TabId,
    pub generation: u64,
}

/// How a row was activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// Navigate the current tab
    Primary,
    /// Open in a new tab, keep the current one
    Alternate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Directory,
    Weather { city: String },
}

/// One view context: a route and its own weather state.
#[derive(Clone, Debug, PartialEq)]
pub struct Tab {
    pub id: TabId,
    pub route: Route,
    /// Bumped on every navigation; results for older generations are dropped
    pub generation: u64,
    pub weather: WeatherView,
}

impl Tab {
    pub fn new(id: TabId, route: Route) -> Self {
        let weather = match route {
            Route::Weather { .. } => WeatherView::loading(),
            Route::Directory => WeatherView::default(),
        };
        Self {
            id,
            route,
            generation: 0,
            weather,
        }
    }

    pub fn ticket(&self) -> WeatherTicket {
        WeatherTicket {
            tab: self.id,
            generation: self.generation,
        }
    }

    pub fn city(&self) -> Option<&str> {
        match &self.route {
            Route::Weather { city } => Some(city),
            Route::Directory => None,
        }
    }

    pub fn title(&self) -> &str {
        self.city().unwrap_or("Cities")
    }

    /// Switch route. Any weather fetch for the old route becomes stale.
    pub fn navigate(&mut self, route: Route) {
        self.generation += 1;
        self.weather = match route {
            Route::Weather { .. } => WeatherView::loading(),
            Route::Directory => WeatherView::default(),
        };
        self.route = route;
    }

    /// Start a fresh fetch of the current city. `None` on the directory route.
    pub fn reload(&mut self) -> Option<(WeatherTicket, String)> {
        let city = self.city()?.to_string();
        self.generation += 1;
        self.weather = WeatherView::loading();
        Some((self.ticket(), city))
    }
}

/// Accumulated cities plus what the table shows of them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectoryState {
    pub catalog: CityDirectory,
    pub query: DirectoryQuery,
    /// Indices into `catalog.cities()`, filtered then sorted
    pub visible: Vec<usize>,
    pub cursor: usize,
    pub search_focused: bool,
}

impl DirectoryState {
    /// Recompute `visible` from the catalog and query.
    ///
    /// The cursor follows the highlighted city to its new row. If that city is
    /// no longer visible the cursor is clamped instead.
    pub fn refresh_view(&mut self) {
        let highlighted = self.visible.get(self.cursor).copied();
        self.visible = derive_view(self.catalog.cities(), &self.query);
        self.cursor = highlighted
            .and_then(|index| self.visible.iter().position(|&i| i == index))
            .unwrap_or_else(|| self.cursor.min(self.visible.len().saturating_sub(1)));
    }

    pub fn visible_city(&self, row: usize) -> Option<&CityRecord> {
        self.visible
            .get(row)
            .and_then(|&i| self.catalog.cities().get(i))
    }

    pub fn selected(&self) -> Option<&CityRecord> {
        self.visible_city(self.cursor)
    }

    /// Whether the cursor is within `margin` rows of the end of the view.
    pub fn near_end(&self, margin: usize) -> bool {
        self.cursor + margin >= self.visible.len()
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    /// Shared by every tab on the directory route
    pub directory: DirectoryState,
    pub tabs: Vec<Tab>,
    pub active_tab: usize,
    pub next_tab_id: TabId,
    pub units: Units,
    pub retry: RetryConfig,
    pub prefetch_margin: usize,
    pub forecast_entries: usize,
    /// Animation frame counter for spinners
    pub tick_count: u32,
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            directory: DirectoryState::default(),
            tabs: vec![Tab::new(0, Route::Directory)],
            active_tab: 0,
            next_tab_id: 1,
            units: config.display.units,
            retry: config.retry.clone(),
            prefetch_margin: config.display.prefetch_margin,
            forecast_entries: config.display.forecast_entries.min(FORECAST_LIMIT),
            tick_count: 0,
        }
    }

    pub fn active(&self) -> &Tab {
        &self.tabs[self.active_tab]
    }

    pub fn active_mut(&mut self) -> &mut Tab {
        &mut self.tabs[self.active_tab]
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.id == id)
    }

    /// Navigate the active tab to `city`.
    pub fn open_in_active(&mut self, city: impl Into<String>) -> WeatherTicket {
        let tab = self.active_mut();
        tab.navigate(Route::Weather { city: city.into() });
        tab.ticket()
    }

    /// Open `city` in a new tab placed after the active one. The active tab is unchanged.
    pub fn open_in_new_tab(&mut self, city: impl Into<String>) -> WeatherTicket {
        let id = self.next_tab_id;
        self.next_tab_id += 1;

        let tab = Tab::new(id, Route::Weather { city: city.into() });
        let ticket = tab.ticket();
        self.tabs.insert(self.active_tab + 1, tab);
        ticket
    }

    /// Return the active tab to the directory. Returns its id if it left a weather view.
    pub fn navigate_back(&mut self) -> Option<TabId> {
        let tab = self.active_mut();
        if tab.route == Route::Directory {
            return None;
        }
        tab.navigate(Route::Directory);
        Some(tab.id)
    }

    /// Close the active tab unless it is the last one. Returns the closed id.
    pub fn close_active(&mut self) -> Option<TabId> {
        if self.tabs.len() <= 1 {
            return None;
        }
        let closed = self.tabs.remove(self.active_tab);
        self.active_tab = self.active_tab.min(self.tabs.len() - 1);
        Some(closed.id)
    }

    pub fn cycle_tab(&mut self, forward: bool) -> bool {
        let len = self.tabs.len();
        if len <= 1 {
            return false;
        }
        self.active_tab = if forward {
            (self.active_tab + 1) % len
        } else {
            (self.active_tab + len - 1) % len
        };
        true
    }

    /// Whether anything on screen is animating.
    pub fn is_loading(&self) -> bool {
        match self.active().route {
            Route::Directory => self.directory.catalog.is_loading(),
            Route::Weather { .. } => self.active().weather.loading,
        }
    }
}
