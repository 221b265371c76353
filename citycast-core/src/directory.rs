//! City directory: paged accumulation plus the filtered, sorted view
//!
//! The directory only ever grows. What the user sees is derived from it
//! by [`derive_view`], a pure function of the accumulated records and the
//! current [`DirectoryQuery`]: filter first, then a stable sort of the
//! filter output.

use std::cmp::Ordering;

use crate::city::CityRecord;

/// Records requested per dataset page.
pub const PAGE_SIZE: usize = 100;

/// Column the directory is sorted by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    Name,
    Country,
    Timezone,
    Population,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Name,
        SortKey::Country,
        SortKey::Timezone,
        SortKey::Population,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "City Name",
            SortKey::Country => "Country",
            SortKey::Timezone => "Timezone",
            SortKey::Population => "Population",
        }
    }

    fn compare(self, a: &CityRecord, b: &CityRecord) -> Ordering {
        match self {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Country => a.country.cmp(&b.country),
            SortKey::Timezone => a.timezone.cmp(&b.timezone),
            SortKey::Population => a.population.cmp(&b.population),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Inputs of the derived directory view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryQuery {
    pub search: String,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl DirectoryQuery {
    /// Reselecting the active key flips the direction; a new key starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.direction = self.direction.flip();
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Case-insensitive substring match. An empty needle matches everything.
pub fn matches_search(name: &str, search: &str) -> bool {
    search.is_empty() || name.to_lowercase().contains(&search.to_lowercase())
}

/// Indices of `cities` whose name matches `search`, in input order.
pub fn apply_filter(cities: &[CityRecord], search: &str) -> Vec<usize> {
    cities
        .iter()
        .enumerate()
        .filter(|(_, city)| matches_search(&city.name, search))
        .map(|(i, _)| i)
        .collect()
}

/// Stable sort of `indices` by the given column.
///
/// Descending reverses the comparator, so equal keys keep their input
/// order in both directions.
pub fn apply_sort(
    cities: &[CityRecord],
    indices: &mut [usize],
    key: SortKey,
    direction: SortDirection,
) {
    indices.sort_by(|&a, &b| {
        let ordering = key.compare(&cities[a], &cities[b]);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// `sort(filter(cities, search), key, direction)` as indices into `cities`.
pub fn derive_view(cities: &[CityRecord], query: &DirectoryQuery) -> Vec<usize> {
    let mut indices = apply_filter(cities, &query.search);
    apply_sort(cities, &mut indices, query.sort_key, query.direction);
    indices
}

/// A page request, identified by page number and retry attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub attempt: u32,
}

impl PageRequest {
    pub fn first_attempt(page: usize) -> Self {
        Self { page, attempt: 0 }
    }

    pub fn offset(&self) -> usize {
        self.page * PAGE_SIZE
    }

    pub fn next_attempt(&self) -> Self {
        Self {
            page: self.page,
            attempt: self.attempt + 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum PageLoad {
    #[default]
    Idle,
    InFlight(PageRequest),
    Failed(String),
}

/// Accumulated dataset pages and the pagination cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CityDirectory {
    cities: Vec<CityRecord>,
    next_page: usize,
    has_more: bool,
    load: PageLoad,
}

impl Default for CityDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl CityDirectory {
    pub fn new() -> Self {
        Self {
            cities: Vec::new(),
            next_page: 0,
            has_more: true,
            load: PageLoad::Idle,
        }
    }

    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// False once a page came back empty.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn next_page(&self) -> usize {
        self.next_page
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, PageLoad::InFlight(_))
    }

    pub fn in_flight(&self) -> Option<PageRequest> {
        match self.load {
            PageLoad::InFlight(request) => Some(request),
            _ => None,
        }
    }

    /// Message of the last permanently failed page load.
    pub fn failure(&self) -> Option<&str> {
        match &self.load {
            PageLoad::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Start loading the next page.
    ///
    /// Returns `None` while another page is in flight or once the dataset
    /// is exhausted. A failed page is requested again from attempt zero.
    pub fn request_next_page(&mut self) -> Option<PageRequest> {
        if !self.has_more || self.is_loading() {
            return None;
        }
        let request = PageRequest::first_attempt(self.next_page);
        self.load = PageLoad::InFlight(request);
        Some(request)
    }

    /// Mark `request` as being retried and return the follow-up request.
    pub fn retry(&mut self, request: PageRequest) -> Option<PageRequest> {
        if self.in_flight() != Some(request) {
            return None;
        }
        let next = request.next_attempt();
        self.load = PageLoad::InFlight(next);
        Some(next)
    }

    /// Append a loaded page. Returns false when `request` is not the page in flight.
    pub fn page_loaded(&mut self, request: PageRequest, records: Vec<CityRecord>) -> bool {
        if self.in_flight() != Some(request) {
            return false;
        }
        self.load = PageLoad::Idle;
        if records.is_empty() {
            self.has_more = false;
        } else {
            self.cities.extend(records);
            self.next_page += 1;
        }
        true
    }

    /// Give up on `request`. Loaded records and `has_more` are untouched.
    pub fn page_failed(&mut self, request: PageRequest, message: impl Into<String>) -> bool {
        if self.in_flight() != Some(request) {
            return false;
        }
        self.load = PageLoad::Failed(message.into());
        true
    }
}
