//! # Application State
//!
//! Core business state for Atlas. Domain logic only, nothing about how it is
//! drawn. Presentation lives in the `cli` module.
//!
//! ```text
//! App
//! ├── store: CountryStore          // raw list, region filter, list LoadState
//! ├── search: SearchController     // query generations + "no results" notice
//! ├── detail: DetailView           // detail stream, independent LoadState
//! └── status_message: String       // status line text
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.

use log::debug;

use crate::api::{Country, RegionFilter};
use crate::core::controller::SearchController;
use crate::core::detail::DetailView;

/// Load state of one logical data stream (list or detail).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Canonical in-memory country list plus the region filter applied to it.
///
/// The visible projection is recomputed from scratch whenever the raw list or
/// the filter changes: it is `raw` when no filter is active, otherwise the
/// countries whose `region` equals the filter.
#[derive(Debug, Default)]
pub struct CountryStore {
    raw: Vec<Country>,
    /// Indices into `raw`.
    visible: Vec<usize>,
    active_filter: RegionFilter,
    list_state: LoadState,
}

impl CountryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the raw list and narrows it by the current filter.
    pub fn replace_list(&mut self, countries: Vec<Country>) {
        self.raw = countries;
        self.reproject();
        self.list_state = LoadState::Ready;
    }

    /// Changes the filter and re-projects whatever was last loaded. Never refetches.
    pub fn set_filter(&mut self, filter: RegionFilter) {
        self.active_filter = filter;
        self.reproject();
    }

    pub fn begin_load(&mut self) {
        self.list_state = LoadState::Loading;
    }

    /// Marks the list as failed. The raw list is cleared so an error is never
    /// shown next to stale data.
    pub fn report_error(&mut self) {
        self.raw.clear();
        self.visible.clear();
        self.list_state = LoadState::Error;
    }

    fn reproject(&mut self) {
        self.visible = match self.active_filter {
            None => (0..self.raw.len()).collect(),
            Some(region) => self
                .raw
                .iter()
                .enumerate()
                .filter(|(_, c)| region.matches(c))
                .map(|(i, _)| i)
                .collect(),
        };
        debug!(
            "Projection: {} of {} countries (filter={:?})",
            self.visible.len(),
            self.raw.len(),
            self.active_filter
        );
    }

    /// The filtered projection, in raw-list order.
    pub fn countries(&self) -> impl Iterator<Item = &Country> {
        self.visible.iter().map(|&i| &self.raw[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Everything last loaded, ignoring the filter.
    pub fn raw(&self) -> &[Country] {
        &self.raw
    }

    pub fn active_filter(&self) -> RegionFilter {
        self.active_filter
    }

    pub fn list_state(&self) -> LoadState {
        self.list_state
    }

    /// Looks a code up in the raw list (not just the visible part).
    pub fn find_by_code(&self, code: &str) -> Option<&Country> {
        self.raw.iter().find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

pub struct App {
    pub store: CountryStore,
    pub search: SearchController,
    pub detail: DetailView,
    pub status_message: String,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            store: CountryStore::new(),
            search: SearchController::new(),
            detail: DetailView::new(),
            status_message: String::from("Welcome to Atlas!"),
        }
    }
}
