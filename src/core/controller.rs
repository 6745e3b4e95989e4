//! # Search Controller
//!
//! Binds the search field to the racing resolver. Every edit starts a new
//! generation; only results tagged with the current generation may touch the
//! store. Ordering decides, not speed: a superseded generation is dropped even
//! when its response is the first to arrive.
//!
//! ```text
//! edit ──► on_input (g+1) ──► debounce ──► on_timer(g) ──► resolver
//!                                                             │
//!   store ◄── replace_list ◄── on_settled(g) if g is current ◄┘
//! ```

use log::{debug, info};

use crate::api::Country;
use crate::core::search::SearchError;
use crate::core::state::{CountryStore, LoadState};

/// Monotonic tag distinguishing successive edits of the search field.
pub type Generation = u64;

pub const NO_RESULTS_NOTICE: &str = "No results found";

/// A search to run once its debounce window passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: Generation,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    Stale,
}

#[derive(Debug, Default)]
pub struct SearchController {
    generation: Generation,
    query: String,
    /// User-visible annotation after a failed search. Never erases the list.
    notice: Option<String>,
    /// Whether the current generation already had its result applied.
    settled: bool,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new field value. Clears any "no results" notice.
    pub fn on_input(&mut self, query: impl Into<String>) -> SearchTicket {
        self.generation += 1;
        self.query = query.into();
        self.notice = None;
        self.settled = false;
        debug!("Search generation {} for {:?}", self.generation, self.query);
        SearchTicket {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The debounce window for `generation` passed. Returns the search to run,
    /// or `None` when a later edit superseded it.
    pub fn on_timer(&self, generation: Generation) -> Option<SearchTicket> {
        if !self.is_current(generation) {
            debug!(
                "Dropping debounce for generation {} (current {})",
                generation, self.generation
            );
            return None;
        }
        Some(SearchTicket {
            generation,
            query: self.query.clone(),
        })
    }

    /// Applies a resolver outcome if `generation` is still current.
    pub fn on_settled(
        &mut self,
        store: &mut CountryStore,
        generation: Generation,
        outcome: Result<Vec<Country>, SearchError>,
    ) -> Settlement {
        if !self.is_current(generation) {
            info!(
                "Discarding stale search result for generation {} (current {})",
                generation, self.generation
            );
            return Settlement::Stale;
        }
        if self.settled {
            debug!("Generation {} already settled, ignoring", generation);
            return Settlement::Stale;
        }
        self.settled = true;

        match outcome {
            Ok(countries) => {
                debug!("Applying {} countries from generation {}", countries.len(), generation);
                self.notice = None;
                store.replace_list(countries);
            }
            Err(e) => {
                info!("Search {:?} failed: {}", self.query, e);
                self.notice = Some(NO_RESULTS_NOTICE.to_string());
                // Nothing was shown yet, so there is nothing to keep.
                if store.list_state() == LoadState::Loading {
                    store.replace_list(Vec::new());
                }
            }
        }
        Settlement::Applied
    }
}
