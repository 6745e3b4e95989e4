//! # Actions
//!
//! Everything that can happen in Atlas becomes an `Action`.
//! User edits the search field? That's `Action::QueryChanged(text)`.
//! A search task finishes? That's `Action::SearchSettled { .. }`.
//!
//! `update()` applies an action to the state and returns the `Effect` the
//! runtime should perform. No I/O happens here; the runtime owns the tasks.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info};

use crate::api::{Country, RegionFilter, SourceError};
use crate::core::controller::{Generation, SearchTicket, Settlement};
use crate::core::search::SearchError;
use crate::core::state::{App, LoadState};

#[derive(Debug)]
pub enum Action {
    /// Populate the list on startup.
    InitialLoad,
    /// The startup listing finished.
    ListLoaded {
        generation: Generation,
        outcome: Result<Vec<Country>, SourceError>,
    },
    QueryChanged(String),
    /// The debounce window for `generation` passed without another edit.
    DebounceElapsed { generation: Generation },
    SearchSettled {
        generation: Generation,
        outcome: Result<Vec<Country>, SearchError>,
    },
    RegionSelected(RegionFilter),
    OpenDetail(String),
    DetailSettled {
        request: u64,
        outcome: Result<Country, SourceError>,
    },
    CloseDetail,
    Quit,
}

/// Side effects requested by `update()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// A late result was dropped. Nothing changed.
    Discarded,
    Quit,
    LoadAll { generation: Generation },
    /// (Re)start the debounce timer for this edit.
    StartDebounce(SearchTicket),
    SpawnSearch(SearchTicket),
    FetchDetail { request: u64, code: String },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::InitialLoad => {
            app.store.begin_load();
            app.status_message = String::from("Loading countries...");
            Effect::LoadAll {
                generation: app.search.generation(),
            }
        }

        Action::ListLoaded {
            generation,
            outcome,
        } => {
            // Typing before the startup list arrives supersedes it.
            if !app.search.is_current(generation) {
                info!(
                    "Discarding initial list for generation {} (current {})",
                    generation,
                    app.search.generation()
                );
                return Effect::Discarded;
            }
            match outcome {
                Ok(countries) => {
                    app.status_message = format!("{} countries", countries.len());
                    app.store.replace_list(countries);
                }
                Err(e) => {
                    info!("Initial load failed: {}", e);
                    app.status_message = format!("Failed to load countries: {e}");
                    app.store.report_error();
                }
            }
            Effect::None
        }

        Action::QueryChanged(query) => Effect::StartDebounce(app.search.on_input(query)),

        Action::DebounceElapsed { generation } => match app.search.on_timer(generation) {
            Some(ticket) => {
                if app.store.raw().is_empty() && app.store.list_state() != LoadState::Loading {
                    app.store.begin_load();
                }
                app.status_message = if ticket.query.trim().is_empty() {
                    String::from("Loading countries...")
                } else {
                    format!("Searching for {:?}...", ticket.query.trim())
                };
                Effect::SpawnSearch(ticket)
            }
            None => Effect::Discarded,
        },

        Action::SearchSettled {
            generation,
            outcome,
        } => match app.search.on_settled(&mut app.store, generation, outcome) {
            Settlement::Applied => {
                app.status_message = match app.search.notice() {
                    Some(notice) => notice.to_string(),
                    None => format!("{} countries", app.store.visible_len()),
                };
                Effect::None
            }
            Settlement::Stale => Effect::Discarded,
        },

        Action::RegionSelected(filter) => {
            debug!("Region filter -> {:?}", filter);
            app.store.set_filter(filter);
            app.status_message = match filter {
                Some(region) => format!("{}: {} countries", region, app.store.visible_len()),
                None => format!("All regions: {} countries", app.store.visible_len()),
            };
            Effect::None
        }

        Action::OpenDetail(code) => {
            let code = code.trim().to_uppercase();
            let request = app.detail.open(code.clone());
            app.status_message = format!("Loading {code}...");
            Effect::FetchDetail { request, code }
        }

        Action::DetailSettled { request, outcome } => {
            if !app.detail.settle(request, outcome) {
                return Effect::Discarded;
            }
            app.status_message = match (app.detail.country(), app.detail.error()) {
                (Some(country), _) => country.name.common.clone(),
                (None, Some(e)) => format!("Could not load country: {e}"),
                (None, None) => String::new(),
            };
            Effect::None
        }

        Action::CloseDetail => {
            app.detail.close();
            app.status_message = format!("{} countries", app.store.visible_len());
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}
