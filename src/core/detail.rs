//! # Country Detail
//!
//! Resolves a single country (full profile) and labels its border codes from
//! the list already in memory. Border names never trigger extra requests: a
//! code missing from the loaded list is shown as the raw code.

use std::sync::Arc;

use log::{debug, info};

use crate::api::{Country, CountrySource, FieldProfile, SourceError};
use crate::core::state::{CountryStore, LoadState};

#[derive(Clone)]
pub struct DetailResolver {
    source: Arc<dyn CountrySource>,
}

impl DetailResolver {
    pub fn new(source: Arc<dyn CountrySource>) -> Self {
        Self { source }
    }

    pub async fn resolve(&self, code: &str) -> Result<Country, SourceError> {
        self.source.fetch_by_code(code.trim(), FieldProfile::Full).await
    }
}

/// One entry of the "Border Countries" row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderLink {
    /// Target for navigation.
    pub code: String,
    /// Common name when known, otherwise the code itself.
    pub label: String,
}

pub fn border_links(country: &Country, store: &CountryStore) -> Vec<BorderLink> {
    country
        .border_codes
        .iter()
        .map(|code| BorderLink {
            code: code.clone(),
            label: store
                .find_by_code(code)
                .map(|c| c.name.common.clone())
                .unwrap_or_else(|| code.clone()),
        })
        .collect()
}

/// State of the detail stream. Independent of the list's `LoadState`.
#[derive(Debug, Default)]
pub struct DetailView {
    state: LoadState,
    code: Option<String>,
    country: Option<Country>,
    error: Option<SourceError>,
    /// Bumped on every open/close so late responses for an older code are dropped.
    request: u64,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts showing `code`. Returns the request tag to settle with.
    pub fn open(&mut self, code: impl Into<String>) -> u64 {
        self.request += 1;
        self.code = Some(code.into());
        self.country = None;
        self.error = None;
        self.state = LoadState::Loading;
        debug!("Detail request {} for {:?}", self.request, self.code);
        self.request
    }

    /// Returns false when `request` was superseded.
    pub fn settle(&mut self, request: u64, outcome: Result<Country, SourceError>) -> bool {
        if request != self.request {
            info!("Discarding stale detail response {} (current {})", request, self.request);
            return false;
        }
        match outcome {
            Ok(country) => {
                self.country = Some(country);
                self.state = LoadState::Ready;
            }
            Err(e) => {
                info!("Detail for {:?} failed: {}", self.code, e);
                self.error = Some(e);
                self.state = LoadState::Error;
            }
        }
        true
    }

    /// Back to the list. Any in-flight response is dropped.
    pub fn close(&mut self) {
        self.request += 1;
        self.code = None;
        self.country = None;
        self.error = None;
        self.state = LoadState::Idle;
    }

    pub fn is_open(&self) -> bool {
        self.code.is_some()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn country(&self) -> Option<&Country> {
        self.country.as_ref()
    }

    pub fn error(&self) -> Option<&SourceError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Script, ScriptedSource, country};

    fn germany_with_borders() -> Country {
        let mut deu = country("DEU", "Germany", "Europe");
        deu.border_codes = vec!["FRA".into(), "POL".into()];
        deu
    }

    #[test]
    fn test_border_names_come_from_loaded_list() {
        let mut store = CountryStore::new();
        store.replace_list(vec![country("FRA", "France", "Europe")]);

        let links = border_links(&germany_with_borders(), &store);
        let labels: Vec<&str> = links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["France", "POL"]);
        assert_eq!(links[1].code, "POL");
    }

    #[test]
    fn test_no_borders_no_links() {
        let store = CountryStore::new();
        assert!(border_links(&country("ISL", "Iceland", "Europe"), &store).is_empty());
    }

    #[tokio::test]
    async fn test_resolve_uses_full_profile() {
        let source = ScriptedSource::new().on_detail("DEU", Script::ok(vec![germany_with_borders()]));
        let resolver = DetailResolver::new(source.clone());

        let deu = resolver.resolve(" DEU ").await.unwrap();
        assert_eq!(deu.code, "DEU");
        assert_eq!(source.detail_calls(), vec!["DEU"]);
        assert_eq!(source.profiles(), vec![FieldProfile::Full]);
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_is_not_found() {
        let resolver = DetailResolver::new(ScriptedSource::new());
        assert_eq!(resolver.resolve("XXX").await, Err(SourceError::NotFound));
    }

    #[test]
    fn test_view_state_machine() {
        let mut view = DetailView::new();
        assert_eq!(view.state(), LoadState::Idle);

        let req = view.open("DEU");
        assert_eq!(view.state(), LoadState::Loading);
        assert!(view.settle(req, Ok(germany_with_borders())));
        assert_eq!(view.state(), LoadState::Ready);
        assert_eq!(view.country().map(|c| c.code.as_str()), Some("DEU"));

        let req = view.open("XXX");
        assert!(view.settle(req, Err(SourceError::NotFound)));
        assert_eq!(view.state(), LoadState::Error);
        assert!(view.country().is_none());
    }

    #[test]
    fn test_late_response_for_previous_country_is_dropped() {
        let mut view = DetailView::new();
        let first = view.open("DEU");
        let second = view.open("FRA");

        assert!(!view.settle(first, Ok(germany_with_borders())));
        assert_eq!(view.state(), LoadState::Loading);
        assert!(view.settle(second, Ok(country("FRA", "France", "Europe"))));
        assert_eq!(view.code(), Some("FRA"));
    }

    #[test]
    fn test_close_drops_in_flight_response() {
        let mut view = DetailView::new();
        let req = view.open("DEU");
        view.close();
        assert!(!view.settle(req, Ok(germany_with_borders())));
        assert!(!view.is_open());
        assert_eq!(view.state(), LoadState::Idle);
    }
}
