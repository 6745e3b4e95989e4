//! # Racing Search
//!
//! A free-text query can mean a country name, a capital, or (when short) an
//! alpha code. All plausible lookups are launched at once and the first one
//! that succeeds with a non-empty list wins.
//!
//! Every pending branch is polled in fixed priority order on each wake, so two
//! branches that become ready in the same wake resolve by priority
//! (name > capital > code) instead of by incidental timing. Losing branches
//! are dropped as soon as a winner is found.

use std::fmt;
use std::future::{Future, poll_fn};
use std::sync::Arc;
use std::task::Poll;

use futures::future::BoxFuture;
use log::{debug, info};

use crate::api::{Country, CountrySource, FieldProfile, SourceError};

/// Queries at most this many characters long also race an alpha-code lookup.
pub const CODE_QUERY_MAX_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBranch {
    Name,
    Capital,
    Code,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Every raced lookup failed or came back empty.
    NotFound,
    /// The empty query lists everything; that listing failed.
    Listing(SourceError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NotFound => write!(f, "no countries match this query"),
            SearchError::Listing(e) => write!(f, "failed to list countries: {e}"),
        }
    }
}

impl std::error::Error for SearchError {}

type BranchFuture<'a> = BoxFuture<'a, Result<Vec<Country>, SourceError>>;

/// The lookups launched for `query`, in priority order.
pub fn branches_for(query: &str) -> Vec<SearchBranch> {
    let mut branches = vec![SearchBranch::Name, SearchBranch::Capital];
    if query.chars().count() <= CODE_QUERY_MAX_LEN {
        branches.push(SearchBranch::Code);
    }
    branches
}

#[derive(Clone)]
pub struct SearchResolver {
    source: Arc<dyn CountrySource>,
    profile: FieldProfile,
}

impl SearchResolver {
    /// Resolver for list views (summary profile).
    pub fn new(source: Arc<dyn CountrySource>) -> Self {
        Self::with_profile(source, FieldProfile::Summary)
    }

    pub fn with_profile(source: Arc<dyn CountrySource>, profile: FieldProfile) -> Self {
        Self { source, profile }
    }

    /// Resolves `query` to a country list. An empty (or blank) query lists
    /// every country instead of racing.
    pub async fn resolve(&self, query: &str) -> Result<Vec<Country>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Empty query, listing all countries");
            return self
                .source
                .fetch_all(self.profile)
                .await
                .map_err(SearchError::Listing);
        }

        let codes = [query.to_string()];
        let mut pending: Vec<Option<(SearchBranch, BranchFuture<'_>)>> = branches_for(query)
            .into_iter()
            .map(|branch| {
                let fut: BranchFuture<'_> = match branch {
                    SearchBranch::Name => self.source.fetch_by_name(query, self.profile),
                    SearchBranch::Capital => self.source.fetch_by_capital(query, self.profile),
                    SearchBranch::Code => self.source.fetch_by_codes(&codes, self.profile),
                };
                Some((branch, fut))
            })
            .collect();

        debug!("Racing {} branches for {:?}", pending.len(), query);

        let winner = poll_fn(|cx| {
            let mut remaining = false;
            for slot in pending.iter_mut() {
                let Some((branch, fut)) = slot.as_mut() else {
                    continue;
                };
                let branch = *branch;
                match fut.as_mut().poll(cx) {
                    Poll::Pending => remaining = true,
                    Poll::Ready(Ok(countries)) if !countries.is_empty() => {
                        return Poll::Ready(Some((branch, countries)));
                    }
                    Poll::Ready(Ok(_)) => {
                        debug!("{:?} branch for {:?} came back empty", branch, query);
                        *slot = None;
                    }
                    Poll::Ready(Err(e)) => {
                        debug!("{:?} branch for {:?} failed: {}", branch, query, e);
                        *slot = None;
                    }
                }
            }
            if remaining {
                Poll::Pending
            } else {
                Poll::Ready(None)
            }
        })
        .await;

        match winner {
            Some((branch, countries)) => {
                info!(
                    "Search {:?} won by {:?} branch ({} countries)",
                    query,
                    branch,
                    countries.len()
                );
                Ok(countries)
            }
            None => {
                info!("Search {:?}: no branch produced results", query);
                Err(SearchError::NotFound)
            }
        }
    }
}
