use std::fmt;

use async_trait::async_trait;

use super::types::{Country, FieldProfile, Region};

/// Errors that can occur while talking to the upstream country service.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Upstream answered 404: no such resource, or no match for the query.
    NotFound,
    /// Transport-level failure (DNS, connection refused, reset).
    Network(String),
    /// Upstream answered with a non-2xx status other than 404.
    Api { status: u16, message: String },
    /// The body was not a valid country payload.
    Parse(String),
    /// Source misconfigured (unusable base URL).
    Config(String),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound)
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotFound => write!(f, "not found"),
            SourceError::Network(msg) => write!(f, "network error: {msg}"),
            SourceError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            SourceError::Parse(msg) => write!(f, "parse error: {msg}"),
            SourceError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// Turns a 404 into an empty result, for callers where "no match" is not a failure.
pub fn not_found_as_empty(
    result: Result<Vec<Country>, SourceError>,
) -> Result<Vec<Country>, SourceError> {
    match result {
        Err(SourceError::NotFound) => Ok(Vec::new()),
        other => other,
    }
}

/// Read-only access to a country-data service.
///
/// Implementations hold no cache: every call is a fresh request.
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Returns the name of the source (for logs).
    fn name(&self) -> &str;

    async fn fetch_all(&self, profile: FieldProfile) -> Result<Vec<Country>, SourceError>;

    /// Countries whose name contains `text`.
    async fn fetch_by_name(
        &self,
        text: &str,
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError>;

    /// Countries whose capital contains `text`.
    async fn fetch_by_capital(
        &self,
        text: &str,
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError>;

    /// Server-side region query.
    async fn fetch_by_region(
        &self,
        region: Region,
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError>;

    /// Countries matching any of the alpha codes. Empty `codes` must yield an
    /// empty result without a request.
    async fn fetch_by_codes(
        &self,
        codes: &[String],
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError>;

    /// A single country by alpha code. Fails with `NotFound` when upstream
    /// has no such country.
    async fn fetch_by_code(&self, code: &str, profile: FieldProfile)
    -> Result<Country, SourceError>;
}
