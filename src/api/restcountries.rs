//! REST Countries (v3.1) implementation of [`CountrySource`].
//!
//! Endpoint shapes:
//! - `/all`                    every country
//! - `/name/{text}`            name substring
//! - `/capital/{text}`         capital substring
//! - `/region/{region}`        server-side region query
//! - `/alpha?codes=A,B`        one or more alpha codes
//! - `/alpha/{code}`           single country (array or bare object)
//!
//! The summary profile adds `?fields=...`; the full profile sends no field list.
//! Any endpoint answers 404 when nothing matches.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Url;
use serde::Deserialize;

use crate::api::{Country, CountrySource, FieldProfile, Region, SourceError};

pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// `/alpha/{code}` answers with a one-element array on v3.1 but a bare
/// object on older deployments.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Country>),
    One(Box<Country>),
}

impl OneOrMany {
    fn into_single(self) -> Result<Country, SourceError> {
        match self {
            OneOrMany::One(country) => Ok(*country),
            OneOrMany::Many(countries) => countries.into_iter().next().ok_or(SourceError::NotFound),
        }
    }
}

// ============================================================================
// Client Implementation
// ============================================================================

/// HTTP client for the REST Countries service.
pub struct RestCountriesClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestCountriesClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `base_url` - Optional custom base URL (defaults to the public v3.1 API)
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `segments` onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SourceError::Config(format!("invalid base URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::Config(format!("base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET and maps the status: 404 becomes `NotFound`, any other
    /// non-2xx becomes `Api`.
    async fn get(
        &self,
        url: Url,
        query: &[(&str, &str)],
        profile: FieldProfile,
    ) -> Result<reqwest::Response, SourceError> {
        let mut request = self.client.get(url.clone()).query(query);
        if let Some(fields) = profile.fields() {
            request = request.query(&[("fields", fields)]);
        }

        debug!("GET {} {:?} profile={:?}", url, query, profile);
        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        debug!("{} -> {}", url, status);

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound);
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("REST Countries error: {} - {}", status.as_u16(), message);
            return Err(SourceError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn get_list(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError> {
        let url = self.endpoint(segments)?;
        let response = self.get(url, query, profile).await?;
        let countries: Vec<Country> = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        debug!("{:?} returned {} countries", segments, countries.len());
        Ok(countries)
    }
}

#[async_trait]
impl CountrySource for RestCountriesClient {
    fn name(&self) -> &str {
        "restcountries"
    }

    async fn fetch_all(&self, profile: FieldProfile) -> Result<Vec<Country>, SourceError> {
        info!("Fetching all countries ({:?})", profile);
        self.get_list(&["all"], &[], profile).await
    }

    async fn fetch_by_name(
        &self,
        text: &str,
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError> {
        self.get_list(&["name", text], &[], profile).await
    }

    async fn fetch_by_capital(
        &self,
        text: &str,
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError> {
        self.get_list(&["capital", text], &[], profile).await
    }

    async fn fetch_by_region(
        &self,
        region: Region,
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError> {
        info!("Fetching region {} ({:?})", region, profile);
        self.get_list(&["region", &region.as_str().to_lowercase()], &[], profile)
            .await
    }

    async fn fetch_by_codes(
        &self,
        codes: &[String],
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError> {
        if codes.is_empty() {
            debug!("fetch_by_codes called with no codes, skipping request");
            return Ok(Vec::new());
        }
        let joined = codes.join(",");
        self.get_list(&["alpha"], &[("codes", joined.as_str())], profile).await
    }

    async fn fetch_by_code(
        &self,
        code: &str,
        profile: FieldProfile,
    ) -> Result<Country, SourceError> {
        info!("Fetching country {} ({:?})", code, profile);
        let url = self.endpoint(&["alpha", code])?;
        let response = self.get(url, &[], profile).await?;
        let body: OneOrMany = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        body.into_single()
    }
}
