//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{
    Country, CountryName, CountrySource, FieldProfile, Flags, Region, SourceError,
};

/// Minimal summary-shaped country.
pub fn country(code: &str, common: &str, region: &str) -> Country {
    Country {
        name: CountryName {
            common: common.to_string(),
            official: common.to_string(),
            native_names: Default::default(),
        },
        flags: Flags {
            png_url: format!("https://flagcdn.com/w320/{}.png", code.to_lowercase()),
            svg_url: format!("https://flagcdn.com/{}.svg", code.to_lowercase()),
            alt_text: None,
        },
        population: 1_000_000,
        region: region.to_string(),
        subregion: None,
        capitals: Vec::new(),
        top_level_domains: Vec::new(),
        currencies: Default::default(),
        languages: Default::default(),
        border_codes: Vec::new(),
        code: code.to_string(),
    }
}

/// A canned response, optionally delayed.
#[derive(Clone, Debug)]
pub struct Script {
    outcome: Result<Vec<Country>, SourceError>,
    delay: Duration,
}

impl Script {
    pub fn ok(countries: Vec<Country>) -> Self {
        Self {
            outcome: Ok(countries),
            delay: Duration::ZERO,
        }
    }

    pub fn not_found() -> Self {
        Self {
            outcome: Err(SourceError::NotFound),
            delay: Duration::ZERO,
        }
    }

    pub fn api_error(status: u16) -> Self {
        Self {
            outcome: Err(SourceError::Api {
                status,
                message: "scripted failure".to_string(),
            }),
            delay: Duration::ZERO,
        }
    }

    pub fn network_error() -> Self {
        Self {
            outcome: Err(SourceError::Network("connection refused".to_string())),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn play(self) -> Result<Vec<Country>, SourceError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome
    }
}

#[derive(Default)]
struct Scripts {
    all: Option<Script>,
    name: HashMap<String, Script>,
    capital: HashMap<String, Script>,
    code: HashMap<String, Script>,
    region: HashMap<Region, Script>,
    detail: HashMap<String, Script>,
}

#[derive(Default)]
struct Calls {
    all: usize,
    name: Vec<String>,
    capital: Vec<String>,
    code: Vec<String>,
    region: Vec<Region>,
    detail: Vec<String>,
    profiles: Vec<FieldProfile>,
}

/// In-memory `CountrySource` answering from scripts and recording every call.
/// Unscripted lookups answer `NotFound`; an unscripted `fetch_all` answers an
/// empty list.
#[derive(Default)]
pub struct ScriptedSource {
    scripts: Mutex<Scripts>,
    calls: Mutex<Calls>,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_all(self: Arc<Self>, script: Script) -> Arc<Self> {
        self.scripts.lock().unwrap().all = Some(script);
        self
    }

    pub fn on_name(self: Arc<Self>, query: &str, script: Script) -> Arc<Self> {
        self.scripts.lock().unwrap().name.insert(query.to_string(), script);
        self
    }

    pub fn on_capital(self: Arc<Self>, query: &str, script: Script) -> Arc<Self> {
        self.scripts.lock().unwrap().capital.insert(query.to_string(), script);
        self
    }

    /// Script for `fetch_by_codes`, keyed by the comma-joined codes.
    pub fn on_code(self: Arc<Self>, codes: &str, script: Script) -> Arc<Self> {
        self.scripts.lock().unwrap().code.insert(codes.to_string(), script);
        self
    }

    pub fn on_region(self: Arc<Self>, region: Region, script: Script) -> Arc<Self> {
        self.scripts.lock().unwrap().region.insert(region, script);
        self
    }

    /// Script for `fetch_by_code`; the first country of an `ok` script is returned.
    pub fn on_detail(self: Arc<Self>, code: &str, script: Script) -> Arc<Self> {
        self.scripts.lock().unwrap().detail.insert(code.to_string(), script);
        self
    }

    pub fn all_calls(&self) -> usize {
        self.calls.lock().unwrap().all
    }

    pub fn name_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().name.clone()
    }

    pub fn capital_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().capital.clone()
    }

    pub fn code_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().code.clone()
    }

    pub fn region_calls(&self) -> Vec<Region> {
        self.calls.lock().unwrap().region.clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().detail.clone()
    }

    pub fn profiles(&self) -> Vec<FieldProfile> {
        self.calls.lock().unwrap().profiles.clone()
    }

    fn lookup(
        &self,
        pick: impl FnOnce(&Scripts) -> Option<Script>,
        record: impl FnOnce(&mut Calls),
        profile: FieldProfile,
    ) -> Script {
        {
            let mut calls = self.calls.lock().unwrap();
            record(&mut calls);
            calls.profiles.push(profile);
        }
        let scripts = self.scripts.lock().unwrap();
        pick(&scripts).unwrap_or_else(Script::not_found)
    }
}

#[async_trait]
impl CountrySource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_all(&self, profile: FieldProfile) -> Result<Vec<Country>, SourceError> {
        let script = self.lookup(
            |s| Some(s.all.clone().unwrap_or_else(|| Script::ok(Vec::new()))),
            |c| c.all += 1,
            profile,
        );
        script.play().await
    }

    async fn fetch_by_name(
        &self,
        text: &str,
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError> {
        let script = self.lookup(
            |s| s.name.get(text).cloned(),
            |c| c.name.push(text.to_string()),
            profile,
        );
        script.play().await
    }

    async fn fetch_by_capital(
        &self,
        text: &str,
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError> {
        let script = self.lookup(
            |s| s.capital.get(text).cloned(),
            |c| c.capital.push(text.to_string()),
            profile,
        );
        script.play().await
    }

    async fn fetch_by_region(
        &self,
        region: Region,
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError> {
        let script = self.lookup(
            |s| s.region.get(&region).cloned(),
            |c| c.region.push(region),
            profile,
        );
        script.play().await
    }

    async fn fetch_by_codes(
        &self,
        codes: &[String],
        profile: FieldProfile,
    ) -> Result<Vec<Country>, SourceError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }
        let joined = codes.join(",");
        let script = self.lookup(
            |s| s.code.get(&joined).cloned(),
            |c| c.code.push(joined.clone()),
            profile,
        );
        script.play().await
    }

    async fn fetch_by_code(
        &self,
        code: &str,
        profile: FieldProfile,
    ) -> Result<Country, SourceError> {
        let script = self.lookup(
            |s| s.detail.get(code).cloned(),
            |c| c.detail.push(code.to_string()),
            profile,
        );
        script
            .play()
            .await?
            .into_iter()
            .next()
            .ok_or(SourceError::NotFound)
    }
}
