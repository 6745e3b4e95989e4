//! # Command Line Adapter
//!
//! One-shot commands print and exit. `browse` keeps a `Browser` alive and
//! feeds it one stdin line at a time, redrawing after each applied action.

pub mod input;
pub mod render;

use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::{
    Country, CountrySource, FieldProfile, Region, RestCountriesClient, SourceError, not_found_as_empty,
};
use crate::core::config::ResolvedConfig;
use crate::core::controller::NO_RESULTS_NOTICE;
use crate::core::detail::{DetailResolver, border_links};
use crate::core::search::{SearchError, SearchResolver};
use crate::core::state::CountryStore;
use crate::core::{Action, Browser, Effect};

use input::{BrowseEvent, HELP, parse_line};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every country, optionally only one region
    List {
        #[arg(short, long, value_enum)]
        region: Option<Region>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Search by name, capital or code
    Search {
        query: String,
        /// Narrow the results to one region
        #[arg(short, long, value_enum)]
        region: Option<Region>,
        #[arg(long)]
        json: bool,
    },
    /// Show one country by its alpha code
    Show {
        code: String,
        #[arg(long)]
        json: bool,
    },
    /// Interactive session: type to search, `:help` for commands
    Browse,
}

#[derive(Debug)]
pub enum CliError {
    Source(SourceError),
    Search(SearchError),
    Io(io::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Source(e) => write!(f, "{e}"),
            CliError::Search(e) => write!(f, "{e}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Encode(e) => write!(f, "failed to encode JSON: {e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        CliError::Source(e)
    }
}

impl From<SearchError> for CliError {
    fn from(e: SearchError) -> Self {
        CliError::Search(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Encode(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

pub fn build_source(config: &ResolvedConfig) -> Arc<dyn CountrySource> {
    info!("Using REST Countries at {}", config.base_url);
    Arc::new(RestCountriesClient::new(Some(config.base_url.clone())))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Json,
}

impl Format {
    fn from_flag(json: bool) -> Self {
        if json { Format::Json } else { Format::Table }
    }
}

pub async fn run(config: ResolvedConfig, command: Command) -> Result<(), CliError> {
    let source = build_source(&config);
    match command {
        Command::List { region, json } => {
            print!("{}", list(source, region, Format::from_flag(json)).await?)
        }
        Command::Search {
            query,
            region,
            json,
        } => print!("{}", search(source, &query, region, Format::from_flag(json)).await?),
        Command::Show { code, json } => {
            print!("{}", show(source, &code, Format::from_flag(json)).await?)
        }
        Command::Browse => browse(source, config.debounce).await?,
    }
    Ok(())
}

fn print_projection(store: &CountryStore, format: Format) -> Result<String, CliError> {
    match format {
        Format::Json => {
            let visible: Vec<&Country> = store.countries().collect();
            Ok(format!("{}\n", serde_json::to_string_pretty(&visible)?))
        }
        Format::Table if store.visible_len() == 0 => Ok(String::from("No countries to show\n")),
        Format::Table => Ok(render::country_table(store.countries())),
    }
}

pub async fn list(
    source: Arc<dyn CountrySource>,
    region: Option<Region>,
    format: Format,
) -> Result<String, CliError> {
    let countries = match region {
        Some(region) => {
            not_found_as_empty(source.fetch_by_region(region, FieldProfile::Summary).await)?
        }
        None => source.fetch_all(FieldProfile::Summary).await?,
    };
    let mut store = CountryStore::new();
    store.replace_list(countries);
    print_projection(&store, format)
}

/// Races `query`, then narrows the winner client-side by `region`.
pub async fn search(
    source: Arc<dyn CountrySource>,
    query: &str,
    region: Option<Region>,
    format: Format,
) -> Result<String, CliError> {
    let mut store = CountryStore::new();
    store.set_filter(region);
    match SearchResolver::new(source).resolve(query).await {
        Ok(countries) => {
            store.replace_list(countries);
            print_projection(&store, format)
        }
        Err(SearchError::NotFound) if format == Format::Json => Ok(String::from("[]\n")),
        Err(SearchError::NotFound) => Ok(format!("{NO_RESULTS_NOTICE}\n")),
        Err(e) => Err(e.into()),
    }
}

/// Nothing else is loaded, so border codes print as-is.
pub async fn show(
    source: Arc<dyn CountrySource>,
    code: &str,
    format: Format,
) -> Result<String, CliError> {
    let country = DetailResolver::new(source).resolve(code).await?;
    if format == Format::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&country)?));
    }
    let borders = border_links(&country, &CountryStore::new());
    Ok(render::country_detail(&country, &borders))
}

fn present(browser: &Browser, effect: &Effect) {
    match effect {
        Effect::Discarded | Effect::StartDebounce(_) | Effect::Quit => {}
        Effect::LoadAll { .. } | Effect::SpawnSearch(_) | Effect::FetchDetail { .. } => {
            println!("{}", browser.app.status_message);
        }
        Effect::None => {
            print!("{}", render::screen(&browser.app));
            println!("-- {}", browser.app.status_message);
        }
    }
}

async fn browse(source: Arc<dyn CountrySource>, debounce: Duration) -> Result<(), CliError> {
    let mut browser = Browser::new(source, debounce);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    let effect = browser.dispatch(Action::InitialLoad);
    present(&browser, &effect);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match parse_line(&line) {
                    BrowseEvent::Help => println!("{HELP}"),
                    BrowseEvent::Invalid(msg) => eprintln!("{msg}"),
                    event => {
                        let Some(action) = event.into_action() else { continue };
                        let effect = browser.dispatch(action);
                        if effect == Effect::Quit {
                            break;
                        }
                        present(&browser, &effect);
                    }
                }
            }
            Some(action) = browser.next_action() => {
                let effect = browser.dispatch(action);
                present(&browser, &effect);
            }
        }
    }

    info!("Browse session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Script, ScriptedSource, country};

    #[tokio::test]
    async fn test_list_by_region_uses_server_query() {
        let source = ScriptedSource::new()
            .on_region(Region::Oceania, Script::ok(vec![country("NZL", "New Zealand", "Oceania")]));
        let out = list(source.clone(), Some(Region::Oceania), Format::Table).await.unwrap();
        assert!(out.contains("New Zealand"));
        assert_eq!(source.region_calls(), vec![Region::Oceania]);
        assert_eq!(source.all_calls(), 0);
    }

    #[tokio::test]
    async fn test_list_region_not_found_is_empty() {
        let out = list(ScriptedSource::new(), Some(Region::Africa), Format::Table).await.unwrap();
        assert_eq!(out, "No countries to show\n");
    }

    #[tokio::test]
    async fn test_search_filters_client_side() {
        let source = ScriptedSource::new().on_name(
            "an",
            Script::ok(vec![
                country("JPN", "Japan", "Asia"),
                country("FRA", "France", "Europe"),
            ]),
        );
        let out = search(source, "an", Some(Region::Asia), Format::Table).await.unwrap();
        assert!(out.contains("Japan"));
        assert!(!out.contains("France"));
    }

    #[tokio::test]
    async fn test_search_without_match_prints_notice() {
        let out = search(ScriptedSource::new(), "xyz123notacountry", None, Format::Table).await.unwrap();
        assert_eq!(out, format!("{NO_RESULTS_NOTICE}\n"));
    }

    #[tokio::test]
    async fn test_show_prints_raw_border_codes() {
        let mut deu = country("DEU", "Germany", "Europe");
        deu.border_codes = vec!["FRA".into(), "POL".into()];
        let source = ScriptedSource::new().on_detail("DEU", Script::ok(vec![deu]));

        let out = show(source.clone(), "DEU", Format::Table).await.unwrap();
        assert!(out.contains("FRA, POL"));
        assert_eq!(source.detail_calls(), vec!["DEU"]);
    }

    #[tokio::test]
    async fn test_json_output_is_the_filtered_projection() {
        let source = ScriptedSource::new().on_name(
            "an",
            Script::ok(vec![
                country("JPN", "Japan", "Asia"),
                country("FRA", "France", "Europe"),
            ]),
        );
        let out = search(source, "an", Some(Region::Europe), Format::Json).await.unwrap();
        let parsed: Vec<Country> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].code, "FRA");

        let none = search(ScriptedSource::new(), "zz", None, Format::Json).await.unwrap();
        assert_eq!(none, "[]\n");
    }

    #[tokio::test]
    async fn test_show_unknown_code_is_error() {
        let err = show(ScriptedSource::new(), "XXX", Format::Table).await.unwrap_err();
        assert!(matches!(err, CliError::Source(SourceError::NotFound)));
    }
}
