//! # Upstream Country Data
//!
//! Typed access to the REST Countries service. The rest of the crate only
//! sees the [`CountrySource`] trait, so tests swap in a scripted source.

pub mod restcountries;
pub mod source;
pub mod types;

pub use restcountries::RestCountriesClient;
pub use source::{CountrySource, SourceError, not_found_as_empty};
pub use types::{Country, CountryName, Currency, FieldProfile, Flags, NativeName, Region, RegionFilter};
