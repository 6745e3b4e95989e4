use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Fields requested for list views. Keeps the `/all` payload small.
pub const SUMMARY_FIELDS: &str = "name,flags,population,region,capital,cca3";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NativeName {
    pub official: String,
    pub common: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CountryName {
    pub common: String,
    pub official: String,
    /// Keyed by language code (e.g. "deu").
    #[serde(rename = "nativeName", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub native_names: BTreeMap<String, NativeName>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Flags {
    #[serde(rename = "png")]
    pub png_url: String,
    #[serde(rename = "svg")]
    pub svg_url: String,
    #[serde(rename = "alt", default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

/// A country record as received from upstream. Never mutated after parsing,
/// only replaced wholesale.
///
/// Summary-profile payloads omit most optional fields; those deserialize as
/// empty collections or `None`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Country {
    pub name: CountryName,
    pub flags: Flags,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion: Option<String>,
    #[serde(rename = "capital", default, skip_serializing_if = "Vec::is_empty")]
    pub capitals: Vec<String>,
    #[serde(rename = "tld", default, skip_serializing_if = "Vec::is_empty")]
    pub top_level_domains: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub currencies: BTreeMap<String, Currency>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub languages: BTreeMap<String, String>,
    #[serde(rename = "borders", default, skip_serializing_if = "Vec::is_empty")]
    pub border_codes: Vec<String>,
    /// ISO 3166-1 alpha-3 code (cca3).
    #[serde(rename = "cca3")]
    pub code: String,
}

impl Country {
    /// First native name's common form, falling back to the common English name.
    pub fn native_name(&self) -> &str {
        self.name
            .native_names
            .values()
            .next()
            .map(|n| n.common.as_str())
            .unwrap_or(&self.name.common)
    }

    pub fn capital_list(&self) -> String {
        self.capitals.join(", ")
    }

    /// Comma-joined currency names, `None` when the payload carried none.
    pub fn currency_names(&self) -> Option<String> {
        if self.currencies.is_empty() {
            return None;
        }
        Some(
            self.currencies
                .values()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    pub fn language_names(&self) -> Option<String> {
        if self.languages.is_empty() {
            return None;
        }
        Some(
            self.languages
                .values()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Which field set to request from upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProfile {
    /// Reduced field set for list rendering.
    Summary,
    /// Unrestricted field set for the detail view.
    Full,
}

impl FieldProfile {
    /// Value of the `fields` query parameter, if any.
    pub fn fields(self) -> Option<&'static str> {
        match self {
            FieldProfile::Summary => Some(SUMMARY_FIELDS),
            FieldProfile::Full => None,
        }
    }
}

/// The closed set of regions the user can filter by.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Region {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
}

/// `None` means unfiltered.
pub type RegionFilter = Option<Region>;

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Africa,
        Region::Americas,
        Region::Asia,
        Region::Europe,
        Region::Oceania,
    ];

    /// The region name exactly as upstream spells it in `Country::region`.
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::Americas => "Americas",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::Oceania => "Oceania",
        }
    }

    pub fn matches(self, country: &Country) -> bool {
        country.region == self.as_str()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Region::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown region: {wanted}"))
    }
}
