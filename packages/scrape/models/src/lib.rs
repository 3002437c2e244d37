#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Episode rating record schema and show pagination context.
//!
//! The crawler produces [`EpisodeRecord`] rows and the export layer writes
//! them out verbatim, so the serde renames on this type are the spreadsheet's
//! column headers. [`ShowContext`] carries everything discovery learned about
//! a show: how its episode listings paginate and which units exist.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sentinel written for a missing rating or vote count.
pub const NA: &str = "N/A";

/// How a show's episode listing pages are partitioned.
///
/// The lowercase `Display` form is the query parameter name in listing URLs
/// (`?season=1` vs `?year=2005`), so the variants must stay in sync with the
/// site's URL scheme.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaginationScheme {
    /// Episodes grouped by production season (`?season=N`).
    Season,
    /// Episodes grouped by original air year (`?year=YYYY`).
    Year,
}

/// Everything discovery learned about one show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowContext {
    /// The site's title identifier (e.g., `tt0903747`).
    pub title_id: String,
    /// Scheme origin for listing URLs, without a trailing slash.
    pub base_url: String,
    /// How this show's episode listings paginate.
    pub scheme: PaginationScheme,
    /// Crawlable unit tokens (season numbers or years), in page order, with
    /// the literal `Unknown` entry already removed.
    pub units: Vec<String>,
    /// Canonical show title as rendered on the listing pages.
    pub title: String,
}

impl ShowContext {
    /// URL of the episode listing page for one pagination unit.
    #[must_use]
    pub fn listing_url(&self, unit: &str) -> String {
        format!(
            "{}/title/{}/episodes?{}={unit}",
            self.base_url, self.title_id, self.scheme
        )
    }
}

/// One episode's rating data, in spreadsheet column order.
///
/// `overall_index` is assigned by the crawl and is gapless: the records of a
/// full run are numbered `1..=len` with no holes, because units that fail
/// extraction contribute nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Position in the overall crawl output, starting at 1.
    #[serde(rename = "ET")]
    pub overall_index: u32,
    /// Pagination unit the episode came from (season number or air year).
    #[serde(rename = "SX")]
    pub season: u32,
    /// Episode number within the unit.
    #[serde(rename = "EX")]
    pub episode: u32,
    /// Episode title, trimmed.
    #[serde(rename = "Episode Title")]
    pub title: String,
    /// Aggregate user rating. `None` renders as [`NA`].
    #[serde(rename = "Rating", with = "na_cell")]
    pub rating: Option<f64>,
    /// Number of rating votes. `None` renders as [`NA`].
    #[serde(rename = "Votes", with = "na_cell")]
    pub votes: Option<u64>,
    /// Normalized air date (`MM/DD/YYYY`), or empty when unparseable.
    #[serde(rename = "Air Date")]
    pub air_date: String,
    /// Episode synopsis, trimmed. Empty when the page had none.
    #[serde(rename = "Description")]
    pub description: String,
}

/// Serde helpers rendering `None` as the [`NA`] spreadsheet sentinel.
pub mod na_cell {
    use std::{fmt::Display, str::FromStr};

    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::NA;

    /// Writes the value itself, or [`NA`] for `None`.
    ///
    /// # Errors
    ///
    /// * If the underlying serializer fails
    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        match value {
            Some(inner) => serializer.collect_str(inner),
            None => serializer.serialize_str(NA),
        }
    }

    /// Reads [`NA`] (or an empty cell) back as `None`.
    ///
    /// # Errors
    ///
    /// * If the cell is neither the sentinel nor a parseable value
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let cell = String::deserialize(deserializer)?;

        if cell == NA || cell.is_empty() {
            return Ok(None);
        }

        cell.parse().map(Some).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_displays_as_query_parameter_name() {
        assert_eq!(PaginationScheme::Season.to_string(), "season");
        assert_eq!(PaginationScheme::Year.to_string(), "year");
    }

    #[test]
    fn listing_url_includes_scheme_and_unit() {
        let show = ShowContext {
            title_id: "tt0903747".to_owned(),
            base_url: "https://www.imdb.com".to_owned(),
            scheme: PaginationScheme::Season,
            units: vec!["1".to_owned(), "2".to_owned()],
            title: "Breaking Bad".to_owned(),
        };

        assert_eq!(
            show.listing_url("2"),
            "https://www.imdb.com/title/tt0903747/episodes?season=2"
        );
    }

    #[test]
    fn listing_url_year_scheme() {
        let show = ShowContext {
            title_id: "tt0041038".to_owned(),
            base_url: "https://www.imdb.com".to_owned(),
            scheme: PaginationScheme::Year,
            units: vec!["1949".to_owned()],
            title: "The Lone Ranger".to_owned(),
        };

        assert_eq!(
            show.listing_url("1949"),
            "https://www.imdb.com/title/tt0041038/episodes?year=1949"
        );
    }
}
