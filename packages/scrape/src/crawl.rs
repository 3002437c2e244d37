//! Crawl orchestration.
//!
//! Walks every pagination unit of a show in order, strictly one request at
//! a time, merging each listing page into the overall record table. A unit
//! that fails extraction is skipped whole so the record numbering stays
//! gapless; a unit that fails to download aborts the crawl.

use std::sync::Arc;

use regex::Regex;

use ratings_map_scrape_models::{EpisodeRecord, ShowContext};

use crate::{
    ScrapeError,
    dates::normalize_air_date,
    discover,
    extract::{self, PageExtraction, PageValidity},
    fetch::{self, Fetcher, PAGE_SETTLE_SECS, PRE_FETCH_SECS},
    progress::ProgressCallback,
};

/// Average whole-second cost of one unit, for remaining-time estimates.
const EST_SECS_PER_UNIT: u64 = (*PRE_FETCH_SECS.start()
    + *PRE_FETCH_SECS.end()
    + *PAGE_SETTLE_SECS.start()
    + *PAGE_SETTLE_SECS.end())
    / 2;

/// Extracts the title id from a show reference.
///
/// Accepts a bare id (`tt0903747`) or any reference that names the site
/// and contains an id, such as a full title URL. Ids are seven or eight
/// digits.
///
/// # Errors
///
/// * [`ScrapeError::InvalidShowReference`] if no title id can be found
pub fn parse_title_id(input: &str) -> Result<String, ScrapeError> {
    let id_re = Regex::new(r"tt\d{7,8}").unwrap_or_else(|_| unreachable!());
    let trimmed = input.trim();

    if let Some(id) = id_re.find(trimmed)
        && (id.as_str() == trimmed || trimmed.to_ascii_lowercase().contains("imdb"))
    {
        return Ok(id.as_str().to_owned());
    }

    Err(ScrapeError::InvalidShowReference {
        input: input.to_owned(),
    })
}

/// Why one pagination unit contributed no records.
///
/// None of these abort the crawl. The unit is logged and skipped whole, so
/// a skipped unit never consumes overall indices.
#[derive(Debug, thiserror::Error)]
pub enum UnitSkip {
    /// The page loaded but carried no episode data at all.
    #[error("no episode data (the unit may be in progress, unreleased, or unrated)")]
    NoEpisodeData,

    /// The parallel sequences disagreed in length.
    #[error(
        "sequence mismatch: {positions} positions, {titles} titles, \
         {ratings} ratings, {air_dates} air dates"
    )]
    SequenceMismatch {
        /// Position tiles found.
        positions: usize,
        /// Episode titles found.
        titles: usize,
        /// Rating elements found.
        ratings: usize,
        /// Air-date elements found.
        air_dates: usize,
    },

    /// A position tile yielded no usable season/episode numbers.
    #[error("unusable position tile {tile:?}")]
    MalformedPosition {
        /// The offending tile's tokens, joined.
        tile: String,
    },
}

/// Converts one aligned page into records, numbering from `start_index`.
///
/// Merging is atomic: any unusable position tile rejects the whole unit,
/// so a unit either contributes a full page of records or none. Missing
/// trailing descriptions pad as empty strings.
///
/// # Errors
///
/// * [`UnitSkip::NoEpisodeData`] for an empty page
/// * [`UnitSkip::SequenceMismatch`] when the primary sequences disagree
/// * [`UnitSkip::MalformedPosition`] when a tile has no usable numbers
pub fn merge_unit(
    extraction: &PageExtraction,
    start_index: u32,
) -> Result<Vec<EpisodeRecord>, UnitSkip> {
    let episodes = match extraction.validity {
        PageValidity::Empty => return Err(UnitSkip::NoEpisodeData),
        PageValidity::Mismatched {
            positions,
            titles,
            ratings,
            air_dates,
        } => {
            return Err(UnitSkip::SequenceMismatch {
                positions,
                titles,
                ratings,
                air_dates,
            });
        }
        PageValidity::Aligned { episodes } => episodes,
    };

    let mut records = Vec::with_capacity(episodes);
    let mut next_index = start_index;

    for i in 0..episodes {
        let tokens = &extraction.positions[i];
        let (season, episode) =
            parse_position(tokens).ok_or_else(|| UnitSkip::MalformedPosition {
                tile: tokens.join(" "),
            })?;

        records.push(EpisodeRecord {
            overall_index: next_index,
            season,
            episode,
            title: extraction.titles[i].clone(),
            rating: extraction.ratings[i].rating,
            votes: extraction.ratings[i].votes,
            air_date: normalize_air_date(&extraction.raw_air_dates[i]),
            description: extraction.descriptions.get(i).cloned().unwrap_or_default(),
        });

        next_index += 1;
    }

    Ok(records)
}

/// Season and episode numbers from a repaired position tile.
///
/// Tiles render as `S1, Ep3`; only the digit characters of the first two
/// tokens are significant.
fn parse_position(tokens: &[String]) -> Option<(u32, u32)> {
    let season = parse_number(tokens.first()?)?;
    let episode = parse_number(tokens.get(1)?)?;
    Some((season, episode))
}

/// Number formed by a token's digit characters (`"S1,"` parses to `1`).
fn parse_number(token: &str) -> Option<u32> {
    let digits: String = token.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Everything a finished crawl produced.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// The discovered show context (title, scheme, units).
    pub show: ShowContext,
    /// All merged records, in crawl order.
    pub records: Vec<EpisodeRecord>,
}

/// Crawls every pagination unit of the referenced show.
///
/// Runs discovery once, then fetches each unit listing in order with the
/// politeness delays in [`crate::fetch`]. `limit` caps how many units are
/// visited; `progress` gets one tick per unit, merged or skipped.
///
/// # Errors
///
/// * [`ScrapeError::InvalidShowReference`] if `show_ref` has no title id
/// * Any discovery error
/// * The first fetch failure, which aborts the crawl
pub async fn crawl_show(
    fetcher: &Fetcher,
    show_ref: &str,
    limit: Option<usize>,
    progress: Option<Arc<dyn ProgressCallback>>,
) -> Result<CrawlOutcome, ScrapeError> {
    let title_id = parse_title_id(show_ref)?;
    let show = discover::discover(fetcher, &title_id).await?;

    let unit_count = limit.map_or(show.units.len(), |max| show.units.len().min(max));
    let units = &show.units[..unit_count];

    if let Some(p) = &progress {
        p.set_total(units.len() as u64);
    }

    let mut records: Vec<EpisodeRecord> = Vec::new();

    for (idx, unit) in units.iter().enumerate() {
        let remaining = (unit_count - idx) as u64;
        log::info!(
            "{} {unit} ({} of {unit_count}), about {}s remaining",
            show.scheme,
            idx + 1,
            remaining * EST_SECS_PER_UNIT
        );

        if let Some(p) = &progress {
            p.set_message(format!("{} {unit}", show.scheme));
        }

        fetch::settle(PRE_FETCH_SECS).await;

        let url = show.listing_url(unit);
        let body = fetcher.fetch(&url, PAGE_SETTLE_SECS).await?;
        let extraction = extract::extract_page(&body);

        let start_index = records.last().map_or(1, |r| r.overall_index + 1);
        match merge_unit(&extraction, start_index) {
            Ok(batch) => {
                log::info!("merged {} episodes from {} {unit}", batch.len(), show.scheme);
                records.extend(batch);
            }
            Err(skip) => {
                log::warn!("skipping {} {unit}: {skip}", show.scheme);
            }
        }

        if let Some(p) = &progress {
            p.inc(1);
        }
    }

    if let Some(p) = &progress {
        p.finish(format!(
            "{} episodes from {unit_count} units",
            records.len()
        ));
    }

    Ok(CrawlOutcome { show, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::RatingVotes;

    fn position(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_owned()).collect()
    }

    fn aligned_extraction() -> PageExtraction {
        PageExtraction {
            positions: vec![position(&["S1,", "Ep1"]), position(&["S1,", "Ep2"])],
            titles: vec!["Pilot".to_owned(), "Second Thoughts".to_owned()],
            ratings: vec![
                RatingVotes {
                    rating: Some(8.2),
                    votes: Some(4321),
                },
                RatingVotes {
                    rating: None,
                    votes: None,
                },
            ],
            raw_air_dates: vec!["7 Feb. 2005".to_owned(), "2005".to_owned()],
            descriptions: vec!["The one that starts it all.".to_owned()],
            validity: PageValidity::Aligned { episodes: 2 },
        }
    }

    fn empty_extraction() -> PageExtraction {
        PageExtraction {
            positions: vec![],
            titles: vec![],
            ratings: vec![],
            raw_air_dates: vec![],
            descriptions: vec![],
            validity: PageValidity::Empty,
        }
    }

    #[test]
    fn accepts_bare_title_ids() {
        assert_eq!(parse_title_id("tt0903747").unwrap(), "tt0903747");
        assert_eq!(parse_title_id("tt12345678").unwrap(), "tt12345678");
        assert_eq!(parse_title_id("  tt0903747  ").unwrap(), "tt0903747");
    }

    #[test]
    fn accepts_title_urls() {
        assert_eq!(
            parse_title_id("https://www.imdb.com/title/tt0903747/").unwrap(),
            "tt0903747"
        );
        assert_eq!(
            parse_title_id("https://IMDB.com/title/tt0041038").unwrap(),
            "tt0041038"
        );
    }

    #[test]
    fn rejects_references_without_a_title_id() {
        assert!(matches!(
            parse_title_id("Breaking Bad"),
            Err(ScrapeError::InvalidShowReference { .. })
        ));
        assert!(matches!(
            parse_title_id("tt123"),
            Err(ScrapeError::InvalidShowReference { .. })
        ));
    }

    #[test]
    fn rejects_an_id_buried_in_unrelated_text() {
        assert!(matches!(
            parse_title_id("see tt0903747 for details"),
            Err(ScrapeError::InvalidShowReference { .. })
        ));
    }

    #[test]
    fn merge_numbers_records_from_start_index() {
        let records = merge_unit(&aligned_extraction(), 4).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].overall_index, 4);
        assert_eq!(records[1].overall_index, 5);
    }

    #[test]
    fn merge_coerces_position_tokens_to_numbers() {
        let records = merge_unit(&aligned_extraction(), 1).unwrap();

        assert_eq!(records[0].season, 1);
        assert_eq!(records[0].episode, 1);
        assert_eq!(records[1].episode, 2);
    }

    #[test]
    fn merge_normalizes_air_dates() {
        let records = merge_unit(&aligned_extraction(), 1).unwrap();

        assert_eq!(records[0].air_date, "02/07/2005");
        assert_eq!(records[1].air_date, "01/01/2005");
    }

    #[test]
    fn merge_pads_missing_descriptions() {
        let records = merge_unit(&aligned_extraction(), 1).unwrap();

        assert_eq!(records[0].description, "The one that starts it all.");
        assert_eq!(records[1].description, "");
    }

    #[test]
    fn empty_page_is_skipped() {
        assert!(matches!(
            merge_unit(&empty_extraction(), 1),
            Err(UnitSkip::NoEpisodeData)
        ));
    }

    #[test]
    fn mismatched_page_is_skipped() {
        let mut extraction = aligned_extraction();
        extraction.validity = PageValidity::Mismatched {
            positions: 2,
            titles: 1,
            ratings: 2,
            air_dates: 2,
        };

        assert!(matches!(
            merge_unit(&extraction, 1),
            Err(UnitSkip::SequenceMismatch { titles: 1, .. })
        ));
    }

    #[test]
    fn malformed_position_rejects_the_whole_unit() {
        let mut extraction = aligned_extraction();
        extraction.positions[1] = position(&["Special"]);

        assert!(matches!(
            merge_unit(&extraction, 1),
            Err(UnitSkip::MalformedPosition { .. })
        ));
    }

    #[test]
    fn index_stays_gapless_across_skipped_units() {
        let mut records = Vec::new();

        let first = merge_unit(&aligned_extraction(), 1).unwrap();
        records.extend(first);

        let start = records.last().map_or(1, |r| r.overall_index + 1);
        assert!(merge_unit(&empty_extraction(), start).is_err());

        let start = records.last().map_or(1, |r| r.overall_index + 1);
        let third = merge_unit(&aligned_extraction(), start).unwrap();
        records.extend(third);

        let indices: Vec<u32> = records.iter().map(|r| r.overall_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn position_numbers_ignore_punctuation() {
        assert_eq!(parse_number("S1,"), Some(1));
        assert_eq!(parse_number("Ep12"), Some(12));
        assert_eq!(parse_number("Ep"), None);
    }
}
