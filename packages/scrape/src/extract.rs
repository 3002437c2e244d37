//! Episode listing page extraction.
//!
//! Pulls the per-episode sequences out of one listing page's markup and
//! tags the result with a validity state. Extraction is purely structural:
//! the four primary sequences (positions, titles, ratings, air dates) must
//! agree in length for the page to be usable. Descriptions are secondary,
//! since trailing episodes often lack a synopsis, and get padded during the
//! merge instead.

use scraper::{Html, Selector};

/// Rating and vote count parsed from one episode's rating element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingVotes {
    /// Aggregate user rating, if the element carried one.
    pub rating: Option<f64>,
    /// Vote count. A rating rendered without a vote total counts as one
    /// vote; an unrated placeholder has neither.
    pub votes: Option<u64>,
}

impl RatingVotes {
    /// Applies the token rules to one rating element's text.
    ///
    /// Zero tokens is an unrated placeholder, one token is a rating with
    /// the vote count padded to 1, and two or more tokens are a rating
    /// followed by a vote total like `(4,321)`.
    fn from_element_text(text: &str) -> Self {
        let tokens: Vec<&str> = text.split_whitespace().collect();

        match tokens.as_slice() {
            [] => Self {
                rating: None,
                votes: None,
            },
            [rating] => Self {
                rating: rating.parse().ok(),
                votes: Some(1),
            },
            [rating, votes, ..] => Self {
                rating: rating.parse().ok(),
                votes: parse_vote_count(votes),
            },
        }
    }
}

/// Number formed by a token's digit characters (`"(4,321)"` parses to
/// `4321`). `None` when the token has no digits.
fn parse_vote_count(token: &str) -> Option<u64> {
    let digits: String = token.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Structural agreement of the four primary sequences on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageValidity {
    /// No primary sequence produced anything. Typical for a season that is
    /// announced but not yet released.
    Empty,
    /// All four primary sequences have the same non-zero length.
    Aligned {
        /// Number of episodes on the page.
        episodes: usize,
    },
    /// The primary sequences disagree in length.
    Mismatched {
        /// Position tiles found.
        positions: usize,
        /// Episode titles found.
        titles: usize,
        /// Rating elements found.
        ratings: usize,
        /// Air-date elements found.
        air_dates: usize,
    },
}

/// One listing page's parallel sequences, plus the computed validity.
#[derive(Debug, Clone)]
pub struct PageExtraction {
    /// Whitespace tokens of each episode's position tile, repaired.
    pub positions: Vec<Vec<String>>,
    /// Episode titles, trimmed.
    pub titles: Vec<String>,
    /// Parsed rating/vote pairs, in document order.
    pub ratings: Vec<RatingVotes>,
    /// Raw air-date strings, trimmed, not yet normalized.
    pub raw_air_dates: Vec<String>,
    /// Episode synopses, trimmed. May be shorter than the primaries.
    pub descriptions: Vec<String>,
    /// Whether the primary sequences line up.
    pub validity: PageValidity,
}

/// Unrated episodes render a placeholder star with a different class, so
/// the selector lists both forms; `select` yields matches in document
/// order, which keeps the sequence parallel to the other three.
const RATING_SELECTOR: &str = "div.ipl-rating-star.small, div.ipl-rating-star--placeholder";

/// Extracts the per-episode sequences from one listing page.
#[must_use]
pub fn extract_page(html: &str) -> PageExtraction {
    let document = Html::parse_document(html);

    let position_sel = Selector::parse("div.image").unwrap_or_else(|_| unreachable!());
    let title_sel = Selector::parse(r#"a[itemprop="name"]"#).unwrap_or_else(|_| unreachable!());
    let rating_sel = Selector::parse(RATING_SELECTOR).unwrap_or_else(|_| unreachable!());
    let air_date_sel = Selector::parse("div.airdate").unwrap_or_else(|_| unreachable!());
    let description_sel =
        Selector::parse("div.item_description").unwrap_or_else(|_| unreachable!());

    let positions: Vec<Vec<String>> = document
        .select(&position_sel)
        .map(|el| {
            let text = el.text().collect::<Vec<_>>().join("");
            let tokens = text.split_whitespace().map(ToOwned::to_owned).collect();
            repair_position_tokens(tokens)
        })
        .collect();

    let titles: Vec<String> = document
        .select(&title_sel)
        .map(|el| el.text().collect::<Vec<_>>().join("").trim().to_owned())
        .collect();

    let ratings: Vec<RatingVotes> = document
        .select(&rating_sel)
        .map(|el| {
            let text = el.text().collect::<Vec<_>>().join("");
            RatingVotes::from_element_text(&text)
        })
        .collect();

    let raw_air_dates: Vec<String> = document
        .select(&air_date_sel)
        .map(|el| el.text().collect::<Vec<_>>().join("").trim().to_owned())
        .collect();

    let descriptions: Vec<String> = document
        .select(&description_sel)
        .map(|el| el.text().collect::<Vec<_>>().join("").trim().to_owned())
        .collect();

    let validity = if positions.is_empty()
        && titles.is_empty()
        && ratings.is_empty()
        && raw_air_dates.is_empty()
    {
        PageValidity::Empty
    } else if positions.len() == titles.len()
        && titles.len() == ratings.len()
        && ratings.len() == raw_air_dates.len()
    {
        PageValidity::Aligned {
            episodes: positions.len(),
        }
    } else {
        PageValidity::Mismatched {
            positions: positions.len(),
            titles: titles.len(),
            ratings: ratings.len(),
            air_dates: raw_air_dates.len(),
        }
    };

    PageExtraction {
        positions,
        titles,
        ratings,
        raw_air_dates,
        descriptions,
        validity,
    }
}

/// Strips the overlay tokens from an "Add Image" position tile.
///
/// Episodes without a still render the tile as `Add Image S1, Ep3`; only
/// the trailing position label is wanted.
fn repair_position_tokens(mut tokens: Vec<String>) -> Vec<String> {
    if tokens.len() == 4 && tokens[0].eq_ignore_ascii_case("add") {
        tokens.drain(..2);
    }
    tokens
}
