//! Air-date normalization.
//!
//! Listing pages render air dates at whatever precision the site has on
//! file: `14 Mar 2006`, `Mar 2006`, or just `2006`. Every variant is
//! normalized to `MM/DD/YYYY` with omitted components defaulting to the
//! first of the period. Normalization is total: anything unrecognizable
//! becomes an empty string, never an error.

use chrono::format::{Parsed, StrftimeItems, parse};

/// Accepted input formats, tried in order. The first format that consumes
/// the whole string wins.
const FORMAT_CANDIDATES: &[&str] = &["%b %Y", "%Y", "%d %b %Y"];

/// Normalizes a raw air-date string to `MM/DD/YYYY`.
///
/// Periods are stripped first (the site abbreviates months as `Sep.`) and
/// surrounding whitespace is trimmed. `Mar 2006` becomes `03/01/2006` and
/// `2006` becomes `01/01/2006`. Returns an empty string when no format
/// matches.
#[must_use]
pub fn normalize_air_date(raw: &str) -> String {
    let cleaned = raw.replace('.', "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return String::new();
    }

    for format in FORMAT_CANDIDATES {
        let mut parsed = Parsed::new();
        if parse(&mut parsed, cleaned, StrftimeItems::new(format)).is_err() {
            continue;
        }

        // Omitted components fall back to the first of the period; the
        // setters leave fields the parse already filled untouched.
        let _ = parsed.set_month(1);
        let _ = parsed.set_day(1);

        if let Ok(date) = parsed.to_naive_date() {
            return date.format("%m/%d/%Y").to_string();
        }
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_date_normalizes() {
        assert_eq!(normalize_air_date("15 Mar 2006"), "03/15/2006");
    }

    #[test]
    fn month_year_defaults_day_to_first() {
        assert_eq!(normalize_air_date("Mar 2006"), "03/01/2006");
    }

    #[test]
    fn bare_year_defaults_month_and_day_to_first() {
        assert_eq!(normalize_air_date("2005"), "01/01/2005");
    }

    #[test]
    fn abbreviation_periods_are_stripped() {
        assert_eq!(normalize_air_date("7 Feb. 2005"), "02/07/2005");
        assert_eq!(normalize_air_date("Sep. 2010"), "09/01/2010");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(normalize_air_date("\n      14 Mar 2006\n      "), "03/14/2006");
    }

    #[test]
    fn single_digit_day_parses() {
        assert_eq!(normalize_air_date("5 Jan 1999"), "01/05/1999");
    }

    #[test]
    fn unrecognizable_input_becomes_empty() {
        assert_eq!(normalize_air_date("Unknown"), "");
        assert_eq!(normalize_air_date("March the 5th"), "");
        assert_eq!(normalize_air_date(""), "");
        assert_eq!(normalize_air_date("   "), "");
    }

    #[test]
    fn year_with_trailing_text_does_not_match() {
        assert_eq!(normalize_air_date("2006 or so"), "");
    }
}
