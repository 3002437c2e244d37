//! Pagination discovery.
//!
//! A show's episode listings are split either by season or by year, and the
//! only reliable way to learn which is to ask the site: fetch the title's
//! root page, collect the links from its season/year navigation block, and
//! probe them until one answers. The scheme of the first link that both
//! answers and names a scheme wins, with `year` checked before `season`; a
//! link that answers but names neither keeps the loop probing.

use scraper::{Html, Selector};

use ratings_map_scrape_models::{PaginationScheme, ShowContext};

use crate::{
    ScrapeError,
    fetch::{Fetcher, PAGE_SETTLE_SECS, PROBE_SETTLE_SECS},
};

/// Scheme origin for every URL the crawler builds.
pub const BASE_URL: &str = "https://www.imdb.com";

/// Learns how the show's episode listings paginate.
///
/// Fetches the title root page, probes its navigation links to settle on a
/// [`PaginationScheme`], enumerates the crawlable units (dropping the
/// literal `Unknown` entry before anything else is fetched), and reads the
/// canonical show title from the first remaining unit's listing page.
///
/// # Errors
///
/// * Any fetch failure, which is fatal
/// * [`ScrapeError::MissingElement`] if the navigation block, unit select,
///   or title heading is absent
/// * [`ScrapeError::NoPaginationScheme`] if no probe settles on a scheme
/// * [`ScrapeError::NoCrawlableUnits`] if no usable units remain
pub async fn discover(fetcher: &Fetcher, title_id: &str) -> Result<ShowContext, ScrapeError> {
    log::info!("discovering pagination for {title_id}");

    let root_url = format!("{BASE_URL}/title/{title_id}");
    let root_body = fetcher.fetch(&root_url, PAGE_SETTLE_SECS).await?;
    let hrefs = nav_link_hrefs(&root_body)?;

    // ── Probe for the pagination scheme ─────────────────────────────────
    let mut chosen: Option<(PaginationScheme, String)> = None;

    for (idx, href) in hrefs.iter().enumerate() {
        let url = absolute_url(href);
        let status = fetcher.probe(&url).await?;
        log::info!("probe {} of {}: HTTP {status} for {url}", idx + 1, hrefs.len());

        if status.is_success()
            && let Some(scheme) = classify_href(href)
        {
            chosen = Some((scheme, url));
            break;
        }
    }

    let Some((scheme, listing_url)) = chosen else {
        return Err(ScrapeError::NoPaginationScheme {
            title_id: title_id.to_owned(),
        });
    };

    // ── Enumerate units ─────────────────────────────────────────────────
    let listing_body = fetcher.fetch(&listing_url, PROBE_SETTLE_SECS).await?;
    let units = pagination_units(&listing_body, scheme)?;

    if units.is_empty() {
        return Err(ScrapeError::NoCrawlableUnits {
            title_id: title_id.to_owned(),
        });
    }

    log::info!("{title_id} paginates by {scheme} with {} units", units.len());

    // ── Read the canonical show title ───────────────────────────────────
    let mut show = ShowContext {
        title_id: title_id.to_owned(),
        base_url: BASE_URL.to_owned(),
        scheme,
        units,
        title: String::new(),
    };

    let first_unit_url = show.listing_url(&show.units[0]);
    let first_unit_body = fetcher.fetch(&first_unit_url, PAGE_SETTLE_SECS).await?;
    show.title = extract_show_title(&first_unit_body)?;

    log::info!("show title: {}", show.title);

    Ok(show)
}

/// Hrefs of the candidate links in the season/year navigation block, in
/// document order. Anchors without text are decoration and are skipped.
fn nav_link_hrefs(html: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);

    let nav_sel = Selector::parse("div.seasons-and-year-nav").unwrap_or_else(|_| unreachable!());
    let link_sel = Selector::parse("a[href]").unwrap_or_else(|_| unreachable!());

    let nav = document
        .select(&nav_sel)
        .next()
        .ok_or(ScrapeError::MissingElement {
            what: "seasons-and-year-nav block",
        })?;

    Ok(nav
        .select(&link_sel)
        .filter(|el| !el.text().collect::<Vec<_>>().join("").trim().is_empty())
        .filter_map(|el| el.value().attr("href").map(ToOwned::to_owned))
        .collect())
}

/// Resolves a (usually site-relative) navigation href.
fn absolute_url(href: &str) -> String {
    if href.starts_with('/') {
        format!("{BASE_URL}{href}")
    } else {
        href.to_owned()
    }
}

/// Scheme named by a navigation href, `year` taking precedence.
fn classify_href(href: &str) -> Option<PaginationScheme> {
    if href.contains("year") {
        Some(PaginationScheme::Year)
    } else if href.contains("season") {
        Some(PaginationScheme::Season)
    } else {
        None
    }
}

/// Unit tokens from the listing page's season/year select control, with
/// the literal `Unknown` entry removed.
fn pagination_units(html: &str, scheme: PaginationScheme) -> Result<Vec<String>, ScrapeError> {
    let (selector, what) = match scheme {
        PaginationScheme::Season => ("select#bySeason", "bySeason select"),
        PaginationScheme::Year => ("select#byYear", "byYear select"),
    };

    let document = Html::parse_document(html);
    let select_sel = Selector::parse(selector).unwrap_or_else(|_| unreachable!());

    let control = document
        .select(&select_sel)
        .next()
        .ok_or(ScrapeError::MissingElement { what })?;

    let text = control.text().collect::<Vec<_>>().join(" ");
    let mut units: Vec<String> = text.split_whitespace().map(ToOwned::to_owned).collect();
    units.retain(|unit| unit != "Unknown");

    Ok(units)
}

/// The show title from a listing page's heading, whitespace-collapsed.
fn extract_show_title(html: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    let title_sel = Selector::parse(r#"h3[itemprop="name"]"#).unwrap_or_else(|_| unreachable!());

    let heading = document
        .select(&title_sel)
        .next()
        .ok_or(ScrapeError::MissingElement {
            what: "show title heading",
        })?;

    let text = heading.text().collect::<Vec<_>>().join(" ");
    Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT_PAGE: &str = r#"
        <html><body>
        <div class="seasons-and-year-nav">
          <div>
            <h4>Seasons</h4>
            <a href="/title/tt0000001/episodes?season=1">1</a>
            <a href="/title/tt0000001/episodes?season=2">2</a>
          </div>
          <div>
            <h4>Years</h4>
            <a href="/title/tt0000001/episodes?year=2005">2005</a>
            <a href="/decorative"> </a>
          </div>
        </div>
        </body></html>
    "#;

    #[test]
    fn nav_links_collected_in_document_order() {
        let hrefs = nav_link_hrefs(ROOT_PAGE).unwrap();

        assert_eq!(
            hrefs,
            vec![
                "/title/tt0000001/episodes?season=1",
                "/title/tt0000001/episodes?season=2",
                "/title/tt0000001/episodes?year=2005",
            ]
        );
    }

    #[test]
    fn textless_anchors_are_skipped() {
        let hrefs = nav_link_hrefs(ROOT_PAGE).unwrap();

        assert!(!hrefs.iter().any(|href| href == "/decorative"));
    }

    #[test]
    fn missing_nav_block_is_an_error() {
        let result = nav_link_hrefs("<html><body><p>nothing here</p></body></html>");

        assert!(matches!(
            result,
            Err(ScrapeError::MissingElement {
                what: "seasons-and-year-nav block"
            })
        ));
    }

    #[test]
    fn year_href_takes_precedence_over_season() {
        assert_eq!(
            classify_href("/title/tt1/episodes?season=1&year=2005"),
            Some(PaginationScheme::Year)
        );
        assert_eq!(
            classify_href("/title/tt1/episodes?season=3"),
            Some(PaginationScheme::Season)
        );
        assert_eq!(classify_href("/title/tt1/episodes"), None);
    }

    #[test]
    fn relative_hrefs_resolve_against_the_site() {
        assert_eq!(
            absolute_url("/title/tt1/episodes?season=1"),
            "https://www.imdb.com/title/tt1/episodes?season=1"
        );
        assert_eq!(absolute_url("https://elsewhere.example/x"), "https://elsewhere.example/x");
    }

    #[test]
    fn units_come_from_the_select_control() {
        let html = r#"
            <select id="bySeason">
              <option value="1">1</option>
              <option value="2">2</option>
              <option value="3">3</option>
            </select>
        "#;

        let units = pagination_units(html, PaginationScheme::Season).unwrap();

        assert_eq!(units, vec!["1", "2", "3"]);
    }

    #[test]
    fn unknown_unit_is_dropped() {
        let html = r#"
            <select id="byYear">
              <option>2005</option>
              <option>2006</option>
              <option>Unknown</option>
            </select>
        "#;

        let units = pagination_units(html, PaginationScheme::Year).unwrap();

        assert_eq!(units, vec!["2005", "2006"]);
    }

    #[test]
    fn missing_select_is_an_error() {
        let result = pagination_units("<html></html>", PaginationScheme::Season);

        assert!(matches!(
            result,
            Err(ScrapeError::MissingElement {
                what: "bySeason select"
            })
        ));
    }

    #[test]
    fn show_title_whitespace_is_collapsed() {
        let html = "<h3 itemprop=\"name\">\n  Breaking\n\n  Bad\n</h3>";

        assert_eq!(extract_show_title(html).unwrap(), "Breaking Bad");
    }

    #[test]
    fn missing_title_heading_is_an_error() {
        assert!(matches!(
            extract_show_title("<html></html>"),
            Err(ScrapeError::MissingElement {
                what: "show title heading"
            })
        ));
    }
}
