//! Rate-limited page fetcher.
//!
//! One request at a time, a mandatory randomized settle delay after every
//! successful page download, and no retries: a failed request is fatal to
//! the whole crawl. The delay ranges are constants, not configuration.

use std::{ops::RangeInclusive, time::Duration};

use rand::Rng;

use crate::ScrapeError;

/// Settle delay after the listing fetch that confirms a pagination scheme
/// (seconds). The longest pause of the crawl, taken exactly once.
pub const PROBE_SETTLE_SECS: RangeInclusive<u64> = 8..=15;

/// Settle delay after every other full page download (seconds).
pub const PAGE_SETTLE_SECS: RangeInclusive<u64> = 1..=5;

/// Extra margin slept before each unit fetch (seconds).
pub const PRE_FETCH_SECS: RangeInclusive<u64> = 1..=2;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sleeps for a uniformly random whole-second duration from `range`.
pub async fn settle(range: RangeInclusive<u64>) {
    let secs = rand::thread_rng().gen_range(range);
    tokio::time::sleep(Duration::from_secs(secs)).await;
}

/// HTTP client wrapper enforcing the crawl's politeness rules.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Creates a fetcher with the crawler's user agent and request timeout.
    ///
    /// # Errors
    ///
    /// * If the underlying HTTP client cannot be constructed
    pub fn new() -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ratings-map/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    /// Downloads a page, then settles for a random delay drawn from
    /// `settle_range`.
    ///
    /// # Errors
    ///
    /// * If the request fails or times out
    /// * If the server answers with a non-success status
    pub async fn fetch(
        &self,
        url: &str,
        settle_range: RangeInclusive<u64>,
    ) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScrapeError::Request {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_owned(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| ScrapeError::Request {
            url: url.to_owned(),
            source,
        })?;

        log::debug!("fetched {url} ({} bytes)", body.len());
        settle(settle_range).await;

        Ok(body)
    }

    /// Checks a URL with a plain status request.
    ///
    /// The body is never read and no settle delay is taken, so probing a
    /// handful of candidate links stays cheap.
    ///
    /// # Errors
    ///
    /// * If the request fails or times out
    pub async fn probe(&self, url: &str) -> Result<reqwest::StatusCode, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScrapeError::Request {
                url: url.to_owned(),
                source,
            })?;

        Ok(response.status())
    }
}
