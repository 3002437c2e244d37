#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Episode rating crawler for the IMDB legacy episode listing pages.
//!
//! The pipeline: [`crawl::crawl_show`] validates the show reference, runs
//! [`discover`] once to learn how the show's listings paginate, then walks
//! every pagination unit with [`fetch::Fetcher`], extracting records via
//! [`extract`] and normalizing air dates via [`dates`].
//!
//! Key constraints:
//! * Requests are strictly sequential and never retried; a failed download
//!   is fatal to the whole crawl. Politeness comes from the randomized
//!   settle delays in [`fetch`], not from concurrency.
//! * A unit whose page fails extraction is skipped whole, keeping the
//!   overall episode index gapless.

pub mod crawl;
pub mod dates;
pub mod discover;
pub mod extract;
pub mod fetch;
pub mod progress;

/// Errors that abort a crawl.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Building the HTTP client failed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A request could not be completed.
    #[error(
        "request for {url} failed: {source}; the site is likely rate \
         limiting this client, retry later or from a different network"
    )]
    Request {
        /// The URL that failed.
        url: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error(
        "HTTP {status} for {url}; the site is likely rate limiting this \
         client, retry later or from a different network"
    )]
    Status {
        /// The URL that was fetched.
        url: String,
        /// The response status code.
        status: reqwest::StatusCode,
    },

    /// The show reference contained no usable title id.
    #[error("no title id found in {input:?}; pass an id like tt0903747 or a title URL")]
    InvalidShowReference {
        /// The reference as given.
        input: String,
    },

    /// No navigation link answered with a recognizable pagination scheme.
    #[error("could not find season or year pagination for {title_id}")]
    NoPaginationScheme {
        /// The title being discovered.
        title_id: String,
    },

    /// A structural element this crawler depends on was missing.
    #[error("page structure changed: no {what} found")]
    MissingElement {
        /// Name of the missing element.
        what: &'static str,
    },

    /// Every pagination unit was removed as unknown, or none existed.
    #[error("no crawlable units for {title_id}")]
    NoCrawlableUnits {
        /// The title being discovered.
        title_id: String,
    },
}
