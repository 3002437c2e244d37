#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spreadsheet export for crawled episode ratings.
//!
//! Writes the record table to a CSV file named after the show, with the
//! name sanitized for the host platform, and reads written files back so
//! callers can verify the artifact.

pub mod filename;
pub mod spreadsheet;

/// Errors from writing or reading an export file.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
