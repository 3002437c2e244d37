//! CSV writing and readback.
//!
//! One row per episode in crawl order, headed by the column names from the
//! record type's serde renames. Reading a written file back yields the
//! same records.

use std::path::{Path, PathBuf};

use ratings_map_scrape_models::EpisodeRecord;

use crate::{ExportError, filename::safe_filename};

/// Column headers, matching the serde renames on [`EpisodeRecord`]. Only
/// written explicitly when there are no records to derive them from.
const HEADERS: [&str; 8] = [
    "ET",
    "SX",
    "EX",
    "Episode Title",
    "Rating",
    "Votes",
    "Air Date",
    "Description",
];

/// Writes `records` to `{dir}/{base_name}.csv`, creating `dir` if needed.
///
/// `base_name` is sanitized for the host platform first. The header row is
/// written even when `records` is empty. Returns the path of the written
/// file.
///
/// # Errors
///
/// * If the directory cannot be created
/// * If the file cannot be written
pub fn write_records(
    records: &[EpisodeRecord],
    dir: &Path,
    base_name: &str,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(format!("{}.csv", safe_filename(base_name)));
    let mut writer = csv::Writer::from_path(&path)?;

    if records.is_empty() {
        writer.write_record(HEADERS)?;
    }

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    log::info!("wrote {} records to {}", records.len(), path.display());

    Ok(path)
}

/// Reads records back from a file produced by [`write_records`].
///
/// # Errors
///
/// * If the file cannot be opened
/// * If a row fails to deserialize
pub fn read_records(path: &Path) -> Result<Vec<EpisodeRecord>, ExportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for row in reader.deserialize() {
        records.push(row?);
    }

    Ok(records)
}
