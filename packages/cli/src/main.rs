#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the episode ratings crawler.
//!
//! Crawls one show's per-episode ratings and writes them to
//! `{out_dir}/{show title} - IMDB.csv`.
//!
//! Uses `indicatif-log-bridge` (via [`ratings_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the progress bar never fight for the terminal.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use ratings_map_cli_utils::{IndicatifProgress, MultiProgress};
use ratings_map_scrape::{crawl, fetch::Fetcher, progress::null_progress};

#[derive(Parser)]
#[command(name = "ratings-map", about = "Per-episode ratings crawler")]
struct Cli {
    /// Show reference: a title id like tt0903747, or a full title URL
    show: String,

    /// Directory the spreadsheet is written to
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    /// Crawl at most this many pagination units (for testing)
    #[arg(long)]
    limit: Option<usize>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let multi = ratings_map_cli_utils::init_logger();
    let cli = Cli::parse();

    if let Err(e) = run(&multi, &cli).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(multi: &MultiProgress, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    let fetcher = Fetcher::new()?;
    let progress = if cli.quiet {
        null_progress()
    } else {
        IndicatifProgress::crawl_bar(multi, "discovering show")
    };

    let outcome =
        match crawl::crawl_show(&fetcher, &cli.show, cli.limit, Some(progress.clone())).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // Clear the bar so it doesn't linger over the error output.
                progress.finish_and_clear();
                return Err(e.into());
            }
        };

    let base_name = format!("{} - IMDB", outcome.show.title);
    let path =
        ratings_map_export::spreadsheet::write_records(&outcome.records, &cli.out_dir, &base_name)?;

    log::info!(
        "crawled {} episodes of {} in {:?}; spreadsheet at {}",
        outcome.records.len(),
        outcome.show.title,
        start.elapsed(),
        path.display()
    );

    Ok(())
}
