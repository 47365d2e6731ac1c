//! Entity database scan command handler
//!
//! Fetches the mods of interest, scans them one at a time and writes the
//! database and error log at the end of the run.

use crate::config::Config;
use crate::http::GameBananaClient;
use anyhow::{Context, Result};
use entdb::{Accumulator, RunStats};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the reused download inside the scratch directory
const SCRATCH_ARCHIVE: &str = "mod.zip";

pub struct ScanOptions {
    pub cache_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub probe: bool,
    pub limit: Option<usize>,
}

impl ScanOptions {
    /// Merge command-line overrides into the configured defaults
    pub fn resolve(
        config: &Config,
        cache_dir: Option<PathBuf>,
        scratch_dir: Option<PathBuf>,
        no_probe: bool,
        limit: Option<usize>,
    ) -> Self {
        Self {
            cache_dir: cache_dir.unwrap_or_else(|| config.cache_dir()),
            scratch_dir: scratch_dir.unwrap_or_else(|| config.scratch_dir()),
            probe: config.probe() && !no_probe,
            limit,
        }
    }
}

/// Handle `scan`
pub fn handle(config: &Config, options: ScanOptions) -> Result<()> {
    ensure_dir(&options.cache_dir)?;
    ensure_dir(&options.scratch_dir)?;

    let mut client = GameBananaClient::new(config);
    let mut candidates = client
        .fetch_candidates(config.catalog_url(), config.updater_index_url())
        .context("Failed to fetch the mod listing")?;

    if let Some(limit) = options.limit {
        candidates.truncate(limit);
    }
    tracing::info!("{} mods of interest", candidates.len());

    let mut accumulator =
        Accumulator::new(options.scratch_dir.join(SCRATCH_ARCHIVE)).with_probe(options.probe);
    accumulator.run(&mut client, &candidates);

    let stats = accumulator.stats();
    let (database, log) = accumulator.finish();
    entdb::persist_run(&database, &log, &options.cache_dir).with_context(|| {
        format!("Failed to write results to {}", options.cache_dir.display())
    })?;

    print_summary(&stats, database.result.len(), database.entity_count(), log.len());
    println!(
        "Database written to {}",
        options.cache_dir.join(entdb::DATABASE_FILE).display()
    );
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

fn print_summary(stats: &RunStats, mods: usize, entities: usize, diagnostics: usize) {
    println!("\nScan complete:");
    println!("  Mods scanned:  {}", stats.scanned);
    println!("  Mods bypassed: {}", stats.bypassed);
    println!("  Mods empty:    {}", stats.empty);
    println!("  Mods failed:   {}", stats.failed);
    println!("  Entities:      {} across {} mods", entities, mods);
    println!("  Diagnostics:   {}", diagnostics);
}
