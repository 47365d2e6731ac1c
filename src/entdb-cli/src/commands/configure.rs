//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up entdb defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Handle the configure command
pub fn handle(cache_dir: Option<PathBuf>, scratch_dir: Option<PathBuf>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if cache_dir.is_none() && scratch_dir.is_none() {
        show_usage();
        return Ok(());
    }

    apply(&mut config, cache_dir, scratch_dir);
    config.save()?;

    println!("Configuration saved");
    show_config(&config);
    Ok(())
}

fn apply(config: &mut Config, cache_dir: Option<PathBuf>, scratch_dir: Option<PathBuf>) {
    if let Some(dir) = cache_dir {
        config.cache_dir = Some(dir);
    }
    if let Some(dir) = scratch_dir {
        config.scratch_dir = Some(dir);
    }
}

/// Display current configuration
fn show_config(config: &Config) {
    println!("Cache directory:   {}", config.cache_dir().display());
    println!("Scratch directory: {}", config.scratch_dir().display());
    println!("Probe file lists:  {}", config.probe());
    println!("Catalog:           {}", config.catalog_url());
    println!("Updater index:     {}", config.updater_index_url());
    println!("Archive mirror:    {}", config.mirror_url());
    println!("File list:         {}", config.file_list_url());

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: entdb configure --cache-dir DIR [--scratch-dir DIR]");
    println!("   or: entdb configure --show");
}
