//! CLI argument definitions for entdb

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "entdb")]
#[command(about = "Celeste mod entity database builder and map collectible census", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download plugin-bearing mods and rebuild the entity database
    #[command(visible_alias = "s")]
    Scan {
        /// Directory for the entity database and error log (overrides config)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Directory for the temporary download archive (overrides config)
        #[arg(long)]
        scratch_dir: Option<PathBuf>,

        /// Download every mod without probing its file list first
        #[arg(long)]
        no_probe: bool,

        /// Stop after this many mods of interest
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Count collectibles in parsed map files (JSON from the map loader)
    #[command(visible_alias = "n")]
    Count {
        /// Directory containing parsed map .json files
        #[arg(default_value = "maps")]
        maps: PathBuf,

        /// Entity database to resolve display names (defaults to <cache>/entity_database.json)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Directory for excluded-entity reports (overrides config)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Set default scratch directory
        #[arg(long)]
        scratch_dir: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan_flags() {
        let cli = Cli::try_parse_from(["entdb", "scan", "--no-probe", "--limit", "5"]).unwrap();
        match cli.command {
            Commands::Scan { no_probe, limit, cache_dir, .. } => {
                assert!(no_probe);
                assert_eq!(limit, Some(5));
                assert!(cache_dir.is_none());
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_count_default_maps_dir() {
        let cli = Cli::try_parse_from(["entdb", "count"]).unwrap();
        match cli.command {
            Commands::Count { maps, database, .. } => {
                assert_eq!(maps, PathBuf::from("maps"));
                assert!(database.is_none());
            }
            _ => panic!("expected count"),
        }
    }
}
