mod cli;
mod commands;
mod config;
mod file_utils;
mod http;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            cache_dir,
            scratch_dir,
            no_probe,
            limit,
        } => {
            let config = Config::load()?;
            let options =
                commands::scan::ScanOptions::resolve(&config, cache_dir, scratch_dir, no_probe, limit);
            commands::scan::handle(&config, options)?;
        }

        Commands::Count {
            maps,
            database,
            cache_dir,
        } => {
            let config = Config::load()?;
            let cache_dir = cache_dir.unwrap_or_else(|| config.cache_dir());
            let database = database.unwrap_or_else(|| cache_dir.join(entdb::DATABASE_FILE));
            commands::count::handle(&maps, &database, &cache_dir)?;
        }

        Commands::Configure {
            cache_dir,
            scratch_dir,
            show,
        } => {
            commands::configure::handle(cache_dir, scratch_dir, show)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
