//! Map census command handler
//!
//! Tallies collectibles of every parsed map and names them through the
//! entity database.

use crate::file_utils::collect_files_with_extension;
use anyhow::{Context, Result};
use entdb::{Census, EntityDatabase, ParsedMap};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Handle `count`
pub fn handle(maps_dir: &Path, database_path: &Path, cache_dir: &Path) -> Result<()> {
    let database = EntityDatabase::load(database_path)
        .with_context(|| format!("Failed to load entity database {}", database_path.display()))?;
    let names = database.flatten();

    let maps = collect_files_with_extension(maps_dir, &["json"])?;
    println!("Found {} map(s)", maps.len());

    for map_path in &maps {
        println!("Scanning {}...", map_path.display());

        let content = fs::read_to_string(map_path)
            .with_context(|| format!("Failed to read {}", map_path.display()))?;
        let map = ParsedMap::from_json(&content)
            .with_context(|| format!("Failed to parse {}", map_path.display()))?;
        let census = Census::from_map(&map);

        println!("Scanning result:\n");
        println!("End On Heart: {}", map.ends_on_heart());
        print!("{}", render_counts(&census, &names));

        if census.total_excluded() > 0 {
            let report = write_excluded_report(&census, map_path, cache_dir)?;
            println!("Excluded entities written to {}", report.display());
        }
        println!();
    }

    Ok(())
}

/// Render totals and one line per counted entity, using display names when known
fn render_counts(census: &Census, names: &HashMap<String, String>) -> String {
    let mut out = format!(
        "Found: {} entities (excluded: {} entities)\n",
        census.total(),
        census.total_excluded()
    );
    for (id, count) in &census.counted {
        let label = names.get(id).map(String::as_str).unwrap_or(id);
        out.push_str(&format!(" - {}: x{}\n", label, count));
    }
    out
}

fn write_excluded_report(census: &Census, map_path: &Path, cache_dir: &Path) -> Result<std::path::PathBuf> {
    let stem = map_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("map");
    fs::create_dir_all(cache_dir)
        .with_context(|| format!("Failed to create {}", cache_dir.display()))?;

    let report = cache_dir.join(format!("{}.excluded.json", stem));
    let json = serde_json::to_string_pretty(&census.excluded)?;
    fs::write(&report, json).with_context(|| format!("Failed to write {}", report.display()))?;
    Ok(report)
}
