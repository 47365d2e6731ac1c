//! Persisted entity database.
//!
//! The database maps mod names to their [`ModEntityMap`] and carries the
//! wall-clock time of the run that produced it. It is rebuilt in full on
//! every run and written once, at the end.

use crate::diagnostics::ErrorLog;
use crate::entities::ModEntityMap;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// File name of the database inside the cache directory
pub const DATABASE_FILE: &str = "entity_database.json";

/// File name of the diagnostics log inside the cache directory
pub const ERROR_LOG_FILE: &str = "error";

/// Entity names of every scanned mod
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDatabase {
    /// Seconds since the Unix epoch when the scan finished
    pub scanned_timestamp: f64,

    /// Mod name -> entity id -> display name
    pub result: BTreeMap<String, ModEntityMap>,
}

impl EntityDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a mod's entities. Empty maps are not stored.
    ///
    /// Returns `true` if the mod was added.
    pub fn insert_mod(&mut self, mod_name: impl Into<String>, entities: ModEntityMap) -> bool {
        if entities.is_empty() {
            return false;
        }
        self.result.insert(mod_name.into(), entities);
        true
    }

    /// Set the scan timestamp to the current time
    pub fn stamp(&mut self) {
        self.scanned_timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
    }

    /// Number of entities across all mods
    pub fn entity_count(&self) -> usize {
        self.result.values().map(ModEntityMap::len).sum()
    }

    /// Fuse every mod into one id -> name lookup.
    ///
    /// Mods are visited in name order; an id defined by several mods takes
    /// the name from the last one.
    pub fn flatten(&self) -> HashMap<String, String> {
        let mut names = HashMap::new();
        for entities in self.result.values() {
            for (id, name) in entities.iter() {
                names.insert(id.to_string(), name.to_string());
            }
        }
        names
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a previously persisted database
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the database, replacing any previous file atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, self.to_json()?.as_bytes())
    }
}

/// Persist both run artifacts into the cache directory.
///
/// Both temporary files are written before either target is replaced, so a
/// failed write leaves the previous database and log untouched together.
pub fn persist_run(database: &EntityDatabase, log: &ErrorLog, cache_dir: &Path) -> Result<()> {
    let db_path = cache_dir.join(DATABASE_FILE);
    let log_path = cache_dir.join(ERROR_LOG_FILE);

    let db_tmp = stage(&db_path, database.to_json()?.as_bytes())?;
    let log_tmp = match stage(&log_path, log.to_text().as_bytes()) {
        Ok(tmp) => tmp,
        Err(e) => {
            let _ = fs::remove_file(&db_tmp);
            return Err(e);
        }
    };

    commit(&db_tmp, &db_path)?;
    commit(&log_tmp, &log_path)
}

/// Write to a sibling temporary file, then rename it over the target
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = stage(path, contents)?;
    commit(&tmp, path)
}

/// Write `contents` next to `path` and return the temporary file's path
fn stage(path: &Path, contents: &[u8]) -> Result<PathBuf> {
    let tmp = temporary_path(path);
    fs::write(&tmp, contents)?;
    Ok(tmp)
}

fn commit(tmp: &Path, path: &Path) -> Result<()> {
    if let Err(e) = fs::rename(tmp, path) {
        let _ = fs::remove_file(tmp);
        return Err(e.into());
    }
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
