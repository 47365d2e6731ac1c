//! Mod listing: which mods to scan and where to fetch them.
//!
//! Two documents drive selection. The custom entity catalog (JSON) lists
//! the GameBanana items known to ship custom entities, and the Everest
//! update registry (YAML) maps every mod name to its GameBanana item and
//! file ids.

use crate::extract::Dialect;
use crate::Result;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

/// Custom entity catalog
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    #[serde(rename = "modInfo", default)]
    pub mod_info: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "itemid")]
    pub item_id: u64,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// GameBanana item ids of interest
    pub fn item_ids(&self) -> HashSet<u64> {
        self.mod_info.iter().map(|entry| entry.item_id).collect()
    }
}

/// One mod of the Everest update registry. Other keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryEntry {
    #[serde(rename = "GameBananaId")]
    pub item_id: u64,

    #[serde(rename = "GameBananaFileId")]
    pub file_id: u64,
}

/// Everest update registry keyed by mod name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ModRegistry {
    pub mods: BTreeMap<String, RegistryEntry>,
}

impl ModRegistry {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// A mod selected for scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModCandidate {
    pub name: String,
    /// GameBanana item id
    pub item_id: u64,
    /// GameBanana file id of the archive to download
    pub file_id: u64,
}

/// Registry mods whose item id appears in the catalog, in name order
pub fn select_candidates(catalog: &Catalog, registry: &ModRegistry) -> Vec<ModCandidate> {
    let wanted = catalog.item_ids();
    registry
        .mods
        .iter()
        .filter(|(_, entry)| wanted.contains(&entry.item_id))
        .map(|(name, entry)| ModCandidate {
            name: name.clone(),
            item_id: entry.item_id,
            file_id: entry.file_id,
        })
        .collect()
}

/// Whether a hosted raw file listing shows an editor plugin directory
pub fn mentions_editor_plugin(file_list: &str) -> bool {
    Dialect::ALL
        .iter()
        .any(|dialect| file_list.contains(dialect.root()))
}
