//! Per-mod entity id to display name map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entity ids of one mod mapped to their display names.
///
/// The first value recorded for an id is final: later sources never
/// overwrite it. This is what gives the localization table priority over
/// plugin sources, and Lua plugins priority over Julia ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModEntityMap {
    names: BTreeMap<String, String>,
}

impl ModEntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a display name unless the id is already resolved.
    ///
    /// Returns `true` if the name was stored.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) -> bool {
        match self.names.entry(id.into()) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(name.into());
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.names.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(id, display name)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }
}

impl FromIterator<(String, String)> for ModEntityMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = ModEntityMap::new();
        for (id, name) in iter {
            map.insert(id, name);
        }
        map
    }
}
