//! Collectible census over parsed maps.
//!
//! Maps are read as JSON documents produced by an external map loader. Each
//! entity is classified by name into counted collectibles, excluded
//! look-alikes (doors, fake hearts, ...) or unrelated entities, and a few
//! vanilla entities are folded into the names players know them by.

use crate::Result;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Substrings that mark an entity name as a collectible
pub const COLLECTIBLE_KEYWORDS: [&str; 7] = [
    "berry",
    "heart",
    "cassette",
    "miniheart",
    "blackgem",
    "memorialtextcontroller",
    "key",
];

/// Substrings that mark a collectible-looking name as something else
pub const EXCLUDED_KEYWORDS: [&str; 6] = ["block", "door", "gate", "fake", "respawn", "berrytoflag"];

/// A parsed map document
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedMap {
    pub map: MapLayout,

    #[serde(default)]
    pub data: MapData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapLayout {
    #[serde(default)]
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Room {
    #[serde(default)]
    pub entities: Vec<MapEntity>,
}

/// One placed entity with its attribute data
#[derive(Debug, Clone, Deserialize)]
pub struct MapEntity {
    pub name: String,

    #[serde(default)]
    pub data: Map<String, Value>,
}

/// Map-level metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapData {
    #[serde(default)]
    pub meta: Option<Value>,
}

impl ParsedMap {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the chapter ends when the crystal heart is collected
    pub fn ends_on_heart(&self) -> bool {
        self.data
            .meta
            .as_ref()
            .and_then(|meta| meta.get("HeartIsEnd"))
            .map(is_truthy)
            .unwrap_or(false)
    }
}

/// How one entity is tallied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Counted under the given canonical name
    Counted(String),
    /// Looks like a collectible but is not one
    Excluded,
    /// Not collectible-related
    Ignored,
}

impl MapEntity {
    fn flag(&self, key: &str) -> bool {
        self.data.get(key).map(is_truthy).unwrap_or(false)
    }

    /// Classify this entity for the census
    pub fn classify(&self) -> Classification {
        let lower = self.name.to_lowercase();
        if !COLLECTIBLE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return Classification::Ignored;
        }
        if EXCLUDED_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return Classification::Excluded;
        }

        let heart_like = self.name == "blackGem" || lower.contains("heart");
        if heart_like && (self.flag("fake") || self.flag("fakeHeartDialog")) {
            return Classification::Excluded;
        }

        let name = match self.name.as_str() {
            "strawberry" if self.flag("moon") => "MoonBerry",
            "strawberry" if self.flag("winged") => "WingedStrawberry",
            "blackGem" | "reflectionHeartStatue" => "CrystalHeart",
            "memorialTextController" => "WingedGoldenBerry",
            other => other,
        };
        Classification::Counted(name.to_string())
    }
}

/// Collectible tallies for one map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Census {
    /// Canonical name -> count
    pub counted: BTreeMap<String, u64>,
    /// Raw entity name -> count
    pub excluded: BTreeMap<String, u64>,
}

impl Census {
    /// Tally every entity of every room
    pub fn from_rooms(rooms: &[Room]) -> Self {
        let mut census = Census::default();
        for entity in rooms.iter().flat_map(|room| room.entities.iter()) {
            match entity.classify() {
                Classification::Counted(name) => *census.counted.entry(name).or_default() += 1,
                Classification::Excluded => {
                    *census.excluded.entry(entity.name.clone()).or_default() += 1
                }
                Classification::Ignored => {}
            }
        }
        census
    }

    pub fn from_map(map: &ParsedMap) -> Self {
        Self::from_rooms(&map.map.rooms)
    }

    pub fn total(&self) -> u64 {
        self.counted.values().sum()
    }

    pub fn total_excluded(&self) -> u64 {
        self.excluded.values().sum()
    }
}

/// Truthiness of a JSON attribute value, as map attribute flags use it
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
