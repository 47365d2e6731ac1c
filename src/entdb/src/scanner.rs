//! Archive scanner: resolves every entity of one mod archive.
//!
//! The localization table is loaded first. Plugin sources are then visited
//! dialect by dialect in archive order, and each resolved id is merged with
//! first-writer-wins semantics.

use crate::archive::ArchiveReader;
use crate::diagnostics::{Diagnostic, ErrorLog};
use crate::entities::ModEntityMap;
use crate::extract::{decode_content, Dialect};
use crate::localization::{find_localization_member, load_localization};
use crate::Result;

/// Result of scanning one archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Resolved entity names
    pub entities: ModEntityMap,

    /// Diagnostics for files that could not be resolved
    pub log: ErrorLog,

    /// Whether the archive shipped an English localization table
    pub has_localization: bool,
}

/// Scan a mod archive for entity ids and display names.
///
/// Only failures to list or read members are errors. Plugin files that do
/// not match the expected patterns are recorded in the outcome's log, and
/// only when no localization table was present.
pub fn scan_archive<A: ArchiveReader + ?Sized>(archive: &mut A) -> Result<ScanOutcome> {
    let members = archive.member_names()?;
    let mut outcome = ScanOutcome::default();

    if let Some(lang_member) = find_localization_member(&members) {
        let text = decode_content(&archive.read_member(lang_member)?);
        outcome.entities = load_localization(&text);
        outcome.has_localization = true;
        tracing::debug!(
            "Loaded {} names from {}",
            outcome.entities.len(),
            lang_member
        );
    } else {
        tracing::warn!("No localization table, relying on plugin sources only");
    }

    for dialect in Dialect::ALL {
        let sources: Vec<&String> = members.iter().filter(|m| dialect.matches_path(m)).collect();
        tracing::debug!("{} {} sources", sources.len(), dialect.language());
        for member in sources {
            let text = decode_content(&archive.read_member(member)?);
            resolve_source(dialect, member, &text, &mut outcome);
        }
    }

    Ok(outcome)
}

/// Merge the entity declared by one plugin source into the outcome
fn resolve_source(dialect: Dialect, file: &str, text: &str, outcome: &mut ScanOutcome) {
    let Some(id) = dialect.extract_id(text) else {
        if !outcome.has_localization {
            outcome.log.push(Diagnostic::UnresolvedIdentifier {
                file: file.to_string(),
            });
        }
        return;
    };

    if outcome.entities.contains(&id) {
        return;
    }

    match dialect.extract_name(text) {
        Some(name) => {
            outcome.entities.insert(id, name);
        }
        None if !outcome.has_localization => {
            outcome.log.push(Diagnostic::UnresolvedName {
                id,
                file: file.to_string(),
            });
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::tests::build_zip;
    use crate::archive::MemoryArchive;
    use std::io::Cursor;

    const LUA_HEART: &str = "local crystalHeart = {}\n\
        crystalHeart.name = \"crystalHeart\"\n\
        crystalHeart.placements = {\n    name = \"Crystal Heart (classic)\",\n}\n\
        return crystalHeart\n";

    const LUA_NO_NAME: &str = "local warp = {}\nwarp.name = \"MyMod/Warp\"\nreturn warp\n";

    const LUA_HELPER: &str = "local utils = {}\nreturn utils\n";

    const JULIA_HEART: &str = "@mapdef Entity \"crystalHeart\" Heart(x::Integer, y::Integer)\n\
        const placements = Ahorn.PlacementDict(\n    \"Heart Gem\" => Ahorn.EntityPlacement(\n        Heart\n    )\n)\n";

    const JULIA_KEY: &str = "@mapdef Entity \"MyMod/Key\" Key(x::Integer, y::Integer)\n\
        const placements = Ahorn.PlacementDict(\n    \"Key (gold)\" => Ahorn.EntityPlacement(\n        Key\n    )\n)\n";

    #[test]
    fn test_lua_scenario() {
        let mut archive = MemoryArchive::new().with("Loenn/entities/crystalHeart.lua", LUA_HEART);
        let outcome = scan_archive(&mut archive).unwrap();

        assert_eq!(outcome.entities.get("crystalHeart"), Some("Crystal Heart"));
        assert!(outcome.log.is_empty());
        assert!(!outcome.has_localization);
    }

    #[test]
    fn test_unmatched_julia_without_localization() {
        let mut archive = MemoryArchive::new().with("Ahorn/entities/broken.jl", "module Broken\nend\n");
        let outcome = scan_archive(&mut archive).unwrap();

        assert!(outcome.entities.is_empty());
        assert_eq!(outcome.log.to_text(), "ID: NA, file Ahorn/entities/broken.jl\n");
    }

    #[test]
    fn test_missing_name_without_localization() {
        let mut archive = MemoryArchive::new().with("Loenn/triggers/warp.lua", LUA_NO_NAME);
        let outcome = scan_archive(&mut archive).unwrap();

        assert!(outcome.entities.is_empty());
        assert_eq!(
            outcome.log.iter().collect::<Vec<_>>(),
            vec![&Diagnostic::UnresolvedName {
                id: "MyMod/Warp".to_string(),
                file: "Loenn/triggers/warp.lua".to_string(),
            }]
        );
    }

    #[test]
    fn test_localization_silences_diagnostics() {
        let mut archive = MemoryArchive::new()
            .with("Loenn/lang/en_gb.lang", "triggers.MyMod/Warp.name=Warp Trigger\n")
            .with("Loenn/triggers/warp.lua", LUA_NO_NAME)
            .with("Loenn/entities/helper.lua", LUA_HELPER)
            .with("Loenn/entities/gate.lua", "local g = {}\ng.name = \"MyMod/Gate\"\nreturn g\n");
        let outcome = scan_archive(&mut archive).unwrap();

        assert!(outcome.has_localization);
        assert!(outcome.log.is_empty());
        assert_eq!(outcome.entities.get("MyMod/Warp"), Some("Warp Trigger"));
        assert_eq!(outcome.entities.get("MyMod/Gate"), None);
    }

    #[test]
    fn test_localization_takes_priority_over_sources() {
        let mut archive = MemoryArchive::new()
            .with("Loenn/entities/crystalHeart.lua", LUA_HEART)
            .with("Ahorn/lang/en_gb.lang", "entities.crystalHeart.name=Heart of the Mountain\n");
        let outcome = scan_archive(&mut archive).unwrap();

        assert_eq!(
            outcome.entities.get("crystalHeart"),
            Some("Heart of the Mountain")
        );
    }

    #[test]
    fn test_lua_processed_before_julia() {
        let mut archive = MemoryArchive::new()
            .with("Ahorn/entities/heart.jl", JULIA_HEART)
            .with("Loenn/entities/crystalHeart.lua", LUA_HEART)
            .with("Ahorn/entities/key.jl", JULIA_KEY);
        let outcome = scan_archive(&mut archive).unwrap();

        assert_eq!(outcome.entities.get("crystalHeart"), Some("Crystal Heart"));
        assert_eq!(outcome.entities.get("MyMod/Key"), Some("Key"));
        assert!(outcome.log.is_empty());
    }

    #[test]
    fn test_duplicate_id_is_not_rediagnosed() {
        let mut archive = MemoryArchive::new()
            .with("Loenn/entities/crystalHeart.lua", LUA_HEART)
            .with(
                "Loenn/entities/crystalHeartAlt.lua",
                "local h = {}\nh.name = \"crystalHeart\"\nreturn h\n",
            );
        let outcome = scan_archive(&mut archive).unwrap();

        assert_eq!(outcome.entities.len(), 1);
        assert!(outcome.log.is_empty());
    }

    #[test]
    fn test_irrelevant_members_ignored() {
        let mut archive = MemoryArchive::new()
            .with("everest.yaml", "- Name: Test")
            .with("Graphics/Atlases/Gameplay/heart.png", vec![0x89, b'P', b'N', b'G'])
            .with("Loenn/libraries/utils.lua", LUA_HELPER);
        let outcome = scan_archive(&mut archive).unwrap();

        assert!(outcome.entities.is_empty());
        assert!(outcome.log.is_empty());
    }

    #[test]
    fn test_escaped_content_is_unescaped() {
        let escaped = r#"return {\n    name = \"MyMod/Escaped\",\n    placements = {\n        name = \"Escaped Heart\",\n    },\n}"#
            .replace("\\\"", "\"");
        let mut archive = MemoryArchive::new().with("Loenn/entities/escaped.lua", escaped);
        let outcome = scan_archive(&mut archive).unwrap();

        assert_eq!(outcome.entities.get("MyMod/Escaped"), Some("Escaped Heart"));
    }

    #[test]
    fn test_rescanning_zip_is_idempotent() {
        let data = build_zip(&[
            ("Ahorn/entities/broken.jl", "module Broken\nend\n"),
            ("Loenn/entities/crystalHeart.lua", LUA_HEART),
            ("Loenn/triggers/warp.lua", LUA_NO_NAME),
            ("Ahorn/entities/key.jl", JULIA_KEY),
        ]);

        let mut first = zip::ZipArchive::new(Cursor::new(data.clone())).unwrap();
        let mut second = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        let a = scan_archive(&mut first).unwrap();
        let b = scan_archive(&mut second).unwrap();

        assert_eq!(a, b);
        assert_eq!(
            a.log.to_text(),
            "ID: MyMod/Warp, file Loenn/triggers/warp.lua\nID: NA, file Ahorn/entities/broken.jl\n"
        );
        assert_eq!(a.entities.len(), 2);
    }

    #[test]
    fn test_empty_archive() {
        let data = build_zip(&[]);
        let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        let outcome = scan_archive(&mut archive).unwrap();

        assert!(outcome.entities.is_empty());
        assert!(outcome.log.is_empty());
    }
}
