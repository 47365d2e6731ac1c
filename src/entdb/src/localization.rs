//! English localization table loader.
//!
//! Mods that ship an editor plugin usually ship `lang/en_gb.lang`, a
//! line-oriented `key=value` file. Keys of the form
//! `<category>.<id>[.placements].name[.<variant>]` give display names for
//! entities, triggers and style effects.

use crate::entities::ModEntityMap;
use crate::extract::normalize_display_name;
use once_cell::sync::Lazy;
use regex::Regex;

/// Suffix identifying a localization member anywhere in an archive
pub const LOCALIZATION_SUFFIX: &str = "lang/en_gb.lang";

/// Known localization members, in order of preference
pub const LOCALIZATION_PATHS: [&str; 2] = ["Loenn/lang/en_gb.lang", "Ahorn/lang/en_gb.lang"];

static LANG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^(?:entities|triggers|style\.effects)\.([^.\n]+)\.(?:placements\.)?name(?:\.[^=\n]+)?=(.*)$",
    )
    .expect("valid localization pattern")
});

/// Pick the localization member to read.
///
/// The Loenn table is preferred over the Ahorn one. When neither known path
/// exists, the first member ending in [`LOCALIZATION_SUFFIX`] is used.
pub fn find_localization_member(member_names: &[String]) -> Option<&str> {
    LOCALIZATION_PATHS
        .iter()
        .find_map(|known| member_names.iter().find(|name| name.as_str() == *known))
        .or_else(|| {
            member_names
                .iter()
                .find(|name| name.ends_with(LOCALIZATION_SUFFIX))
        })
        .map(String::as_str)
}

/// Extract every `(id, display name)` pair from localization text, in file order
pub fn parse_localization(text: &str) -> Vec<(String, String)> {
    LANG_LINE
        .captures_iter(text)
        .map(|caps| {
            let id = caps[1].to_string();
            let name = normalize_display_name(&caps[2]);
            (id, name)
        })
        .collect()
}

/// Build the initial entity map of a mod from its localization text.
///
/// The first line naming an id wins, so the base placement name is kept
/// over later variant names.
pub fn load_localization(text: &str) -> ModEntityMap {
    parse_localization(text).into_iter().collect()
}
