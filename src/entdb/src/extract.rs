//! Best-effort extraction of entity ids and display names from plugin sources.
//!
//! Plugin files come in two scripting dialects: Lua files under `Loenn/`
//! and Julia files under `Ahorn/`. Neither is parsed. Each dialect supplies
//! three regular expressions (path classification, id, placement name) and
//! only the first match of each is used.

use once_cell::sync::Lazy;
use regex::Regex;

/// Regular expressions describing one plugin dialect
struct DialectPatterns {
    path: Regex,
    id: Regex,
    name: Regex,
}

// The id pattern finds a `name = "<id>"` field reachable from a `return {`,
// a `local x = {` table or a dotted `x.name` path. The name pattern looks
// for the first `name = "..."` inside the placements table.
static LOENN: Lazy<DialectPatterns> = Lazy::new(|| DialectPatterns {
    path: Regex::new(r"^Loenn/(?:entities|triggers|style)/([a-zA-Z_/]+)(?:\.lua|\.lua.(?:.+))$")
        .expect("valid Loenn path pattern"),
    id: Regex::new(
        r#"(?m)(?:(?:.+)\.|(?:return|local\s*.+\s*=)\s*\{(?:\n|.)*?)name\s*=\s*"(\S+)""#,
    )
    .expect("valid Loenn id pattern"),
    name: Regex::new(
        r#"(?m)(?:(?:.+)\.|(?:return|local\s*.+\s*=)\s*\{(?:\n|.)*?)placements(?:\.|\s*=\s*\{(?:\n|.)*?)name\s*=\s*"(.+)",?"#,
    )
    .expect("valid Loenn name pattern"),
});

// Ahorn declares entities with `@mapdef Entity "<id>"` or
// `@pardef f(...) = Entity("<id>", ...)`, and names them through the first
// key of `const placements = Ahorn.PlacementDict(...)`.
static AHORN: Lazy<DialectPatterns> = Lazy::new(|| DialectPatterns {
    path: Regex::new(r"^Ahorn/(?:entities|triggers|style)/([a-zA-Z_/]+)(?:\.jl|\.jl.(?:.+))$")
        .expect("valid Ahorn path pattern"),
    id: Regex::new(
        r#"(?m)(?:@mapdef\s*(?:Entity|Trigger)|@pardef\s*(?:.|\n)+\s*=(?:\s|\n)*(?:Entity|Trigger)\s*\()\s*"(\S+)"\s*"#,
    )
    .expect("valid Ahorn id pattern"),
    name: Regex::new(
        r#"(?m)const\splacements\s*=\s*Ahorn\.PlacementDict\((?:\n|\s)*"(.+)"\s*=>\sAhorn\.EntityPlacement\("#,
    )
    .expect("valid Ahorn name pattern"),
});

/// A level-editor plugin dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Lua plugins for the Lönn editor
    Loenn,
    /// Julia plugins for the Ahorn editor
    Ahorn,
}

impl Dialect {
    /// Dialects in scanning order. Earlier dialects win on conflicting ids.
    pub const ALL: [Dialect; 2] = [Dialect::Loenn, Dialect::Ahorn];

    /// Root directory holding this dialect's plugins inside a mod archive
    pub fn root(self) -> &'static str {
        match self {
            Dialect::Loenn => "Loenn",
            Dialect::Ahorn => "Ahorn",
        }
    }

    /// Scripting language of the dialect
    pub fn language(self) -> &'static str {
        match self {
            Dialect::Loenn => "Lua",
            Dialect::Ahorn => "Julia",
        }
    }

    fn patterns(self) -> &'static DialectPatterns {
        match self {
            Dialect::Loenn => &LOENN,
            Dialect::Ahorn => &AHORN,
        }
    }

    /// Whether an archive member path is a plugin source of this dialect
    pub fn matches_path(self, path: &str) -> bool {
        self.patterns().path.is_match(path)
    }

    /// First entity id declared in the source text
    pub fn extract_id(self, text: &str) -> Option<String> {
        first_capture(&self.patterns().id, text).map(str::to_string)
    }

    /// First placement display name in the source text, normalized
    pub fn extract_name(self, text: &str) -> Option<String> {
        first_capture(&self.patterns().name, text).map(normalize_display_name)
    }
}

fn first_capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Strip a display name down to the text before its first `(`.
///
/// Trailing whitespace is removed, which covers both the carriage return of
/// CRLF sources and the space left in front of a parenthetical qualifier.
pub fn normalize_display_name(raw: &str) -> String {
    let head = raw.split('(').next().unwrap_or(raw);
    head.trim_end().to_string()
}

/// Decode archive member bytes into text for pattern matching.
///
/// Invalid UTF-8 is replaced, and literal `\n`, `\t` and `\r` escape
/// sequences are turned into the control characters they stand for.
pub fn decode_content(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .replace("\\n", "\n")
        .replace("\\t", "\t")
        .replace("\\r", "\r")
}
