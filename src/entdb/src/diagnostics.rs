//! Diagnostics recorded while resolving entity names.
//!
//! Every recoverable condition (a plugin file without an id, an id without a
//! name, a mod that yielded nothing, a mod whose download failed) becomes one
//! line in the run's [`ErrorLog`].

use crate::database::write_atomic;
use crate::Result;
use std::fmt;
use std::path::Path;

/// A single recoverable condition found during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A plugin source file matched no entity id pattern
    UnresolvedIdentifier { file: String },

    /// An entity id was found but no display name
    UnresolvedName { id: String, file: String },

    /// A mod was scanned completely and produced no entities
    EmptyModResult { mod_name: String },

    /// A mod could not be probed, downloaded or opened
    TransportFailure { mod_name: String, message: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedIdentifier { file } => write!(f, "ID: NA, file {}", file),
            Diagnostic::UnresolvedName { id, file } => write!(f, "ID: {}, file {}", id, file),
            Diagnostic::EmptyModResult { mod_name } => {
                write!(f, "Mod {} produced no entities", mod_name)
            }
            Diagnostic::TransportFailure { mod_name, message } => {
                write!(f, "Mod {} failed: {}", mod_name, message)
            }
        }
    }
}

/// Append-only, ordered list of diagnostics for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLog {
    entries: Vec<Diagnostic>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic at the end of the log
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Append every entry of another log, keeping its order
    pub fn append(&mut self, other: ErrorLog) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Render the log as newline-terminated lines
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&entry.to_string());
            text.push('\n');
        }
        text
    }

    /// Write the rendered log, replacing any previous file atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, self.to_text().as_bytes())
    }
}
