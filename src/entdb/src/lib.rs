//! # entdb
//!
//! Entity name resolution for Celeste mods.
//!
//! This library provides functionality to:
//! - Extract entity ids and display names from Lönn (Lua) and Ahorn (Julia)
//!   editor plugins and from `en_gb.lang` localization tables
//! - Scan a mod archive into an id -> display name map
//! - Accumulate many mods into one persisted entity database
//! - Tally collectibles of parsed maps against that database
//!
//! ## Example
//!
//! ```no_run
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut archive = zip::ZipArchive::new(File::open("mod.zip")?)?;
//! let outcome = entdb::scan_archive(&mut archive)?;
//!
//! for (id, name) in outcome.entities.iter() {
//!     println!("{} -> {}", id, name);
//! }
//! print!("{}", outcome.log.to_text());
//! # Ok(())
//! # }
//! ```

pub mod accumulator;
pub mod archive;
pub mod census;
pub mod database;
pub mod diagnostics;
pub mod entities;
pub mod error;
pub mod extract;
pub mod listing;
pub mod localization;
pub mod scanner;

#[doc(inline)]
pub use accumulator::{Accumulator, ModOutcome, ModRepository, RunStats};
#[doc(inline)]
pub use archive::{ArchiveReader, MemoryArchive};
#[doc(inline)]
pub use census::{Census, Classification, MapEntity, ParsedMap};
#[doc(inline)]
pub use database::{persist_run, EntityDatabase, DATABASE_FILE, ERROR_LOG_FILE};
#[doc(inline)]
pub use diagnostics::{Diagnostic, ErrorLog};
#[doc(inline)]
pub use entities::ModEntityMap;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use extract::{decode_content, normalize_display_name, Dialect};
#[doc(inline)]
pub use listing::{mentions_editor_plugin, select_candidates, Catalog, ModCandidate, ModRegistry};
#[doc(inline)]
pub use scanner::{scan_archive, ScanOutcome};
