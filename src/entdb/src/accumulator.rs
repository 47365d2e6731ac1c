//! Mod database accumulator.
//!
//! Drives the whole run: for each candidate mod it probes for editor plugin
//! support, downloads the archive to a scratch path, scans it and merges the
//! result. The accumulator is the only owner of the database and the error
//! log until [`Accumulator::finish`] hands them out for persistence.

use crate::database::EntityDatabase;
use crate::diagnostics::{Diagnostic, ErrorLog};
use crate::listing::ModCandidate;
use crate::scanner::scan_archive;
use crate::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Network side of a run, one call per mod
pub trait ModRepository {
    /// Cheap probe: does the hosted file list mention an editor plugin root?
    fn has_editor_plugin(&mut self, file_id: u64) -> Result<bool>;

    /// Download the mod archive to `dest`, overwriting it
    fn download_archive(&mut self, file_id: u64, dest: &Path) -> Result<()>;
}

/// What happened to one mod
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModOutcome {
    /// Probe found no editor plugin, nothing downloaded
    Bypassed,
    /// Entities were resolved and stored
    Scanned { entities: usize },
    /// Scan completed without resolving anything
    Empty,
    /// Probe, download or archive read failed
    Failed,
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub scanned: usize,
    pub bypassed: usize,
    pub empty: usize,
    pub failed: usize,
}

/// Accumulates per-mod scan results into one database
pub struct Accumulator {
    scratch_archive: PathBuf,
    probe: bool,
    database: EntityDatabase,
    log: ErrorLog,
    stats: RunStats,
}

impl Accumulator {
    /// Create an accumulator downloading every archive to `scratch_archive`
    pub fn new(scratch_archive: impl Into<PathBuf>) -> Self {
        Self {
            scratch_archive: scratch_archive.into(),
            probe: true,
            database: EntityDatabase::new(),
            log: ErrorLog::new(),
            stats: RunStats::default(),
        }
    }

    /// Enable or disable the editor plugin probe before each download
    pub fn with_probe(mut self, probe: bool) -> Self {
        self.probe = probe;
        self
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Process every candidate in order
    pub fn run<R: ModRepository + ?Sized>(&mut self, repo: &mut R, candidates: &[ModCandidate]) {
        for candidate in candidates {
            self.process(repo, candidate);
        }
    }

    /// Process one mod.
    ///
    /// Transport failures are recorded as diagnostics and never abort the
    /// run, so results accumulated so far are kept.
    pub fn process<R: ModRepository + ?Sized>(
        &mut self,
        repo: &mut R,
        candidate: &ModCandidate,
    ) -> ModOutcome {
        let outcome = match self.try_process(repo, candidate) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Mod {} failed: {}", candidate.name, e);
                self.log.push(Diagnostic::TransportFailure {
                    mod_name: candidate.name.clone(),
                    message: e.to_string(),
                });
                ModOutcome::Failed
            }
        };

        match outcome {
            ModOutcome::Bypassed => self.stats.bypassed += 1,
            ModOutcome::Scanned { .. } => self.stats.scanned += 1,
            ModOutcome::Empty => self.stats.empty += 1,
            ModOutcome::Failed => self.stats.failed += 1,
        }
        outcome
    }

    fn try_process<R: ModRepository + ?Sized>(
        &mut self,
        repo: &mut R,
        candidate: &ModCandidate,
    ) -> Result<ModOutcome> {
        if self.probe && !repo.has_editor_plugin(candidate.file_id)? {
            tracing::info!("Bypassing mod {} ({})", candidate.name, candidate.item_id);
            return Ok(ModOutcome::Bypassed);
        }

        tracing::info!("Scanning mod {} ({})", candidate.name, candidate.item_id);
        repo.download_archive(candidate.file_id, &self.scratch_archive)?;

        let file = File::open(&self.scratch_archive)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
        let scan = scan_archive(&mut archive)?;

        self.log.append(scan.log);
        let count = scan.entities.len();
        if self.database.insert_mod(candidate.name.clone(), scan.entities) {
            Ok(ModOutcome::Scanned { entities: count })
        } else {
            self.log.push(Diagnostic::EmptyModResult {
                mod_name: candidate.name.clone(),
            });
            Ok(ModOutcome::Empty)
        }
    }

    /// Stamp the database with the current time and release both artifacts
    pub fn finish(mut self) -> (EntityDatabase, ErrorLog) {
        self.database.stamp();
        (self.database, self.log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::tests::build_zip;
    use crate::Error;
    use std::collections::HashMap;

    const LUA_HEART: &str = "local h = {}\nh.name = \"crystalHeart\"\n\
        h.placements = {\n    name = \"Crystal Heart (classic)\",\n}\nreturn h\n";

    /// Serves prebuilt archives keyed by file id
    #[derive(Default)]
    struct FakeRepository {
        archives: HashMap<u64, Vec<u8>>,
        without_plugin: Vec<u64>,
        probe_unreachable: Vec<u64>,
        unreachable: Vec<u64>,
        downloads: Vec<u64>,
    }

    impl ModRepository for FakeRepository {
        fn has_editor_plugin(&mut self, file_id: u64) -> Result<bool> {
            if self.probe_unreachable.contains(&file_id) {
                return Err(Error::transport(format!("files/{}", file_id), "connection refused"));
            }
            Ok(!self.without_plugin.contains(&file_id))
        }

        fn download_archive(&mut self, file_id: u64, dest: &Path) -> Result<()> {
            if self.unreachable.contains(&file_id) {
                return Err(Error::transport(format!("mirror/{}.zip", file_id), "timed out"));
            }
            self.downloads.push(file_id);
            std::fs::write(dest, &self.archives[&file_id])?;
            Ok(())
        }
    }

    fn candidate(name: &str, file_id: u64) -> ModCandidate {
        ModCandidate {
            name: name.to_string(),
            item_id: file_id / 10,
            file_id,
        }
    }

    #[test]
    fn test_scanned_mod_is_stored() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut repo = FakeRepository::default();
        repo.archives
            .insert(10, build_zip(&[("Loenn/entities/heart.lua", LUA_HEART)]));

        let mut acc = Accumulator::new(temp_dir.path().join("mod.zip"));
        let outcome = acc.process(&mut repo, &candidate("HeartMod", 10));
        assert_eq!(outcome, ModOutcome::Scanned { entities: 1 });

        let (db, log) = acc.finish();
        assert!(db.scanned_timestamp > 0.0);
        assert_eq!(db.result["HeartMod"].get("crystalHeart"), Some("Crystal Heart"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_empty_mod_is_logged() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut repo = FakeRepository::default();
        repo.archives.insert(20, build_zip(&[("everest.yaml", "- Name: Empty")]));

        let mut acc = Accumulator::new(temp_dir.path().join("mod.zip"));
        assert_eq!(acc.process(&mut repo, &candidate("EmptyMod", 20)), ModOutcome::Empty);

        let (db, log) = acc.finish();
        assert!(db.result.is_empty());
        assert_eq!(log.to_text(), "Mod EmptyMod produced no entities\n");
    }

    #[test]
    fn test_probe_bypasses_download() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut repo = FakeRepository {
            without_plugin: vec![30],
            ..Default::default()
        };

        let mut acc = Accumulator::new(temp_dir.path().join("mod.zip"));
        assert_eq!(acc.process(&mut repo, &candidate("MapOnly", 30)), ModOutcome::Bypassed);
        assert!(repo.downloads.is_empty());
        assert_eq!(acc.stats().bypassed, 1);

        let (_, log) = acc.finish();
        assert!(log.is_empty());
    }

    #[test]
    fn test_probe_disabled_downloads_anyway() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut repo = FakeRepository {
            without_plugin: vec![10],
            ..Default::default()
        };
        repo.archives
            .insert(10, build_zip(&[("Loenn/entities/heart.lua", LUA_HEART)]));

        let mut acc = Accumulator::new(temp_dir.path().join("mod.zip")).with_probe(false);
        acc.process(&mut repo, &candidate("HeartMod", 10));
        assert_eq!(repo.downloads, vec![10]);
    }

    #[test]
    fn test_transport_failure_keeps_previous_results() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut repo = FakeRepository {
            unreachable: vec![40],
            ..Default::default()
        };
        repo.archives
            .insert(10, build_zip(&[("Loenn/entities/heart.lua", LUA_HEART)]));
        repo.archives.insert(50, b"not a zip".to_vec());

        let mut acc = Accumulator::new(temp_dir.path().join("mod.zip"));
        acc.run(
            &mut repo,
            &[
                candidate("HeartMod", 10),
                candidate("Offline", 40),
                candidate("Corrupt", 50),
            ],
        );

        assert_eq!(
            acc.stats(),
            RunStats {
                scanned: 1,
                failed: 2,
                ..Default::default()
            }
        );

        let (db, log) = acc.finish();
        assert_eq!(db.result.len(), 1);
        let lines: Vec<String> = log.iter().map(|d| d.to_string()).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Mod Offline failed: "));
        assert!(lines[1].starts_with("Mod Corrupt failed: "));
    }

    #[test]
    fn test_failed_plugin_check_is_logged() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut repo = FakeRepository {
            probe_unreachable: vec![70],
            ..Default::default()
        };
        repo.archives
            .insert(10, build_zip(&[("Loenn/entities/heart.lua", LUA_HEART)]));

        let mut acc = Accumulator::new(temp_dir.path().join("mod.zip"));
        assert_eq!(acc.process(&mut repo, &candidate("Flaky", 70)), ModOutcome::Failed);
        assert_eq!(
            acc.process(&mut repo, &candidate("HeartMod", 10)),
            ModOutcome::Scanned { entities: 1 }
        );
        assert_eq!(repo.downloads, vec![10]);

        let (db, log) = acc.finish();
        assert_eq!(db.result.len(), 1);
        let lines: Vec<String> = log.iter().map(|d| d.to_string()).collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Mod Flaky failed: "));
        assert!(lines[0].contains("connection refused"));
    }

    #[test]
    fn test_scan_diagnostics_are_appended() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut repo = FakeRepository::default();
        repo.archives.insert(
            60,
            build_zip(&[
                ("Loenn/entities/heart.lua", LUA_HEART),
                ("Ahorn/entities/broken.jl", "module Broken\nend\n"),
            ]),
        );

        let mut acc = Accumulator::new(temp_dir.path().join("mod.zip"));
        acc.process(&mut repo, &candidate("Mixed", 60));

        let (db, log) = acc.finish();
        assert_eq!(db.result["Mixed"].len(), 1);
        assert_eq!(log.to_text(), "ID: NA, file Ahorn/entities/broken.jl\n");
    }
}
