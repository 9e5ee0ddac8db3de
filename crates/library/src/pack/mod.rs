//! Housekeeping sweeps: repackaging loose documents and verifying files.
//!
//! Indexing reads whatever is on disk; these drivers keep what's on disk in
//! shape. [`pack_tree`] turns every loose `.fb2` into its own `.fb2.zip`
//! (removing the original only once the fresh archive verifies clean), and
//! [`verify_tree`] sweeps a tree reporting documents and archives that would
//! not survive indexing. Like the indexing walk, both visit files strictly
//! one at a time and never let one bad file end the sweep.

pub mod error;

use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use exn::ResultExt;
use folio_archive::Archive;
use folio_extract::fb2;
use self::error::{ErrorKind, Result as PackResult};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Tally of one [`pack_tree`] sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PackReport {
    /// Loose documents compressed into fresh archives.
    pub packed: u64,
    /// Originals removed after their archive verified clean.
    pub removed: u64,
    /// Files that could not be packed (left untouched on disk).
    pub failures: u64,
}

impl Display for PackReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} packed, {} originals removed, {} failed", self.packed, self.removed, self.failures)
    }
}

/// Tally of one [`verify_tree`] sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    /// Files that passed their checks.
    pub valid: u64,
    /// Files that failed (each already logged with its path).
    pub invalid: u64,
    /// Files no check applies to.
    pub skipped: u64,
}

impl Display for VerifyReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} valid, {} invalid, {} skipped", self.valid, self.invalid, self.skipped)
    }
}

/// Compresses every loose `.fb2` under `root` into an individual `.fb2.zip`
/// next to it.
///
/// With `remove_original`, each source file is deleted - but only after its
/// fresh archive has been re-read and integrity-tested, so an interrupted or
/// failing sweep never costs a document.
pub fn pack_tree(root: &Path, remove_original: bool) -> LibraryResult<PackReport> {
    pack_tree_inner(root, remove_original).or_raise(|| LibraryErrorKind::Pack)
}

#[instrument]
fn pack_tree_inner(root: &Path, remove_original: bool) -> PackResult<PackReport> {
    let mut report = PackReport::default();
    for path in candidates(root).or_raise(|| ErrorKind::Io)? {
        // Only loose documents; a `.fb2.zip` already is one.
        if !has_suffix(&path, ".fb2") || has_suffix(&path, ".fb2.zip") {
            continue;
        }
        match folio_archive::compress_file(&path, None) {
            Ok(archive) => {
                report.packed += 1;
                tracing::info!(source = %path.display(), archive = %archive.display(), "packed");
                if remove_original {
                    match std::fs::remove_file(&path) {
                        Ok(()) => report.removed += 1,
                        Err(error) => {
                            report.failures += 1;
                            tracing::warn!(path = %path.display(), %error, "could not remove original");
                        },
                    }
                }
            },
            Err(error) => {
                report.failures += 1;
                tracing::warn!(path = %path.display(), error = ?error, "could not pack");
            },
        }
    }
    Ok(report)
}

/// Verifies every checkable file under `root`.
///
/// `.fb2` files must be well-formed XML; `.zip` archives (including
/// `.fb2.zip`) and `.epub` packages must pass the integrity test, and any
/// `.fb2` entry inside a zip must itself be well-formed. Failures are logged
/// per file and counted; the sweep always runs to the end.
pub fn verify_tree(root: &Path) -> LibraryResult<VerifyReport> {
    verify_tree_inner(root).or_raise(|| LibraryErrorKind::Pack)
}

#[instrument]
fn verify_tree_inner(root: &Path) -> PackResult<VerifyReport> {
    let mut report = VerifyReport::default();
    for path in candidates(root).or_raise(|| ErrorKind::Io)? {
        match verify_file(&path) {
            Ok(true) => report.valid += 1,
            Ok(false) => report.skipped += 1,
            Err(error) => {
                report.invalid += 1;
                tracing::warn!(path = %path.display(), error = ?error, "verification failed");
            },
        }
    }
    Ok(report)
}

/// Verifies a single file; returns `Ok(false)` when no check applies.
pub fn verify_file(path: &Path) -> PackResult<bool> {
    if has_suffix(path, ".fb2") && !has_suffix(path, ".fb2.zip") {
        let bytes = std::fs::read(path).or_raise(|| ErrorKind::Io)?;
        fb2::well_formed(&bytes).or_raise(|| ErrorKind::Document)?;
        return Ok(true);
    }
    if has_suffix(path, ".zip") {
        let mut archive = Archive::open(path).or_raise(|| ErrorKind::Archive)?;
        archive.integrity().or_raise(|| ErrorKind::Archive)?;
        for entry in archive.entry_names().or_raise(|| ErrorKind::Archive)? {
            if entry.ends_with(".fb2") {
                let bytes = archive.read(&entry).or_raise(|| ErrorKind::Archive)?;
                fb2::well_formed(&bytes).or_raise(|| ErrorKind::Document)?;
            }
        }
        return Ok(true);
    }
    if has_suffix(path, ".epub") {
        Archive::open(path)
            .and_then(|mut archive| archive.integrity())
            .or_raise(|| ErrorKind::Archive)?;
        return Ok(true);
    }
    Ok(false)
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name().and_then(|name| name.to_str()).is_some_and(|name| name.ends_with(suffix))
}

/// Sorted regular files under `root`; a file root is the single candidate.
fn candidates(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    fn collect(root: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
        if root.is_file() {
            files.push(root.to_path_buf());
            return Ok(());
        }
        for entry in std::fs::read_dir(root)? {
            let path = entry?.path();
            if path.is_dir() {
                collect(&path, files)?;
            } else {
                files.push(path);
            }
        }
        Ok(())
    }
    let mut files = Vec::new();
    collect(root, &mut files)?;
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &[u8] = b"<FictionBook><description/></FictionBook>";

    #[test]
    fn packs_loose_documents_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.fb2"), DOC).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("b.fb2"), DOC).unwrap();
        std::fs::write(dir.path().join("c.txt"), b"not a book").unwrap();

        let report = pack_tree(dir.path(), false).unwrap();
        assert_eq!(report.packed, 2);
        assert_eq!(report.removed, 0);
        assert_eq!(report.failures, 0);
        assert!(dir.path().join("a.fb2.zip").is_file());
        assert!(dir.path().join("sub").join("b.fb2.zip").is_file());
        // Originals stay put without the removal flag.
        assert!(dir.path().join("a.fb2").is_file());
    }

    #[test]
    fn removes_originals_only_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.fb2"), DOC).unwrap();

        let report = pack_tree(dir.path(), true).unwrap();
        assert_eq!(report.packed, 1);
        assert_eq!(report.removed, 1);
        assert!(!dir.path().join("a.fb2").exists());
        assert!(dir.path().join("a.fb2.zip").is_file());
    }

    #[test]
    fn already_packed_archives_are_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.fb2"), DOC).unwrap();
        pack_tree(dir.path(), true).unwrap();

        // A second sweep finds only the archive and does nothing.
        let report = pack_tree(dir.path(), true).unwrap();
        assert_eq!(report.packed, 0);
    }

    #[test]
    fn verifies_documents_and_archives() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.fb2"), DOC).unwrap();
        std::fs::write(dir.path().join("bad.fb2"), b"<FictionBook><oops").unwrap();
        std::fs::write(dir.path().join("garbage.zip"), b"not a zip").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        folio_archive::compress_file(&dir.path().join("good.fb2"), None).unwrap();

        let report = verify_tree(dir.path()).unwrap();
        // good.fb2 + good.fb2.zip
        assert_eq!(report.valid, 2);
        // bad.fb2 + garbage.zip
        assert_eq!(report.invalid, 2);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn archive_with_malformed_inner_document_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("bad.fb2");
        std::fs::write(&source, b"<FictionBook><oops").unwrap();
        let archive = folio_archive::compress_file(&source, None).unwrap();
        std::fs::remove_file(&source).unwrap();

        let error = verify_file(&archive).unwrap_err();
        assert!(matches!(*error, ErrorKind::Document));
    }
}
