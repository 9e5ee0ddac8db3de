use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::scan::error::{ErrorKind, Result as ScanResult};
use exn::{OptionExt, ResultExt};
use folio_archive::Archive;
use folio_catalog::{Registered, Repository};
use folio_extract::models::Record;
use folio_extract::{epub, fb2};
use std::path::Path;
use tracing::instrument;

/// A supported e-book container format, decided purely by filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Plain FB2 XML file (`.fb2`)
    Fb2,
    /// FB2 document inside a zip container (`.fb2.zip`)
    Fb2Zip,
    /// EPUB package (`.epub`)
    Epub,
}

impl Format {
    /// Determines the format from a filename suffix.
    ///
    /// Returns `None` for anything unrecognized - which means "not an
    /// e-book, skip silently", not an error. Matching is case-sensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        // `.fb2.zip` must be tested before `.fb2`, which it also ends with.
        if name.ends_with(".fb2.zip") {
            Some(Self::Fb2Zip)
        } else if name.ends_with(".fb2") {
            Some(Self::Fb2)
        } else if name.ends_with(".epub") {
            Some(Self::Epub)
        } else {
            None
        }
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file yielded a record and was registered (created or
    /// re-confirmed - see [`Registered::created`]).
    Registered(Registered),
    /// The suffix is not a known e-book format; nothing was done.
    Skipped,
}

/// Indexes a single file: dispatch → parse → register.
///
/// The full cycle runs to completion before this returns; a success means
/// the file's registration is committed.
pub async fn index_file(repo: &Repository, path: &Path) -> LibraryResult<FileOutcome> {
    index_file_inner(repo, path).await.or_raise(|| LibraryErrorKind::Scan)
}

#[instrument(skip(repo))]
pub(crate) async fn index_file_inner(repo: &Repository, path: &Path) -> ScanResult<FileOutcome> {
    let Some(format) = Format::from_path(path) else {
        tracing::debug!(path = %path.display(), "not an e-book, skipping");
        return Ok(FileOutcome::Skipped);
    };
    let record = extract_record(format, path)?;
    let registered = repo.register(&record).await.or_raise(|| ErrorKind::Catalog)?;
    Ok(FileOutcome::Registered(registered))
}

/// Produces the intermediate record for one file, unpacking containers as
/// needed.
///
/// Archived sources keep the *outer* archive path on the record, and their
/// containers are integrity-tested before any entry is parsed.
fn extract_record(format: Format, path: &Path) -> ScanResult<Record> {
    match format {
        Format::Fb2 => {
            let bytes = std::fs::read(path).or_raise(|| ErrorKind::Io)?;
            fb2::parse(&bytes, path).or_raise(|| ErrorKind::Parse)
        },
        Format::Fb2Zip => {
            let mut archive = Archive::open(path).or_raise(|| ErrorKind::Archive)?;
            archive.integrity().or_raise(|| ErrorKind::Archive)?;
            let entry = archive
                .first_entry_with_suffix(".fb2")
                .or_raise(|| ErrorKind::Archive)?
                .ok_or_raise(|| ErrorKind::NoDocumentEntry)?;
            let bytes = archive.read(&entry).or_raise(|| ErrorKind::Archive)?;
            fb2::parse(&bytes, path).or_raise(|| ErrorKind::Parse)
        },
        Format::Epub => {
            let mut archive = Archive::open(path).or_raise(|| ErrorKind::Archive)?;
            archive.integrity().or_raise(|| ErrorKind::Archive)?;
            let container = archive.read(epub::CONTAINER_ENTRY).or_raise(|| ErrorKind::Archive)?;
            let rootfile = epub::rootfile(&container).or_raise(|| ErrorKind::Parse)?;
            let opf = archive.read(&rootfile).or_raise(|| ErrorKind::Archive)?;
            epub::parse(&opf, path).or_raise(|| ErrorKind::Parse)
        },
    }
}
