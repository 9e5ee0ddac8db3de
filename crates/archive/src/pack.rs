//! Repackaging loose files into individual archives.

use crate::error::{ErrorKind, Result};
use crate::reader::Archive;
use exn::{OptionExt, ResultExt};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::instrument;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Compresses one file into its own zip archive.
///
/// The archive is written next to the source as `<filename>.zip` unless an
/// explicit `zip_path` is given, with the source's basename as the single
/// entry. The fresh archive is integrity-tested before this function
/// returns, so a success means the archive can be trusted (and the original
/// can be safely removed by the caller if it wants to).
///
/// Returns the path of the written archive.
#[instrument]
pub fn compress_file(source: &Path, zip_path: Option<PathBuf>) -> Result<PathBuf> {
    let zip_path = zip_path.unwrap_or_else(|| {
        let mut name = source.as_os_str().to_os_string();
        name.push(".zip");
        PathBuf::from(name)
    });
    let entry_name = source
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_raise(|| ErrorKind::InvalidPath)?
        .to_string();

    let bytes = std::fs::read(source).or_raise(|| ErrorKind::Io)?;
    let file = File::create(&zip_path).or_raise(|| ErrorKind::Io)?;
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer
        .start_file(entry_name, options)
        .or_raise(|| ErrorKind::InvalidArchive(zip_path.clone()))?;
    writer.write_all(&bytes).or_raise(|| ErrorKind::Io)?;
    writer.finish().or_raise(|| ErrorKind::Io)?;

    // Trust nothing that hasn't been re-read.
    verify(&zip_path)?;
    tracing::debug!(source = %source.display(), archive = %zip_path.display(), "compressed");
    Ok(zip_path)
}

/// Validates an archive on disk: opens it and integrity-tests every entry.
///
/// Fails with [`InvalidArchive`](ErrorKind::InvalidArchive) if the container
/// itself is unreadable, or [`CorruptEntry`](ErrorKind::CorruptEntry) naming
/// the first entry that does not survive decompression.
pub fn verify(path: &Path) -> Result<()> {
    Archive::open(path)?.integrity()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compresses_into_sibling_zip() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("book.fb2");
        std::fs::write(&source, b"<FictionBook/>").unwrap();

        let zip_path = compress_file(&source, None).unwrap();
        assert_eq!(zip_path, dir.path().join("book.fb2.zip"));

        let mut archive = Archive::open(&zip_path).unwrap();
        assert_eq!(archive.entry_names().unwrap(), vec!["book.fb2"]);
        assert_eq!(archive.read("book.fb2").unwrap(), b"<FictionBook/>");
    }

    #[test]
    fn explicit_target_path_is_respected() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("book.fb2");
        let target = dir.path().join("elsewhere.zip");
        std::fs::write(&source, b"data").unwrap();

        let zip_path = compress_file(&source, Some(target.clone())).unwrap();
        assert_eq!(zip_path, target);
        assert!(verify(&target).is_ok());
    }

    #[test]
    fn missing_source_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = compress_file(&dir.path().join("ghost.fb2"), None).unwrap_err();
        assert_eq!(*error, ErrorKind::Io);
    }

    #[test]
    fn verify_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.zip");
        std::fs::write(&path, b"this is not a zip file").unwrap();
        assert!(verify(&path).is_err());
    }
}
