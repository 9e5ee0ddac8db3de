use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::scan::error::{ErrorKind, Result as ScanResult};
use crate::scan::file::{FileOutcome, index_file_inner};
use exn::ResultExt;
use folio_catalog::Repository;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Tally of one indexing walk.
///
/// Every visited file lands in exactly one bucket. The failure buckets
/// mirror the classification at the single-file boundary; their presence in
/// the report is the whole of their effect on the batch - the walk always
/// runs to the end of the file list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexReport {
    /// Files that created a new catalog entry.
    pub created: u64,
    /// Files whose path was already cataloged (no-op re-confirmation).
    pub confirmed: u64,
    /// Files with an unrecognized suffix.
    pub skipped: u64,
    /// Malformed or incomplete documents.
    pub parse_failures: u64,
    /// Corrupt or truncated containers.
    pub archive_failures: u64,
    /// Registrations that failed and were rolled back.
    pub catalog_failures: u64,
    /// Everything else, logged with full context for later diagnosis.
    pub other_failures: u64,
}

impl IndexReport {
    /// Total files that failed, across all failure categories.
    pub fn failures(&self) -> u64 {
        self.parse_failures + self.archive_failures + self.catalog_failures + self.other_failures
    }
}

impl Display for IndexReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} cataloged, {} re-confirmed, {} skipped, {} failed ({} malformed, {} bad archives)",
            self.created,
            self.confirmed,
            self.skipped,
            self.failures(),
            self.parse_failures,
            self.archive_failures,
        )
    }
}

/// Indexes a file or a whole directory tree into the catalog.
///
/// Directories are walked recursively and candidates visited in sorted
/// order, strictly one at a time. Per-file failures are logged with the
/// offending path and counted in the report; only a failure of the walk
/// itself (an unreadable root, say) makes this return an error.
pub async fn index_tree(repo: &Repository, root: &Path) -> LibraryResult<IndexReport> {
    index_tree_inner(repo, root).await.or_raise(|| LibraryErrorKind::Scan)
}

#[instrument(skip(repo))]
async fn index_tree_inner(repo: &Repository, root: &Path) -> ScanResult<IndexReport> {
    let mut files = Vec::new();
    collect_files(root, &mut files).or_raise(|| ErrorKind::Io)?;
    files.sort();
    tracing::info!(root = %root.display(), candidates = files.len(), "indexing");

    let mut report = IndexReport::default();
    for path in files {
        match index_file_inner(repo, &path).await {
            Ok(FileOutcome::Registered(registered)) if registered.created => report.created += 1,
            Ok(FileOutcome::Registered(_)) => report.confirmed += 1,
            Ok(FileOutcome::Skipped) => report.skipped += 1,
            Err(error) => match &*error {
                ErrorKind::Parse => {
                    report.parse_failures += 1;
                    tracing::warn!(path = %path.display(), error = ?error, "malformed document");
                },
                ErrorKind::Archive | ErrorKind::NoDocumentEntry => {
                    report.archive_failures += 1;
                    tracing::warn!(path = %path.display(), error = ?error, "invalid archive");
                },
                ErrorKind::Catalog => {
                    report.catalog_failures += 1;
                    tracing::warn!(path = %path.display(), error = ?error, "registration rolled back");
                },
                ErrorKind::Io => {
                    report.other_failures += 1;
                    tracing::error!(path = %path.display(), error = ?error, "unexpected failure");
                },
            },
        }
    }
    tracing::info!(%report, "walk finished");
    Ok(report)
}

/// Recursively collects regular files under `root`; a file root is itself
/// the single candidate.
fn collect_files(root: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if root.is_file() {
        files.push(root.to_path_buf());
        return Ok(());
    }
    for entry in std::fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_catalog::Database;
    use std::io::Write;
    use std::path::PathBuf;

    const VALID_FB2: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<FictionBook xmlns="http://www.gribuser.ru/xml/fictionbook/2.0">
  <description><title-info>
    <genre>sf</genre>
    <author><first-name>Jane</first-name><last-name>Doe</last-name></author>
    <book-title>Test Book</book-title>
    <lang>en</lang>
  </title-info></description>
  <body><section><p>text</p></section></body>
</FictionBook>"#;

    async fn repo() -> Repository {
        let db = Database::connect_in_memory().await.unwrap();
        Repository::from(&db)
    }

    fn write_epub(path: &Path) {
        let container = br#"<?xml version="1.0"?>
<container xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles><rootfile full-path="content.opf" media-type="application/oebps-package+xml"/></rootfiles>
</container>"#;
        let opf = br#"<package xmlns="http://www.idpf.org/2007/opf">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Voyage Out</dc:title>
    <dc:creator>Solo</dc:creator>
    <dc:language>en</dc:language>
    <dc:subject>adventure</dc:subject>
  </metadata>
</package>"#;
        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("META-INF/container.xml", options).unwrap();
        writer.write_all(container).unwrap();
        writer.start_file("content.opf", options).unwrap();
        writer.write_all(opf).unwrap();
        writer.finish().unwrap();
    }

    #[tokio::test]
    async fn indexes_a_mixed_directory() {
        let repo = repo().await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.fb2"), VALID_FB2).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"not a book").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        write_epub(&dir.path().join("nested").join("voyage.epub"));

        let report = index_tree(&repo, dir.path()).await.unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(report.confirmed, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failures(), 0);

        assert_eq!(repo.count_books().await.unwrap(), 2);
        // "Test Book" by (Doe, Jane) + "Voyage Out" by (Solo, Solo)
        assert_eq!(repo.count_authors().await.unwrap(), 2);
        // "sf" + "adventure"
        assert_eq!(repo.count_genres().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn reindexing_creates_nothing_new() {
        let repo = repo().await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.fb2"), VALID_FB2).unwrap();

        let first = index_tree(&repo, dir.path()).await.unwrap();
        assert_eq!((first.created, first.confirmed), (1, 0));

        let second = index_tree(&repo, dir.path()).await.unwrap();
        assert_eq!((second.created, second.confirmed), (0, 1));

        assert_eq!(repo.count_books().await.unwrap(), 1);
        assert_eq!(repo.count_authors().await.unwrap(), 1);
        assert_eq!(repo.count_genres().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn one_bad_file_does_not_stop_the_batch() {
        let repo = repo().await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a-broken.fb2"), b"<FictionBook><unclosed").unwrap();
        std::fs::write(dir.path().join("b-garbage.fb2.zip"), b"definitely not a zip").unwrap();
        std::fs::write(dir.path().join("c-good.fb2"), VALID_FB2).unwrap();

        let report = index_tree(&repo, dir.path()).await.unwrap();
        assert_eq!(report.parse_failures, 1);
        assert_eq!(report.archive_failures, 1);
        // The good file sorts last and must still have been registered.
        assert_eq!(report.created, 1);
        assert_eq!(repo.count_books().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn zipped_fb2_keeps_the_archive_path() {
        let repo = repo().await;
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("book.fb2");
        std::fs::write(&plain, VALID_FB2).unwrap();
        let zipped = folio_archive::compress_file(&plain, None).unwrap();
        std::fs::remove_file(&plain).unwrap();

        let report = index_tree(&repo, dir.path()).await.unwrap();
        assert_eq!(report.created, 1);
        let book = repo.find_book_by_path(&zipped).await.unwrap().expect("book under archive path");
        assert_eq!(book.title, "Test Book");
        assert_eq!(book.path, zipped);
    }

    #[tokio::test]
    async fn malformed_document_inside_archive_creates_no_book() {
        let repo = repo().await;
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("book.fb2");
        std::fs::write(&plain, b"<FictionBook><description><title-info><book-title>Oops").unwrap();
        folio_archive::compress_file(&plain, None).unwrap();
        std::fs::remove_file(&plain).unwrap();

        let report = index_tree(&repo, dir.path()).await.unwrap();
        assert_eq!(report.parse_failures, 1);
        assert_eq!(report.created, 0);
        assert_eq!(repo.count_books().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn zip_without_document_entry_is_an_archive_failure() {
        let repo = repo().await;
        let dir = tempfile::tempdir().unwrap();
        let readme = dir.path().join("readme.txt");
        std::fs::write(&readme, b"no document here").unwrap();
        let target = dir.path().join("empty.fb2.zip");
        folio_archive::compress_file(&readme, Some(target)).unwrap();
        std::fs::remove_file(&readme).unwrap();

        let report = index_tree(&repo, dir.path()).await.unwrap();
        assert_eq!(report.archive_failures, 1);
        assert_eq!(repo.count_books().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn a_single_file_root_works() {
        let repo = repo().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solo.fb2");
        std::fs::write(&path, VALID_FB2).unwrap();

        let report = index_tree(&repo, &path).await.unwrap();
        assert_eq!(report.created, 1);
        assert!(repo.find_book_by_path(&path).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_root_is_a_walk_error() {
        let repo = repo().await;
        let missing = PathBuf::from("/definitely/not/here");
        assert!(index_tree(&repo, &missing).await.is_err());
    }
}
