use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::instrument;
use zip::ZipArchive;
use zip::result::ZipError;

/// Read access to one zip container, scoped to the value's lifetime.
///
/// The file handle is opened by [`open`](Self::open) and released when the
/// `Archive` is dropped, whichever way the consuming scope exits. Handles
/// are not cached across files; the indexing pipeline opens, reads, and
/// drops one archive at a time.
#[derive(Debug)]
pub struct Archive {
    path: PathBuf,
    inner: ZipArchive<BufReader<File>>,
}

impl Archive {
    /// Opens the container at `path`.
    ///
    /// A file that cannot be read as a zip archive (corrupt, truncated, or
    /// something else entirely) yields
    /// [`InvalidArchive`](ErrorKind::InvalidArchive) naming the path.
    #[instrument]
    pub fn open(path: impl AsRef<Path> + std::fmt::Debug) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).or_raise(|| ErrorKind::Io)?;
        let inner = ZipArchive::new(BufReader::new(file))
            .or_raise(|| ErrorKind::InvalidArchive(path.clone()))?;
        Ok(Self { path, inner })
    }

    /// Path of the container on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries in the archive, directories included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Entry names in archive order.
    pub fn entry_names(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(self.inner.len());
        for index in 0..self.inner.len() {
            let entry = self
                .inner
                .by_index_raw(index)
                .or_raise(|| ErrorKind::InvalidArchive(self.path.clone()))?;
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    /// Name of the first file entry whose name ends in `suffix`, if any.
    ///
    /// Used to locate the meaningful inner document of single-file
    /// containers (the `.fb2` inside a `.fb2.zip`).
    pub fn first_entry_with_suffix(&mut self, suffix: &str) -> Result<Option<String>> {
        Ok(self.entry_names()?.into_iter().find(|name| name.ends_with(suffix)))
    }

    /// Reads a named entry fully into memory.
    ///
    /// The zip reader verifies the entry's checksum as a side effect of
    /// reading it to the end, so bytes returned from here have passed their
    /// CRC. Consumers should still run [`integrity`](Self::integrity) first
    /// so that a bad *sibling* entry is reported before anything is parsed.
    #[instrument(skip(self), fields(archive = %self.path.display()))]
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut entry = match self.inner.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => exn::bail!(ErrorKind::EntryNotFound {
                archive: self.path.clone(),
                entry: name.to_string(),
            }),
            Err(_) => exn::bail!(ErrorKind::InvalidArchive(self.path.clone())),
        };
        let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry.read_to_end(&mut bytes).or_raise(|| ErrorKind::CorruptEntry {
            archive: self.path.clone(),
            entry: name.to_string(),
        })?;
        Ok(bytes)
    }

    /// Tests every entry and reports the first corrupt one.
    ///
    /// Each file entry is decompressed to a sink, which forces the CRC
    /// check. The first failure produces
    /// [`CorruptEntry`](ErrorKind::CorruptEntry) naming the entry; a clean
    /// pass returns `Ok(())`.
    #[instrument(skip(self), fields(archive = %self.path.display()))]
    pub fn integrity(&mut self) -> Result<()> {
        for index in 0..self.inner.len() {
            let mut entry = self
                .inner
                .by_index(index)
                .or_raise(|| ErrorKind::InvalidArchive(self.path.clone()))?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            std::io::copy(&mut entry, &mut std::io::sink()).or_raise(|| ErrorKind::CorruptEntry {
                archive: self.path.clone(),
                entry: name,
            })?;
        }
        Ok(())
    }
}
