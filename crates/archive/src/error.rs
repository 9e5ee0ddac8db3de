//! Archive Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file is not a readable zip container (corrupt, truncated, or not
    /// a zip at all). Don't retry with the same input.
    #[display("invalid archive: {}", _0.display())]
    InvalidArchive(#[error(not(source))] PathBuf),
    /// A specific entry failed its integrity check; the rest of the archive
    /// may well be readable by other tools.
    #[display("corrupt entry '{entry}' in archive {}", archive.display())]
    CorruptEntry {
        archive: PathBuf,
        entry: String,
    },
    /// The requested entry does not exist in the archive.
    #[display("no entry '{entry}' in archive {}", archive.display())]
    EntryNotFound {
        archive: PathBuf,
        entry: String,
    },
    /// A path could not be represented as UTF-8 for an entry name.
    #[display("non-UTF-8 path")]
    InvalidPath,
    /// An I/O operation on the underlying file failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        let kind = ErrorKind::CorruptEntry {
            archive: PathBuf::from("/books/bad.fb2.zip"),
            entry: "bad.fb2".to_string(),
        };
        assert_eq!(kind.to_string(), "corrupt entry 'bad.fb2' in archive /books/bad.fb2.zip");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Io.is_retryable());
        assert!(!ErrorKind::InvalidArchive(PathBuf::from("x.zip")).is_retryable());
    }
}
