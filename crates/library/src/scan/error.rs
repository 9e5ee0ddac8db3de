//! Error types for the [`scan`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};

/// A scan error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the failure of one file's indexing cycle.
///
/// The walker buckets these independently so that a report can say *why*
/// files were skipped, and so that no single category - let alone a single
/// file - aborts the batch.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The document could not be parsed into a record (malformed XML or
    /// missing required metadata).
    #[display("malformed document")]
    Parse,
    /// The container around the document is corrupt or truncated.
    #[display("invalid archive")]
    Archive,
    /// The container opened cleanly but holds no usable document entry.
    #[display("archive contains no document entry")]
    NoDocumentEntry,
    /// Registration against the catalog failed and was rolled back.
    #[display("catalog registration failed")]
    Catalog,
    /// Reading the file from disk failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}
