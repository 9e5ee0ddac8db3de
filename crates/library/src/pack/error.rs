//! Error types for the [`pack`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};

/// A pack error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the failure of one file's repackaging or verification.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The archive is corrupt, truncated, or could not be written.
    #[display("invalid archive")]
    Archive,
    /// The document is not well-formed XML.
    #[display("malformed document")]
    Document,
    /// Reading or removing a file on disk failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}
