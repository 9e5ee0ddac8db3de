//! Binary-level Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A top-level error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for the binary's operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which subsystem a command failed in.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Configuration could not be loaded.
    #[display("configuration error")]
    Config,
    /// The catalog database could not be opened or queried.
    #[display("catalog error")]
    Catalog,
    /// A batch driver failed to run.
    #[display("library error")]
    Library,
    /// Filesystem preparation (creating the data directory) failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}
