//! Library Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies which driver a failure escaped from.
///
/// Per-file failures never surface here - they are absorbed into the
/// drivers' reports. These kinds cover faults of the batch itself (an
/// unreadable root directory, for instance).
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The indexing walk could not run to completion.
    Scan,
    /// A repackaging or verification sweep could not run to completion.
    Pack,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
