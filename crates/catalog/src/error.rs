//! Catalog Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally. Note that "no such entity" is deliberately absent: lookups
/// return `Option`, and a miss is the expected prelude to creation.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A query or transaction against the database failed. The current
    /// file's registration has been rolled back.
    #[display("database error")]
    Database,
    /// Schema migrations could not be applied.
    #[display("database migration error")]
    Migration,
    /// A value could not cross the Rust/SQLite boundary.
    #[display("invalid catalog data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
