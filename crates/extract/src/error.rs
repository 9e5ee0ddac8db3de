//! Extraction Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally. All of them mean "this document does not yield a record";
/// none of them should abort a batch.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document is not well-formed XML.
    #[display("malformed XML: {_0}")]
    MalformedXml(#[error(not(source))] String),
    /// The document parsed cleanly but a required element is absent or empty.
    #[display("missing required element: {_0}")]
    MissingField(#[error(not(source))] &'static str),
    /// Element text could not be decoded or unescaped.
    #[display("unreadable text in element '{_0}'")]
    InvalidText(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The bytes are either a valid document or they're not.
        false
    }
}
