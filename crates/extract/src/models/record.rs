use super::{Language, Name};
use std::path::PathBuf;

/// Normalized metadata extracted from one source file.
///
/// A `Record` is ephemeral: produced by one of the parsers, consumed once by
/// the catalog's registration, then discarded. The catalog entities it
/// resolves into are the durable representation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    /// Book title as declared by the source document.
    pub title: String,
    /// Declared language, or the fallback when the source omits it.
    pub language: Language,
    /// Credited authors, in document order. Parsers guarantee at least one.
    pub authors: Vec<Name>,
    /// Genre codes in document order; may be empty.
    pub genres: Vec<String>,
    /// Path of the originating file. For archived sources this is the outer
    /// archive, never the inner entry name. Unique per book in the catalog.
    pub path: PathBuf,
}
