//! Metadata extraction from e-book container documents.
//!
//! This crate turns the raw bytes of an e-book's metadata document into a
//! normalized [`Record`](models::Record), independent of which format the
//! bytes came from. Two vocabularies are understood:
//!
//! - **FB2** ([`fb2`]): a single XML file where everything of interest lives
//!   under `description/title-info`.
//! - **EPUB OPF** ([`epub`]): the package document referenced by
//!   `META-INF/container.xml`, using Dublin Core elements.
//!
//! The parsers are pure functions over byte slices: no file I/O, no global
//! state, and parsing the same bytes twice yields identical records. Opening
//! archives and deciding which parser to run is the caller's job (see the
//! `folio-library` crate).
//!
//! Element matching is by *local* name throughout, so documents are handled
//! the same whether they use a default namespace, a prefix, or none at all.

pub mod epub;
pub mod error;
pub mod fb2;
pub mod models;

pub use crate::models::{Language, Name, Record};
