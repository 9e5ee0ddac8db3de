//! Zip container access for e-book sources.
//!
//! Two of the three supported e-book formats (`.fb2.zip`, `.epub`) are zip
//! archives around the actual documents. This crate provides:
//!
//! - [`Archive`]: scoped read access to one container - list entries, read a
//!   named entry fully into memory, and an [`integrity`](Archive::integrity)
//!   test that reports the first corrupt entry. The underlying file handle
//!   lives exactly as long as the value and is released on every exit path.
//! - [`compress_file`] / [`verify`]: the repackaging half - turn a loose
//!   file into its own deflate-compressed archive (entry name = basename)
//!   and validate archives on disk.
//!
//! Nothing here interprets the bytes it hands out; parsing belongs to
//! `folio-extract`. Consumers are expected to run [`Archive::integrity`]
//! before trusting any entry.

pub mod error;
mod pack;
mod reader;

pub use crate::pack::{compress_file, verify};
pub use crate::reader::Archive;
