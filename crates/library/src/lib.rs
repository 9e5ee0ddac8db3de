//! Batch drivers over an on-disk e-book collection.
//!
//! This crate is the glue between the filesystem and the other folio crates:
//!
//! - [`scan`]: walk a file or directory tree, dispatch each candidate file
//!   to the right parser by suffix, and register the extracted records in
//!   the catalog. One bad file never stops a batch - failures are classified,
//!   logged with their path, and counted in the returned report.
//! - [`pack`]: the housekeeping sweeps - compress loose `.fb2` files into
//!   individual zip archives, and verify that documents and archives on disk
//!   are readable.
//!
//! Both drivers take their collaborators (catalog repository, paths) as
//! arguments; nothing here owns global state. Files are processed strictly
//! one after another: each file's full parse-and-commit cycle finishes
//! before the next one starts, so interrupting a walk leaves every already
//! committed file durable and nothing half-linked.

pub mod error;
pub mod pack;
pub mod scan;
