//! SQLite catalog for an e-book collection.
//!
//! The catalog is the durable side of the indexing pipeline. It stores three
//! entity kinds - [`Author`](models::Author), [`Genre`](models::Genre), and
//! [`Book`](models::Book) - with many-to-many links from books to the other
//! two, and guarantees that re-registering the same source file never
//! creates duplicates:
//!
//! - a book is identified by its source **path**
//! - an author by the exact **(lastname, firstname)** pair
//! - a genre by its **name**
//!
//! [`Repository::register`] is the single write entry point: it resolves or
//! creates every entity referenced by one extracted record inside one
//! transaction, so a file is either fully cataloged or not at all. Lookups
//! that miss return `Ok(None)` - "not found" is the normal trigger for
//! creation, not a fault.

mod db;
pub mod error;
pub mod models;
mod repo;

pub use crate::db::Database;
pub use crate::repo::{Registered, Repository};
