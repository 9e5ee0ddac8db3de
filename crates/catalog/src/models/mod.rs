mod author;
mod book;
mod genre;

pub use self::author::Author;
pub use self::book::{Book, BookDetails};
pub use self::genre::Genre;

pub(crate) use self::book::BookRow;
