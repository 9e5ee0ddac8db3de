use super::{Author, Genre};
use folio_extract::Language;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// A cataloged book.
///
/// The source `path` is the natural key: re-indexing the same path is a
/// no-op re-confirmation, never a duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Store-assigned identifier.
    pub id: i64,
    pub title: String,
    pub language: Language,
    /// Path of the source file this book was extracted from.
    pub path: PathBuf,
}

/// A book together with its resolved author and genre sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    pub book: Book,
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
}

impl Display for BookDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let authors =
            self.authors.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        write!(f, "{}: {}", authors, self.book.title)
    }
}

/// Raw row shape of the `books` table.
#[derive(sqlx::FromRow)]
pub(crate) struct BookRow {
    id: i64,
    title: String,
    lang: String,
    path: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            language: Language::from(row.lang),
            path: PathBuf::from(row.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_display_joins_authors() {
        let details = BookDetails {
            book: Book {
                id: 1,
                title: "Test Book".to_string(),
                language: Language::new("en"),
                path: PathBuf::from("/books/test.fb2"),
            },
            authors: vec![
                Author { id: 1, firstname: "Jane".to_string(), lastname: "Doe".to_string() },
                Author { id: 2, firstname: "John".to_string(), lastname: "Smith".to_string() },
            ],
            genres: vec![],
        };
        assert_eq!(details.to_string(), "Doe Jane,Smith John: Test Book");
    }
}
