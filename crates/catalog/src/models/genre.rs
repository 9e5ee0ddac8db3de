use folio_extract::models::describe_genre;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A cataloged genre.
///
/// The `name` is the code exactly as extracted from the source document;
/// uniqueness is on that string. Display descriptions come from the static
/// genre table and are not stored.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Genre {
    /// Store-assigned identifier.
    pub id: i64,
    pub name: String,
}

impl Genre {
    /// Human-readable description of this genre's code, or `"unknown"` for
    /// codes outside the table.
    pub fn title(&self) -> &'static str {
        describe_genre(&self.name)
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.name, self.title())
    }
}
