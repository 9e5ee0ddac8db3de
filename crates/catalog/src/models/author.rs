use std::fmt::{Display, Formatter, Result as FmtResult};

/// A cataloged author.
///
/// Created lazily the first time a `(lastname, firstname)` pair is seen and
/// reused for every later encounter, within and across indexing runs.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Author {
    /// Store-assigned identifier.
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.lastname, self.firstname)
    }
}
