use std::fmt::{Display, Formatter, Result as FmtResult};

/// A person credited as the author of a book.
///
/// Identity is the exact `(lastname, firstname)` pair; no fuzzy matching is
/// performed anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Name {
    pub firstname: String,
    pub lastname: String,
}

impl Name {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self { firstname: firstname.into(), lastname: lastname.into() }
    }

    /// Build a name from a single free-form creator string (EPUB `dc:creator`).
    ///
    /// Exactly two whitespace-separated tokens are read as
    /// `firstname lastname`. Any other shape (a mononym, or three and more
    /// tokens) uses the whole string as both parts.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_extract::Name;
    ///
    /// assert_eq!(Name::from_creator("Jane Doe"), Name::new("Jane", "Doe"));
    /// assert_eq!(Name::from_creator("Solo"), Name::new("Solo", "Solo"));
    /// ```
    pub fn from_creator(creator: &str) -> Self {
        let mut parts = creator.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(first), Some(last), None) => Self::new(first, last),
            _ => Self::new(creator.trim(), creator.trim()),
        }
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.lastname, self.firstname)
    }
}
