use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// The language a book is written in, as declared by its metadata.
///
/// Kept as the raw declared code (`"ru"`, `"en"`, ...). Sources that omit
/// the language get [`Language::FALLBACK`] - the collections this tool grew
/// up around are overwhelmingly Russian, and old FB2 files from that era
/// routinely leave the element out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Language(String);

impl Language {
    /// Assumed language when the source document declares none.
    pub const FALLBACK: &'static str = "ru";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Self(Self::FALLBACK.to_string())
    }
}

impl FromStr for Language {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
impl From<String> for Language {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}
impl From<&str> for Language {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}
