mod genre;
mod lang;
mod name;
mod record;

pub use self::genre::{UNKNOWN_GENRE, describe_genre};
pub use self::lang::Language;
pub use self::name::Name;
pub use self::record::Record;
