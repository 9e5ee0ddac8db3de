//! Identity resolution and idempotent registration.
//!
//! One [`Repository`] wraps the shared connection pool of an indexing run.
//! The write path is [`register`](Repository::register); everything else is
//! the read side used by listings and lookups.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{Author, Book, BookDetails, BookRow, Genre};
use exn::{OptionExt, ResultExt};
use folio_extract::{Name, Record};
use sqlx::{Executor, Sqlite, SqlitePool};
use std::path::Path;
use tracing::instrument;

/// Outcome of registering one extracted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    /// The book the record resolved to.
    pub book: Book,
    /// `true` if this registration created the book; `false` when the path
    /// was already cataloged and the call was a no-op re-confirmation.
    pub created: bool,
}

/// Repository over the catalog entities.
///
/// Holds a clone of the pool, so it is cheap to pass around; all writes go
/// through short-lived per-file transactions.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}

impl Repository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn path_str(path: &Path) -> Result<&str> {
        path.to_str().ok_or_raise(|| ErrorKind::InvalidData("path"))
    }

    // =========================================================================
    // Registration (the write path)
    // =========================================================================

    /// Registers one extracted record: resolve-or-create every referenced
    /// entity, then link them, in a single transaction.
    ///
    /// - Each author is looked up by exact `(lastname, firstname)`; a miss
    ///   creates the row. Same for each genre by name.
    /// - The book is looked up by source path. A hit makes this a no-op
    ///   re-confirmation (links are re-asserted, nothing is modified); a
    ///   miss creates the book and its links.
    ///
    /// Either everything for this file commits or nothing does: a fault
    /// rolls the transaction back and surfaces as
    /// [`ErrorKind::Database`], leaving the catalog as it was.
    #[instrument(skip(self, record), fields(path = %record.path.display()))]
    pub async fn register(&self, record: &Record) -> Result<Registered> {
        let path = Self::path_str(&record.path)?;
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;

        let mut author_ids: Vec<i64> = Vec::with_capacity(record.authors.len());
        for name in &record.authors {
            // A duplicate pair within one record resolves to the row staged
            // moments earlier; the lookup sees uncommitted writes.
            let id = match Self::author_id(&mut *tx, name).await? {
                Some(id) => id,
                None => sqlx::query_scalar(include_str!("../queries/insert_author.sql"))
                    .bind(&name.lastname)
                    .bind(&name.firstname)
                    .fetch_one(&mut *tx)
                    .await
                    .or_raise(|| ErrorKind::Database)?,
            };
            author_ids.push(id);
        }

        let mut genre_ids: Vec<i64> = Vec::with_capacity(record.genres.len());
        for genre in &record.genres {
            let id = match Self::genre_id(&mut *tx, genre).await? {
                Some(id) => id,
                None => sqlx::query_scalar(include_str!("../queries/insert_genre.sql"))
                    .bind(genre)
                    .fetch_one(&mut *tx)
                    .await
                    .or_raise(|| ErrorKind::Database)?,
            };
            genre_ids.push(id);
        }

        let existing: Option<BookRow> =
            sqlx::query_as(include_str!("../queries/find_book_by_path.sql"))
                .bind(path)
                .fetch_optional(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
        let (book, created): (Book, bool) = match existing {
            Some(row) => (row.into(), false),
            None => {
                let row: BookRow = sqlx::query_as(include_str!("../queries/insert_book.sql"))
                    .bind(&record.title)
                    .bind(record.language.as_str())
                    .bind(path)
                    .fetch_one(&mut *tx)
                    .await
                    .or_raise(|| ErrorKind::Database)?;
                (row.into(), true)
            },
        };

        for author_id in &author_ids {
            sqlx::query(include_str!("../queries/link_author.sql"))
                .bind(book.id)
                .bind(*author_id)
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }
        for genre_id in &genre_ids {
            sqlx::query(include_str!("../queries/link_genre.sql"))
                .bind(book.id)
                .bind(*genre_id)
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
        }

        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        if created {
            tracing::info!(title = %book.title, "cataloged");
        } else {
            tracing::debug!(title = %book.title, "already cataloged");
        }
        Ok(Registered { book, created })
    }

    async fn author_id<'e, E>(executor: E, name: &Name) -> Result<Option<i64>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar(include_str!("../queries/find_author_id.sql"))
            .bind(&name.lastname)
            .bind(&name.firstname)
            .fetch_optional(executor)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    async fn genre_id<'e, E>(executor: E, name: &str) -> Result<Option<i64>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar(include_str!("../queries/find_genre_id.sql"))
            .bind(name)
            .fetch_optional(executor)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Get the book cataloged from the given source path, if any.
    pub async fn find_book_by_path(&self, path: impl AsRef<Path>) -> Result<Option<Book>> {
        let row: Option<BookRow> =
            sqlx::query_as(include_str!("../queries/find_book_by_path.sql"))
                .bind(Self::path_str(path.as_ref())?)
                .fetch_optional(&self.pool)
                .await
                .or_raise(|| ErrorKind::Database)?;
        Ok(row.map(Into::into))
    }

    /// Get authors by last name, optionally narrowed by first name.
    pub async fn authors_by_name(
        &self,
        lastname: &str,
        firstname: Option<&str>,
    ) -> Result<Vec<Author>> {
        sqlx::query_as(include_str!("../queries/find_authors_by_name.sql"))
            .bind(lastname)
            .bind(firstname)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    /// Get a genre by its exact name.
    pub async fn find_genre(&self, name: &str) -> Result<Option<Genre>> {
        sqlx::query_as(include_str!("../queries/find_genre_by_name.sql"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// All authors, ordered by last name then first name.
    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        sqlx::query_as(include_str!("../queries/list_authors.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    /// All genres, ordered by name.
    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        sqlx::query_as(include_str!("../queries/list_genres.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    /// All books with their author and genre sets, ordered by title.
    pub async fn list_books(&self) -> Result<Vec<BookDetails>> {
        let rows: Vec<BookRow> = sqlx::query_as(include_str!("../queries/list_books.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.with_details(rows).await
    }

    /// Books credited to the given author, ordered by title.
    pub async fn books_by_author(&self, author_id: i64) -> Result<Vec<BookDetails>> {
        let rows: Vec<BookRow> = sqlx::query_as(include_str!("../queries/books_by_author.sql"))
            .bind(author_id)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.with_details(rows).await
    }

    /// Books tagged with the given genre name, ordered by title.
    pub async fn books_by_genre(&self, genre: &str) -> Result<Vec<BookDetails>> {
        let rows: Vec<BookRow> = sqlx::query_as(include_str!("../queries/books_by_genre.sql"))
            .bind(genre)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.with_details(rows).await
    }

    /// Books in the given language, ordered by title.
    pub async fn books_by_language(&self, lang: &str) -> Result<Vec<BookDetails>> {
        let rows: Vec<BookRow> = sqlx::query_as(include_str!("../queries/books_by_language.sql"))
            .bind(lang)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        self.with_details(rows).await
    }

    async fn with_details(&self, rows: Vec<BookRow>) -> Result<Vec<BookDetails>> {
        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let book: Book = row.into();
            let authors: Vec<Author> =
                sqlx::query_as(include_str!("../queries/authors_of_book.sql"))
                    .bind(book.id)
                    .fetch_all(&self.pool)
                    .await
                    .or_raise(|| ErrorKind::Database)?;
            let genres: Vec<Genre> =
                sqlx::query_as(include_str!("../queries/genres_of_book.sql"))
                    .bind(book.id)
                    .fetch_all(&self.pool)
                    .await
                    .or_raise(|| ErrorKind::Database)?;
            details.push(BookDetails { book, authors, genres });
        }
        Ok(details)
    }

    // =========================================================================
    // Counts
    // =========================================================================

    /// Count the books in the catalog.
    pub async fn count_books(&self) -> Result<u64> {
        self.count(include_str!("../queries/count_books.sql")).await
    }

    /// Count the authors in the catalog.
    pub async fn count_authors(&self) -> Result<u64> {
        self.count(include_str!("../queries/count_authors.sql")).await
    }

    /// Count the genres in the catalog.
    pub async fn count_genres(&self) -> Result<u64> {
        self.count(include_str!("../queries/count_genres.sql")).await
    }

    async fn count(&self, query: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(query)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        u64::try_from(count).or_raise(|| ErrorKind::InvalidData("count"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_extract::Language;
    use std::path::PathBuf;

    fn record(title: &str, path: &str, authors: Vec<Name>, genres: Vec<&str>) -> Record {
        Record {
            title: title.to_string(),
            language: Language::new("en"),
            authors,
            genres: genres.into_iter().map(String::from).collect(),
            path: PathBuf::from(path),
        }
    }

    async fn repo() -> Repository {
        let db = Database::connect_in_memory().await.unwrap();
        Repository::from(&db)
    }

    #[tokio::test]
    async fn register_creates_all_entities() {
        let repo = repo().await;
        let record = record(
            "Test Book",
            "/books/test.fb2",
            vec![Name::new("Jane", "Doe")],
            vec!["sf"],
        );
        let registered = repo.register(&record).await.unwrap();
        assert!(registered.created);
        assert_eq!(registered.book.title, "Test Book");
        assert_eq!(registered.book.language, Language::new("en"));

        assert_eq!(repo.count_books().await.unwrap(), 1);
        assert_eq!(repo.count_authors().await.unwrap(), 1);
        assert_eq!(repo.count_genres().await.unwrap(), 1);

        let books = repo.list_books().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].authors.len(), 1);
        assert_eq!(books[0].authors[0].lastname, "Doe");
        assert_eq!(books[0].genres.len(), 1);
        assert_eq!(books[0].genres[0].name, "sf");
    }

    #[tokio::test]
    async fn reregistration_is_a_noop() {
        let repo = repo().await;
        let record = record(
            "Test Book",
            "/books/test.fb2",
            vec![Name::new("Jane", "Doe")],
            vec!["sf"],
        );
        let first = repo.register(&record).await.unwrap();
        let second = repo.register(&record).await.unwrap();
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.book, second.book);
        assert_eq!(repo.count_books().await.unwrap(), 1);
        assert_eq!(repo.count_authors().await.unwrap(), 1);
        assert_eq!(repo.count_genres().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn shared_authors_and_genres_are_reused() {
        let repo = repo().await;
        let one = record("One", "/books/one.fb2", vec![Name::new("Jane", "Doe")], vec!["sf"]);
        let two = record("Two", "/books/two.fb2", vec![Name::new("Jane", "Doe")], vec!["sf", "thriller"]);
        repo.register(&one).await.unwrap();
        repo.register(&two).await.unwrap();

        assert_eq!(repo.count_books().await.unwrap(), 2);
        assert_eq!(repo.count_authors().await.unwrap(), 1);
        assert_eq!(repo.count_genres().await.unwrap(), 2);

        let authors = repo.authors_by_name("Doe", Some("Jane")).await.unwrap();
        assert_eq!(authors.len(), 1);
        let books = repo.books_by_author(authors[0].id).await.unwrap();
        assert_eq!(books.len(), 2);
    }

    #[tokio::test]
    async fn author_order_follows_the_document() {
        let repo = repo().await;
        let record = record(
            "Duo",
            "/books/duo.fb2",
            vec![Name::new("Zoe", "Zimmer"), Name::new("Abe", "Adler")],
            vec![],
        );
        repo.register(&record).await.unwrap();
        let books = repo.list_books().await.unwrap();
        let authors: Vec<String> = books[0].authors.iter().map(ToString::to_string).collect();
        assert_eq!(authors, vec!["Zimmer Zoe", "Adler Abe"]);
    }

    #[tokio::test]
    async fn duplicate_author_within_one_record_is_resolved_once() {
        let repo = repo().await;
        let record = record(
            "Echo",
            "/books/echo.fb2",
            vec![Name::new("Jane", "Doe"), Name::new("Jane", "Doe")],
            vec![],
        );
        repo.register(&record).await.unwrap();
        assert_eq!(repo.count_authors().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn lookups_miss_with_none_not_an_error() {
        let repo = repo().await;
        assert_eq!(repo.find_book_by_path("/books/nope.fb2").await.unwrap(), None);
        assert_eq!(repo.find_genre("nope").await.unwrap(), None);
        assert!(repo.authors_by_name("Nobody", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_filters() {
        let repo = repo().await;
        let mut ru = record("Par", "/books/ru.fb2", vec![Name::new("A", "B")], vec!["prose_classic"]);
        ru.language = Language::new("ru");
        let en = record("Voyage", "/books/en.epub", vec![Name::new("C", "D")], vec!["sf"]);
        repo.register(&ru).await.unwrap();
        repo.register(&en).await.unwrap();

        let russian = repo.books_by_language("ru").await.unwrap();
        assert_eq!(russian.len(), 1);
        assert_eq!(russian[0].book.title, "Par");

        let sf = repo.books_by_genre("sf").await.unwrap();
        assert_eq!(sf.len(), 1);
        assert_eq!(sf[0].book.title, "Voyage");

        assert!(repo.books_by_genre("fantasy").await.unwrap().is_empty());
    }
}
