//! The `folio` command-line interface.
//!
//! Thin orchestration over the workspace crates: load configuration, open
//! the catalog, hand off to the batch drivers, print their reports. All
//! domain logic lives in the `folio-*` crates.

mod error;

use clap::{ArgGroup, Parser, Subcommand};
use exn::ResultExt;
use folio_catalog::{Database, Repository};
use folio_config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::error::{ErrorKind, Result};

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Catalog a personal e-book collection")]
struct Cli {
    /// Path of the catalog database (overrides configuration)
    #[arg(long, global = true, value_name = "FILE")]
    database: Option<PathBuf>,
    /// Path of the configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Index a file or directory tree into the catalog
    Index {
        /// File or directory to index
        path: PathBuf,
    },
    /// List cataloged books with their authors
    #[command(group(ArgGroup::new("filter").args(["genre", "lang", "author"])))]
    Books {
        /// Only books tagged with this genre code
        #[arg(long)]
        genre: Option<String>,
        /// Only books in this language
        #[arg(long)]
        lang: Option<String>,
        /// Only books by authors with this last name
        #[arg(long)]
        author: Option<String>,
    },
    /// List cataloged authors
    Authors,
    /// List cataloged genres
    Genres,
    /// Compress loose .fb2 files into individual zip archives
    Pack {
        /// File or directory to sweep
        path: PathBuf,
        /// Remove originals once their archive verifies clean
        #[arg(long)]
        remove_original: bool,
    },
    /// Verify documents and archives without touching the catalog
    Verify {
        /// File or directory to sweep
        path: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = ?error, "folio failed");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Cli { database, config, command } = cli;
    let config = match config {
        Some(file) => Config::load_from(file),
        None => Config::load(),
    }
    .or_raise(|| ErrorKind::Config)?;

    // The pack/verify sweeps don't need a catalog; don't create one for them.
    match command {
        Command::Pack { path, remove_original } => {
            let remove = remove_original || config.pack.remove_original;
            let report = folio_library::pack::pack_tree(&path, remove).or_raise(|| ErrorKind::Library)?;
            println!("{report}");
            Ok(())
        },
        Command::Verify { path } => {
            let report = folio_library::pack::verify_tree(&path).or_raise(|| ErrorKind::Library)?;
            println!("{report}");
            Ok(())
        },
        command => {
            let database = open_database(database, &config).await?;
            let repo = Repository::from(&database);
            let result = dispatch(command, &repo).await;
            database.close().await;
            result
        },
    }
}

async fn dispatch(command: Command, repo: &Repository) -> Result<()> {
    match command {
        Command::Index { path } => {
            let report =
                folio_library::scan::index_tree(repo, &path).await.or_raise(|| ErrorKind::Library)?;
            println!("{report}");
        },
        Command::Books { genre, lang, author } => {
            let books = if let Some(genre) = genre {
                repo.books_by_genre(&genre).await.or_raise(|| ErrorKind::Catalog)?
            } else if let Some(lang) = lang {
                repo.books_by_language(&lang).await.or_raise(|| ErrorKind::Catalog)?
            } else if let Some(lastname) = author {
                let mut books = Vec::new();
                for author in
                    repo.authors_by_name(&lastname, None).await.or_raise(|| ErrorKind::Catalog)?
                {
                    books.extend(
                        repo.books_by_author(author.id).await.or_raise(|| ErrorKind::Catalog)?,
                    );
                }
                books
            } else {
                repo.list_books().await.or_raise(|| ErrorKind::Catalog)?
            };
            for book in books {
                println!("{book}");
            }
        },
        Command::Authors => {
            for author in repo.list_authors().await.or_raise(|| ErrorKind::Catalog)? {
                println!("{author}");
            }
        },
        Command::Genres => {
            for genre in repo.list_genres().await.or_raise(|| ErrorKind::Catalog)? {
                println!("{genre}");
            }
        },
        // Handled before a database is opened.
        Command::Pack { .. } | Command::Verify { .. } => unreachable!(),
    }
    Ok(())
}

async fn open_database(explicit: Option<PathBuf>, config: &Config) -> Result<Database> {
    let path = explicit.unwrap_or_else(|| config.database.path.clone());
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
    }
    Database::connect(&path).await.or_raise(|| ErrorKind::Catalog)
}
