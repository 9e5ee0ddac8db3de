//! Configuration loading for folio.
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. built-in defaults (platform data dir for the catalog database)
//! 2. a TOML file - `config.toml` in the platform config dir, or wherever
//!    [`Config::load_from`] is pointed
//! 3. environment variables prefixed `FOLIO_`, with `__` separating nesting
//!    levels (`FOLIO_DATABASE__PATH=/tmp/test.db`)
//!
//! A missing config file is not an error; defaults simply apply. The file is
//! never written by this crate.

pub mod error;

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ErrorKind, Result};

const ENV_PREFIX: &str = "FOLIO_";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub pack: PackConfig,
}

/// Where the catalog database lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file; created on first use.
    pub path: PathBuf,
}

/// Defaults for the repackaging sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Remove loose originals after their archive verifies clean.
    pub remove_original: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_database_path() }
    }
}

impl Config {
    /// Loads configuration from the default config file location, the
    /// environment, and built-in defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_file())
    }

    /// Loads configuration with an explicit config file path.
    pub fn load_from(file: impl AsRef<Path>) -> Result<Self> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .or_raise(|| ErrorKind::Invalid)?;
        tracing::debug!(database = %config.database.path.display(), "configuration loaded");
        Ok(config)
    }
}

/// Default location of the config file (`config.toml` in the platform
/// config dir), falling back to the working directory when the platform
/// dirs cannot be determined.
pub fn default_config_file() -> PathBuf {
    match ProjectDirs::from("", "", "folio") {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from("folio.toml"),
    }
}

fn default_database_path() -> PathBuf {
    match ProjectDirs::from("", "", "folio") {
        Some(dirs) => dirs.data_dir().join("folio.db"),
        None => PathBuf::from("folio.db"),
    }
}
