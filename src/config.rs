use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::store::SqliteStore;
use crate::Result;

/// On-disk configuration naming the calibration store location.
///
/// The store path is always injected, either through this file or passed
/// directly to [`SqliteStore::open`]; nothing in the crate resolves
/// paths relative to the working directory on its own.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    pub database: PathBuf,
}

impl Config {
    /// Read a TOML configuration file.
    ///
    /// # Errors
    /// Fails when the file cannot be read or does not parse.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Open the calibration store this configuration points at.
    ///
    /// # Errors
    /// Fails when the database cannot be opened.
    pub fn open_store(&self) -> Result<SqliteStore> {
        SqliteStore::open(&self.database)
    }
}
