//! User preferences of the extension

use crate::{Error, Result};
use kpx_fs::expand_home;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of search results shown
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Extension preferences, keyed the way the launcher names them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Preferences {
    /// Path to the `.kdbx` file; may start with `~`
    pub database_path: String,
    /// Number of search results to show
    pub max_results: usize,
    /// Seconds of inactivity before the database locks; 0 disables
    pub inactivity_lock_timeout: u64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            database_path: String::new(),
            max_results: DEFAULT_MAX_RESULTS,
            inactivity_lock_timeout: 0,
        }
    }
}

impl Preferences {
    /// The database path with `~` expanded
    pub fn db_path(&self) -> PathBuf {
        expand_home(&self.database_path)
    }
}

pub(crate) fn parse_number<T: std::str::FromStr>(id: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidPreference {
        id: id.to_string(),
        value: value.to_string(),
    })
}
