//! Error types for kpx-vault

use std::path::PathBuf;

/// Result type for kpx-vault operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to `keepassxc-cli`
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The CLI could not be started
    #[error("Cannot execute keepassxc-cli")]
    CliNotFound,

    /// No database file at the configured path
    #[error("Database file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The database must be unlocked first
    #[error("Database is locked")]
    LockedDatabase,

    /// The CLI reported an error
    #[error("keepassxc-cli: {message}")]
    Cli { message: String },

    /// No database path has been configured yet
    #[error("No database path configured")]
    NoDatabase,

    /// A preference value could not be parsed
    #[error("Invalid value '{value}' for preference '{id}'")]
    InvalidPreference { id: String, value: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
