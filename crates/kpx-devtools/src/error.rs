//! Error types for kpx-devtools

use std::path::PathBuf;

/// Result type for kpx-devtools operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running workflow tasks
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The program for a step could not be started
    #[error("Command not found: {command}")]
    CommandNotFound { command: String },

    /// A step exited unsuccessfully
    #[error("Command failed (exit code {code}): {command}")]
    CommandFailed { command: String, code: i32 },

    /// A step was terminated by a signal
    #[error("Command terminated by signal: {command}")]
    CommandTerminated { command: String },

    /// Nothing to restore and the installed path is not a development link
    #[error(
        "No backup found at {backup} and {installed} is not a development symlink"
    )]
    NoBackup { backup: PathBuf, installed: PathBuf },

    /// Linking would replace the checkout with a link to itself
    #[error("Working directory {working} overlaps the installed extension at {installed}")]
    WorkingDirOverlapsInstall { working: PathBuf, installed: PathBuf },

    /// The backup metadata could not be found or read
    #[error("Backup at {path} is incomplete: {message}")]
    CorruptBackup { path: PathBuf, message: String },

    /// A copied tree does not match its source
    #[error("Checksum mismatch for {path}: expected {expected}, found {actual}")]
    BackupVerification {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Extension identifier cannot be used as a single path component
    #[error("Invalid extension id '{id}': {reason}")]
    InvalidExtensionId { id: String, reason: String },

    /// The platform has no local data directory
    #[error("Could not determine the local data directory; set `data_home` in kpx.toml")]
    DataHomeUnavailable,

    /// Filesystem error from kpx-fs
    #[error(transparent)]
    Fs(#[from] kpx_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
