//! Constants and enums for extension filesystem paths.

use std::path::Path;

/// Well-known path components used when locating installed extensions
/// and their development backups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionPath {
    /// The host's directory under the local data home
    HostDataDir,
    /// The installed-extensions directory inside the host data dir
    ExtensionsDir,
    /// Copied extension tree inside a backup
    BackupContent,
    /// Metadata file inside a backup
    BackupMetadata,
    /// Workflow configuration file in the working directory
    WorkflowConfig,
}

impl ExtensionPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HostDataDir => "ulauncher",
            Self::ExtensionsDir => "extensions",
            Self::BackupContent => "content",
            Self::BackupMetadata => "backup.toml",
            Self::WorkflowConfig => "kpx.toml",
        }
    }
}

impl AsRef<Path> for ExtensionPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ExtensionPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ExtensionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
