//! Backup and restore of a previously installed extension
//!
//! A backup lives in a single directory:
//! - `content/`: verbatim copy of the installed tree
//! - `backup.toml`: metadata, written last so its presence marks a
//!   complete backup

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use kpx_fs::checksum::compute_tree_checksum;
use kpx_fs::io::{self, EntryKind};
use kpx_fs::{ExtensionPath, NormalizedPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What was found at the installed path when the backup was taken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackupKind {
    /// A real directory (or file) copied into `content/`
    Tree {
        /// Tree checksum of the copied content
        checksum: String,
    },
    /// A symlink that did not point at the working directory
    Symlink {
        /// The stored link target
        target: PathBuf,
    },
}

/// Metadata for an extension backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMetadata {
    /// Extension identifier
    pub extension_id: String,
    /// When the backup was created
    pub created: DateTime<Utc>,
    /// The installed path that was backed up
    pub source: PathBuf,
    /// How the installation was preserved
    pub kind: BackupKind,
}

/// Information about an existing backup
#[derive(Debug, Clone)]
pub struct Backup {
    /// Path to the backup directory
    pub path: NormalizedPath,
    /// Backup metadata
    pub metadata: BackupMetadata,
}

/// Manages the single development backup of one extension
#[derive(Debug, Clone)]
pub struct BackupManager {
    extension_id: String,
    backup_dir: NormalizedPath,
}

impl BackupManager {
    /// Create a new BackupManager storing its backup in `backup_dir`
    pub fn new(extension_id: impl Into<String>, backup_dir: NormalizedPath) -> Self {
        Self {
            extension_id: extension_id.into(),
            backup_dir,
        }
    }

    /// The directory holding the backup
    pub fn backup_dir(&self) -> &NormalizedPath {
        &self.backup_dir
    }

    fn content_path(&self) -> NormalizedPath {
        self.backup_dir.join(ExtensionPath::BackupContent.as_str())
    }

    fn metadata_path(&self) -> NormalizedPath {
        self.backup_dir.join(ExtensionPath::BackupMetadata.as_str())
    }

    /// Check if a complete backup exists
    pub fn has_backup(&self) -> bool {
        self.metadata_path().is_file()
    }

    /// Back up whatever occupies `source`, replacing any previous backup.
    ///
    /// The new backup is assembled in a sibling `.partial` directory: tree
    /// copies are checksummed against the source and the metadata is
    /// written there first. Only then does it replace the previous backup.
    /// On failure the staging directory is removed and the previous backup
    /// and `source` are left untouched.
    pub fn create_backup(&self, source: &NormalizedPath) -> Result<Backup> {
        let staging = self.staging_dir();
        io::remove_path(&staging.to_native())?;

        let metadata = match self.stage(source, &staging) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(error = %e, staging = %staging, "Backup failed, discarding partial copy");
                io::remove_path(&staging.to_native())?;
                return Err(e);
            }
        };

        io::remove_path(&self.backup_dir.to_native())?;
        std::fs::rename(staging.to_native(), self.backup_dir.to_native())?;

        tracing::info!(source = %source, backup = %self.backup_dir, "Backed up installed extension");

        Ok(Backup {
            path: self.backup_dir.clone(),
            metadata,
        })
    }

    fn staging_dir(&self) -> NormalizedPath {
        NormalizedPath::new(format!("{}.partial", self.backup_dir.as_str()))
    }

    fn stage(&self, source: &NormalizedPath, staging: &NormalizedPath) -> Result<BackupMetadata> {
        let kind = match io::entry_kind(&source.to_native())? {
            EntryKind::Missing => {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("nothing to back up at {}", source),
                )));
            }
            EntryKind::Symlink { target } => BackupKind::Symlink { target },
            EntryKind::Directory | EntryKind::File => {
                let content = staging.join(ExtensionPath::BackupContent.as_str());
                BackupKind::Tree {
                    checksum: copy_verified(source, &content)?,
                }
            }
        };

        let metadata = BackupMetadata {
            extension_id: self.extension_id.clone(),
            created: Utc::now(),
            source: source.to_native(),
            kind,
        };
        let metadata_content = toml::to_string_pretty(&metadata)?;
        io::write_text(
            &staging.join(ExtensionPath::BackupMetadata.as_str()),
            &metadata_content,
        )?;
        Ok(metadata)
    }

    /// Get backup information, if a complete backup exists
    pub fn get_backup(&self) -> Result<Option<Backup>> {
        let metadata_path = self.metadata_path();
        if !metadata_path.is_file() {
            return Ok(None);
        }

        let content = kpx_fs::io::read_text(&metadata_path)?;
        let metadata: BackupMetadata =
            toml::from_str(&content).map_err(|e| Error::CorruptBackup {
                path: metadata_path.to_native(),
                message: e.to_string(),
            })?;

        Ok(Some(Backup {
            path: self.backup_dir.clone(),
            metadata,
        }))
    }

    /// Restore the backup to `dest`, which must be vacant.
    ///
    /// Tree backups are verified against the recorded checksum after
    /// copying. The backup itself is left in place.
    pub fn restore_backup(&self, dest: &NormalizedPath) -> Result<Backup> {
        let backup = self.get_backup()?.ok_or_else(|| Error::CorruptBackup {
            path: self.backup_dir.to_native(),
            message: "no backup metadata".to_string(),
        })?;

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent.to_native())?;
        }

        match &backup.metadata.kind {
            BackupKind::Symlink { target } => {
                io::symlink_dir(target, &dest.to_native())?;
            }
            BackupKind::Tree { checksum } => {
                let content = self.content_path();
                if !content.is_occupied() {
                    return Err(Error::CorruptBackup {
                        path: content.to_native(),
                        message: "backup content is missing".to_string(),
                    });
                }
                io::copy_tree(&content.to_native(), &dest.to_native())?;

                let actual = compute_tree_checksum(&dest.to_native())?;
                if &actual != checksum {
                    return Err(Error::BackupVerification {
                        path: dest.to_native(),
                        expected: checksum.clone(),
                        actual,
                    });
                }
            }
        }

        tracing::info!(dest = %dest, backup = %self.backup_dir, "Restored extension from backup");
        Ok(backup)
    }

    /// Delete the backup
    pub fn delete_backup(&self) -> Result<()> {
        io::remove_path(&self.backup_dir.to_native())?;
        Ok(())
    }
}

/// Copy `source` to `dest` and check the copy against the source checksum
fn copy_verified(source: &NormalizedPath, dest: &NormalizedPath) -> Result<String> {
    io::copy_tree(&source.to_native(), &dest.to_native())?;

    let expected = compute_tree_checksum(&source.to_native())?;
    let actual = compute_tree_checksum(&dest.to_native())?;
    if expected != actual {
        return Err(Error::BackupVerification {
            path: dest.to_native(),
            expected,
            actual,
        });
    }
    Ok(expected)
}
