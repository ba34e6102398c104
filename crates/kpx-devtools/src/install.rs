//! Development install: swap the installed extension for a symlink to the
//! working checkout, and put it back afterwards

use crate::backup::{Backup, BackupManager};
use crate::layout::ExtensionLayout;
use crate::{Error, Result};
use kpx_fs::io::{self, EntryKind};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of [`InstallManager::symlink`]
#[derive(Debug, Clone)]
pub enum LinkOutcome {
    /// The installed path already pointed at the working directory
    AlreadyLinked,
    /// The link was created
    Linked {
        /// Backup taken of the previous installation, if there was one
        backup: Option<Backup>,
    },
}

/// Outcome of [`InstallManager::unlink`]
#[derive(Debug, Clone)]
pub enum UnlinkOutcome {
    /// The previous installation was restored from the backup
    Restored(Backup),
    /// The development link was removed and there was nothing to restore
    Removed,
}

/// What currently occupies the installed path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum InstallState {
    /// Nothing is installed
    Missing,
    /// A symlink to the working directory
    Linked,
    /// A symlink to somewhere else
    ForeignLink { target: PathBuf },
    /// A regular installation
    Installed,
}

/// Snapshot of the development install state
#[derive(Debug, Clone, Serialize)]
pub struct InstallStatus {
    pub installed_dir: String,
    pub working_dir: String,
    pub backup_dir: String,
    #[serde(flatten)]
    pub state: InstallState,
    pub backup_pending: bool,
}

/// Performs the symlink/unlink dance for one extension
#[derive(Debug, Clone)]
pub struct InstallManager {
    layout: ExtensionLayout,
    backups: BackupManager,
}

impl InstallManager {
    pub fn new(layout: ExtensionLayout) -> Self {
        let backups = BackupManager::new(&layout.extension_id, layout.backup_dir.clone());
        Self { layout, backups }
    }

    pub fn layout(&self) -> &ExtensionLayout {
        &self.layout
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Inspect the installed path
    pub fn state(&self) -> Result<InstallState> {
        let installed = self.layout.installed_dir.to_native();
        Ok(match io::entry_kind(&installed)? {
            EntryKind::Missing => InstallState::Missing,
            EntryKind::Symlink { target } => {
                if io::resolves_to(&installed, &self.layout.working_dir.to_native()) {
                    InstallState::Linked
                } else {
                    InstallState::ForeignLink { target }
                }
            }
            EntryKind::Directory | EntryKind::File => InstallState::Installed,
        })
    }

    pub fn status(&self) -> Result<InstallStatus> {
        Ok(InstallStatus {
            installed_dir: self.layout.installed_dir.to_string(),
            working_dir: self.layout.working_dir.to_string(),
            backup_dir: self.layout.backup_dir.to_string(),
            state: self.state()?,
            backup_pending: self.backups.has_backup(),
        })
    }

    /// Replace the installed extension with a symlink to the working
    /// directory.
    ///
    /// A real installation (or a link elsewhere) is backed up and verified
    /// first; nothing is removed unless the backup succeeded. A working
    /// directory that is, contains or sits inside the installation is
    /// refused with [`Error::WorkingDirOverlapsInstall`]. An existing
    /// backup is never replaced by a backup of our own link, and is kept
    /// when nothing is installed.
    pub fn symlink(&self) -> Result<LinkOutcome> {
        let installed = &self.layout.installed_dir;
        let working = &self.layout.working_dir;

        if !working.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("working directory {} does not exist", working),
            )));
        }

        let backup = match self.state()? {
            InstallState::Linked => {
                tracing::info!(installed = %installed, "Already linked to working directory");
                return Ok(LinkOutcome::AlreadyLinked);
            }
            InstallState::Missing => {
                if self.backups.has_backup() {
                    tracing::warn!(
                        backup = %self.backups.backup_dir(),
                        "Nothing installed; keeping backup from an earlier session"
                    );
                }
                None
            }
            InstallState::Installed => {
                if io::paths_overlap(&installed.to_native(), &working.to_native()) {
                    return Err(Error::WorkingDirOverlapsInstall {
                        working: working.to_native(),
                        installed: installed.to_native(),
                    });
                }
                Some(self.backups.create_backup(installed)?)
            }
            InstallState::ForeignLink { .. } => Some(self.backups.create_backup(installed)?),
        };

        io::remove_path(&installed.to_native())?;
        if let Some(parent) = installed.parent() {
            std::fs::create_dir_all(parent.to_native())?;
        }
        io::symlink_dir(&working.to_native(), &installed.to_native())?;

        tracing::info!(link = %installed, target = %working, "Linked extension to working directory");
        Ok(LinkOutcome::Linked { backup })
    }

    /// Remove the development install and restore the backup, if any.
    ///
    /// Without a backup, only our own link to the working directory is
    /// removed; a real installation or a foreign link is left alone and
    /// [`Error::NoBackup`] is returned. After a verified restore the backup
    /// is deleted.
    pub fn unlink(&self) -> Result<UnlinkOutcome> {
        let installed = &self.layout.installed_dir;
        let has_backup = self.backups.has_backup();

        if !has_backup && self.state()? != InstallState::Linked {
            return Err(Error::NoBackup {
                backup: self.backups.backup_dir().to_native(),
                installed: installed.to_native(),
            });
        }

        io::remove_path(&installed.to_native())?;
        tracing::debug!(installed = %installed, "Removed installed extension");

        if !has_backup {
            tracing::info!("No backup to restore");
            return Ok(UnlinkOutcome::Removed);
        }

        let backup = self.backups.restore_backup(installed)?;
        self.backups.delete_backup()?;
        Ok(UnlinkOutcome::Restored(backup))
    }
}
