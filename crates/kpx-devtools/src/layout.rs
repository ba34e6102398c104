//! Location of the installed extension, the working checkout and the backup

use crate::config::DevConfig;
use crate::{Error, Result};
use kpx_fs::{ExtensionPath, NormalizedPath};
use std::path::Path;

/// Resolved paths for one extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionLayout {
    /// Reverse-domain identifier of the extension
    pub extension_id: String,
    /// The development checkout
    pub working_dir: NormalizedPath,
    /// Where the host loads the extension from
    pub installed_dir: NormalizedPath,
    /// Where the pre-development installation is preserved
    pub backup_dir: NormalizedPath,
}

impl ExtensionLayout {
    /// Build a layout from explicit roots.
    ///
    /// The installed directory is `<data_home>/ulauncher/extensions/<id>`.
    pub fn new(
        extension_id: &str,
        working_dir: &Path,
        data_home: &Path,
        backup_dir: &Path,
    ) -> Result<Self> {
        validate_extension_id(extension_id)?;

        let installed_dir = NormalizedPath::new(data_home)
            .join(ExtensionPath::HostDataDir.as_str())
            .join(ExtensionPath::ExtensionsDir.as_str())
            .join(extension_id);

        Ok(Self {
            extension_id: extension_id.to_string(),
            working_dir: NormalizedPath::new(working_dir),
            installed_dir,
            backup_dir: NormalizedPath::new(backup_dir),
        })
    }

    /// Resolve the layout for `working_dir` using the config overrides,
    /// falling back to the platform data home and temp directory.
    pub fn resolve(config: &DevConfig, working_dir: &Path) -> Result<Self> {
        let data_home = match &config.data_home {
            Some(path) => path.clone(),
            None => dirs::data_local_dir().ok_or(Error::DataHomeUnavailable)?,
        };
        let backup_dir = config
            .backup_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(&config.extension_id));

        let layout = Self::new(&config.extension_id, working_dir, &data_home, &backup_dir)?;
        tracing::debug!(
            installed = %layout.installed_dir,
            backup = %layout.backup_dir,
            working = %layout.working_dir,
            "Resolved extension layout"
        );
        Ok(layout)
    }
}

/// Validate that an extension id is safe for use as a single directory
/// component.
pub fn validate_extension_id(id: &str) -> Result<()> {
    let reason = if id.is_empty() {
        Some("must not be empty")
    } else if id == "." || id == ".." {
        Some("must not be a dot segment")
    } else if id.contains(['/', '\\']) {
        Some("must not contain path separators")
    } else if id.chars().any(char::is_whitespace) {
        Some("must not contain whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidExtensionId {
            id: id.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
