//! Working directory and config discovery
//!
//! Without `-C`, the nearest directory at or above the current one that
//! holds a `kpx.toml` becomes the working directory, so commands work from
//! anywhere inside the extension checkout.

use crate::cli::DatabaseArgs;
use crate::error::{CliError, Result};
use kpx_devtools::DevConfig;
use kpx_fs::{ConfigStore, ExtensionPath, NormalizedPath};
use kpx_vault::{KeepassxcDatabase, Preferences, DEFAULT_CLI};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of `kpx.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpxConfig {
    /// Development workflow settings
    pub workflow: DevConfig,
    /// Launcher preferences of the extension
    pub extension: Preferences,
    /// Command line used to run keepassxc-cli
    pub keepassxc_cli: Vec<String>,
}

impl Default for KpxConfig {
    fn default() -> Self {
        Self {
            workflow: DevConfig::default(),
            extension: Preferences::default(),
            keepassxc_cli: vec![DEFAULT_CLI.to_string()],
        }
    }
}

/// Everything a command needs to know about where it runs
#[derive(Debug, Clone)]
pub struct Context {
    pub working_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub config: KpxConfig,
}

impl Context {
    /// Resolve the working directory and load the config.
    ///
    /// An explicit `config` path must exist; a discovered one is optional.
    pub fn load(dir: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let start = match dir {
            Some(dir) => cwd.join(dir),
            None => cwd,
        };

        let (working_dir, config_path) = match config {
            Some(path) => (start.clone(), Some(start.join(path))),
            None if dir.is_some() => {
                let candidate = start.join(ExtensionPath::WorkflowConfig.as_str());
                let found = candidate.is_file().then_some(candidate);
                (start.clone(), found)
            }
            None => match find_config(&start) {
                Some((root, path)) => (root, Some(path)),
                None => (start.clone(), None),
            },
        };

        if !working_dir.is_dir() {
            return Err(CliError::user(format!(
                "Working directory does not exist: {}",
                working_dir.display()
            )));
        }

        let config = match &config_path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config");
                ConfigStore::new().load(&NormalizedPath::new(path))?
            }
            None => KpxConfig::default(),
        };

        Ok(Self {
            working_dir,
            config_path,
            config,
        })
    }

    /// Preferences from the config with command line overrides applied
    pub fn preferences(&self, args: &DatabaseArgs) -> Preferences {
        let mut prefs = self.config.extension.clone();
        if let Some(database) = &args.database {
            prefs.database_path = database.clone();
        }
        if let Some(max_results) = args.max_results {
            prefs.max_results = max_results;
        }
        if let Some(timeout) = args.lock_timeout {
            prefs.inactivity_lock_timeout = timeout;
        }
        prefs
    }

    /// A database wrapper using the configured CLI command line
    pub fn database(&self) -> Result<KeepassxcDatabase> {
        let (program, prefix_args) = self
            .config
            .keepassxc_cli
            .split_first()
            .ok_or_else(|| CliError::user("keepassxc_cli in the config must not be empty"))?;
        Ok(KeepassxcDatabase::with_cli(program.clone(), prefix_args.to_vec()))
    }
}

/// Walk up from `start` looking for `kpx.toml`
fn find_config(start: &Path) -> Option<(PathBuf, PathBuf)> {
    start.ancestors().find_map(|dir| {
        let candidate = dir.join(ExtensionPath::WorkflowConfig.as_str());
        candidate.is_file().then(|| (dir.to_path_buf(), candidate))
    })
}
