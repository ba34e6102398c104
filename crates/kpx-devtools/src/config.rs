//! Workflow configuration
//!
//! Loaded from the `[workflow]` table of `kpx.toml`. Every field has a
//! default matching the extension's conventional layout, so the file is
//! optional.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identifier under which the host installs this extension
pub const DEFAULT_EXTENSION_ID: &str = "com.github.pbkhrv.ulauncher-keepassxc";

/// Port of the host's local extension WebSocket server in development mode
pub const DEFAULT_WS_PORT: u16 = 5054;

/// Settings for the development workflow tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevConfig {
    /// Reverse-domain identifier of the extension
    pub extension_id: String,
    /// Python interpreter used for every task
    pub python: String,
    /// Pinned requirements file, relative to the working directory
    pub requirements: String,
    /// Extension package directory
    pub package: String,
    /// Extension entry point script
    pub entry_point: String,
    /// Test directory passed to the test runner
    pub tests_dir: String,
    /// Whether the quality gate runs the type checker
    pub type_check: bool,
    /// Host launcher executable
    pub host_command: String,
    /// Port of the host's extension WebSocket API
    pub ws_port: u16,
    /// Appended to PYTHONPATH when running the extension directly
    pub extra_python_path: String,
    /// Overrides the local data home used to locate installed extensions
    pub data_home: Option<PathBuf>,
    /// Overrides the backup location (defaults to `<temp>/<extension_id>`)
    pub backup_dir: Option<PathBuf>,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            extension_id: DEFAULT_EXTENSION_ID.to_string(),
            python: "python3".to_string(),
            requirements: "requirements.txt".to_string(),
            package: "keepassxc".to_string(),
            entry_point: "main.py".to_string(),
            tests_dir: "tests".to_string(),
            type_check: true,
            host_command: "ulauncher".to_string(),
            ws_port: DEFAULT_WS_PORT,
            extra_python_path: "/usr/lib/python3/dist-packages".to_string(),
            data_home: None,
            backup_dir: None,
        }
    }
}

impl DevConfig {
    /// WebSocket URL the extension `extension_id` uses to reach the host in
    /// development mode
    pub fn ws_api_url(&self, extension_id: &str) -> String {
        format!("ws://127.0.0.1:{}/{}", self.ws_port, extension_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_api_url_uses_port_and_id() {
        let config = DevConfig {
            ws_port: 6000,
            ..DevConfig::default()
        };
        assert_eq!(
            config.ws_api_url("com.example.ext"),
            "ws://127.0.0.1:6000/com.example.ext"
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: DevConfig = toml::from_str("python = \"/usr/bin/python3\"\ntype_check = false\n").unwrap();
        assert_eq!(config.python, "/usr/bin/python3");
        assert!(!config.type_check);
        assert_eq!(config.extension_id, DEFAULT_EXTENSION_ID);
        assert_eq!(config.ws_port, DEFAULT_WS_PORT);
    }
}
