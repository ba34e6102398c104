//! [`TestWorkspace`] builder for development-install scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Extension id used by fixtures
pub const TEST_EXTENSION_ID: &str = "com.example.ulauncher-test";

/// A temporary directory laid out like a developer machine:
///
/// - `data/`: the local data home
/// - `work/`: the development checkout
/// - `tmp/`: where backups go
///
/// # Example
///
/// ```rust,no_run
/// use kpx_test_utils::workspace::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.install_release("# released");
/// ws.assert_file_contains(&ws.installed_dir().join("main.py"), "released");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create the directory skeleton with a minimal working checkout.
    pub fn new() -> Self {
        let ws = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(ws.data_home()).unwrap();
        fs::create_dir_all(ws.root().join("tmp")).unwrap();
        write_extension_tree(&ws.working_dir(), "# development checkout");
        ws
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The fake local data home.
    pub fn data_home(&self) -> PathBuf {
        self.root().join("data")
    }

    /// The development checkout.
    pub fn working_dir(&self) -> PathBuf {
        self.root().join("work")
    }

    /// Where backups are kept.
    pub fn backup_dir(&self) -> PathBuf {
        self.root().join("tmp").join(TEST_EXTENSION_ID)
    }

    /// Where the host would load the extension from.
    pub fn installed_dir(&self) -> PathBuf {
        self.data_home()
            .join("ulauncher")
            .join("extensions")
            .join(TEST_EXTENSION_ID)
    }

    /// Simulate a normally installed release of the extension.
    pub fn install_release(&self, marker: &str) {
        write_extension_tree(&self.installed_dir(), marker);
    }

    /// Assert that the file at `path` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &Path, content: &str) {
        let file_content = fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path.display(),
            content,
            file_content
        );
    }
}

/// Write a small extension tree: entry point, package, manifest and an icon.
pub fn write_extension_tree(dir: &Path, marker: &str) {
    fs::create_dir_all(dir.join("keepassxc")).unwrap();
    fs::create_dir_all(dir.join("images")).unwrap();
    fs::write(dir.join("main.py"), format!("{}\n", marker)).unwrap();
    fs::write(dir.join("keepassxc").join("__init__.py"), "").unwrap();
    fs::write(dir.join("manifest.json"), r#"{"required_api_version": "^2.0.0"}"#).unwrap();
    fs::write(dir.join("images").join("key.svg"), "<svg/>").unwrap();
}
