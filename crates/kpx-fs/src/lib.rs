//! Filesystem helpers for the KeePassXC extension workspace
//!
//! Provides normalized paths, atomic writes, tree copies and checksums,
//! symlink handling and format-agnostic config loading.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::ExtensionPath;
pub use error::{Error, Result};
pub use io::EntryKind;
pub use path::{NormalizedPath, expand_home};
