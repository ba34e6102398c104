//! Config file loading, TOML or JSON by file extension

use crate::{Error, NormalizedPath, Result, io};
use serde::de::DeserializeOwned;

/// Reads `kpx.toml` (or a JSON equivalent) into any deserializable type.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    /// Create a new ConfigStore.
    pub fn new() -> Self {
        Self
    }

    /// Load `path`, choosing the parser from its extension. Parse errors
    /// carry the path and format.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let content = io::read_text(path)?;
        let extension = path.extension().unwrap_or("");

        match extension.to_lowercase().as_str() {
            "toml" => toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "TOML".into(),
                message: e.to_string(),
            }),
            "json" => serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "JSON".into(),
                message: e.to_string(),
            }),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }
}
