//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Dot segments are resolved on construction and on [`join`](Self::join), so
/// two spellings of the same location compare equal. Conversion back to a
/// platform-native [`PathBuf`] happens only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment, resolving `.` and `..`.
    pub fn join(&self, segment: &str) -> Self {
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) if trimmed.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Check if this path exists on the filesystem (following symlinks).
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory (following symlinks).
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file (following symlinks).
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Check if the path itself is a symbolic link, dangling or not.
    pub fn is_symlink(&self) -> bool {
        std::fs::symlink_metadata(self.to_native())
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    /// Check if anything, including a dangling symlink, occupies this path.
    pub fn is_occupied(&self) -> bool {
        std::fs::symlink_metadata(self.to_native()).is_ok()
    }
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and `~user` forms, are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Normalize separators and resolve dot segments.
///
/// `..` never climbs above the root of an absolute path. Leading `..`
/// segments of a relative path are kept.
fn clean(raw: &str) -> String {
    let unified = raw.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for part in unified.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&"..") | None if !absolute => parts.push(".."),
                Some(_) => {
                    parts.pop();
                }
                None => {}
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
