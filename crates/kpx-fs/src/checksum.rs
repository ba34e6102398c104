//! SHA-256 checksum utilities
//!
//! Provides a single canonical checksum format (`sha256:<hex>`) used to
//! verify that backups and restores reproduce an extension tree exactly.

use crate::io::{EntryKind, entry_kind};
use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute a checksum over an entire tree rooted at `root`.
///
/// Covers every relative path, the kind of each entry, file bytes and
/// stored symlink targets. Entries are visited in sorted order so the
/// result does not depend on directory iteration order. Symlinks are not
/// followed.
pub fn compute_tree_checksum(root: &Path) -> Result<String> {
    let mut hasher = Sha256::new();
    hash_entry(root, "", &mut hasher)?;
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

fn hash_entry(path: &Path, relative: &str, hasher: &mut Sha256) -> Result<()> {
    match entry_kind(path)? {
        EntryKind::Missing => {
            return Err(Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "cannot checksum missing path"),
            ));
        }
        EntryKind::File => {
            let content = fs::read(path).map_err(|e| Error::io(path, e))?;
            hasher.update(b"F\0");
            hasher.update(relative.as_bytes());
            hasher.update(b"\0");
            hasher.update((content.len() as u64).to_le_bytes());
            hasher.update(&content);
        }
        EntryKind::Symlink { target } => {
            hasher.update(b"L\0");
            hasher.update(relative.as_bytes());
            hasher.update(b"\0");
            hasher.update(target.to_string_lossy().replace('\\', "/").as_bytes());
            hasher.update(b"\0");
        }
        EntryKind::Directory => {
            hasher.update(b"D\0");
            hasher.update(relative.as_bytes());
            hasher.update(b"\0");

            let mut names = Vec::new();
            for entry in fs::read_dir(path).map_err(|e| Error::io(path, e))? {
                let entry = entry.map_err(|e| Error::io(path, e))?;
                names.push(entry.file_name());
            }
            names.sort();

            for name in names {
                let name_str = name.to_string_lossy();
                let child_relative = if relative.is_empty() {
                    name_str.to_string()
                } else {
                    format!("{}/{}", relative, name_str)
                };
                hash_entry(&path.join(&name), &child_relative, hasher)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn tree_checksum_is_deterministic() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/b/c.txt"), "c").unwrap();
        fs::write(temp.path().join("top.txt"), "top").unwrap();

        let first = compute_tree_checksum(temp.path()).unwrap();
        let second = compute_tree_checksum(temp.path()).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(PREFIX));
    }

    #[test]
    fn tree_checksum_changes_with_content() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("file.txt"), "one").unwrap();
        let before = compute_tree_checksum(temp.path()).unwrap();

        fs::write(temp.path().join("file.txt"), "two").unwrap();
        let after = compute_tree_checksum(temp.path()).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn tree_checksum_distinguishes_renames() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "same").unwrap();
        let before = compute_tree_checksum(temp.path()).unwrap();

        fs::rename(temp.path().join("a.txt"), temp.path().join("b.txt")).unwrap();
        let after = compute_tree_checksum(temp.path()).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn tree_checksum_of_missing_path_fails() {
        let temp = TempDir::new().unwrap();
        assert!(compute_tree_checksum(&temp.path().join("missing")).is_err());
    }
}
