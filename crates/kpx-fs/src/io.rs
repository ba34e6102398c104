//! Filesystem operations: atomic writes with locking, tree copies and
//! symlink handling

use crate::{Error, NormalizedPath, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// What currently occupies a path, without following symlinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Nothing at the path
    Missing,
    /// A real directory
    Directory,
    /// A regular file
    File,
    /// A symbolic link and the target it stores (possibly relative or dangling)
    Symlink { target: PathBuf },
}

/// Inspect a path without following symlinks.
pub fn entry_kind(path: &Path) -> Result<EntryKind> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(EntryKind::Missing),
        Err(e) => return Err(Error::io(path, e)),
    };

    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        let target = fs::read_link(path).map_err(|e| Error::io(path, e))?;
        Ok(EntryKind::Symlink { target })
    } else if file_type.is_dir() {
        Ok(EntryKind::Directory)
    } else {
        Ok(EntryKind::File)
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock to prevent concurrent access.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file in the same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;
    tracing::debug!(path = %path, bytes = content.len(), "Wrote file");

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Recursively copy `src` to `dst`.
///
/// Symlinks inside the tree are recreated as symlinks with the same stored
/// target rather than followed. `dst` must not exist inside `src`.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    if dst.starts_with(src) {
        return Err(Error::CopyIntoSelf {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }
    tracing::debug!(src = %src.display(), dst = %dst.display(), "Copying tree");
    copy_entry(src, dst)
}

fn copy_entry(src: &Path, dst: &Path) -> Result<()> {
    match entry_kind(src)? {
        EntryKind::Missing => Err(Error::io(
            src,
            std::io::Error::new(std::io::ErrorKind::NotFound, "source path does not exist"),
        )),
        EntryKind::Directory => {
            fs::create_dir_all(dst).map_err(|e| Error::io(dst, e))?;
            for entry in fs::read_dir(src).map_err(|e| Error::io(src, e))? {
                let entry = entry.map_err(|e| Error::io(src, e))?;
                copy_entry(&entry.path(), &dst.join(entry.file_name()))?;
            }
            Ok(())
        }
        EntryKind::Symlink { target } => {
            let resolved = src.parent().map(|p| p.join(&target)).unwrap_or(target.clone());
            symlink(&target, dst, resolved.is_dir())
        }
        EntryKind::File => {
            fs::copy(src, dst).map_err(|e| Error::io(dst, e))?;
            Ok(())
        }
    }
}

/// Remove whatever occupies `path`: a symlink (never its target), a file,
/// or a whole directory tree. A missing path is not an error.
pub fn remove_path(path: &Path) -> Result<()> {
    let kind = entry_kind(path)?;
    if kind != EntryKind::Missing {
        tracing::debug!(path = %path.display(), ?kind, "Removing");
    }
    match kind {
        EntryKind::Missing => Ok(()),
        EntryKind::Directory => fs::remove_dir_all(path).map_err(|e| Error::io(path, e)),
        EntryKind::File => fs::remove_file(path).map_err(|e| Error::io(path, e)),
        EntryKind::Symlink { .. } => remove_symlink(path),
    }
}

#[cfg(unix)]
fn remove_symlink(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

#[cfg(windows)]
fn remove_symlink(path: &Path) -> Result<()> {
    // Directory symlinks on Windows are removed like directories
    fs::remove_dir(path)
        .or_else(|_| fs::remove_file(path))
        .map_err(|e| Error::io(path, e))
}

/// Create a symbolic link at `link` pointing to the directory `target`.
pub fn symlink_dir(target: &Path, link: &Path) -> Result<()> {
    symlink(target, link, true)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path, _is_dir: bool) -> Result<()> {
    std::os::unix::fs::symlink(target, link).map_err(|e| Error::io(link, e))
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path, is_dir: bool) -> Result<()> {
    let result = if is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    };
    result.map_err(|e| Error::io(link, e))
}

/// Whether `link` resolves to the same location as `target`.
///
/// Both sides are canonicalized, so relative link targets and intermediate
/// symlinks are taken into account. Unresolvable paths never match.
pub fn resolves_to(link: &Path, target: &Path) -> bool {
    match (dunce::canonicalize(link), dunce::canonicalize(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Whether `a` and `b` are the same location or one lies inside the other,
/// after resolving symlinks. Unresolvable paths never overlap.
pub fn paths_overlap(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a.starts_with(&b) || b.starts_with(&a),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn entry_kind_missing() {
        let temp = TempDir::new().unwrap();
        let kind = entry_kind(&temp.path().join("nope")).unwrap();
        assert_eq!(kind, EntryKind::Missing);
    }

    #[test]
    fn copy_tree_rejects_destination_inside_source() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();

        let result = copy_tree(&src, &src.join("nested"));
        assert!(matches!(result, Err(Error::CopyIntoSelf { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn remove_path_leaves_symlink_target_intact() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("keep.txt"), "keep").unwrap();
        let link = temp.path().join("link");
        symlink_dir(&target, &link).unwrap();

        remove_path(&link).unwrap();

        assert!(!link.exists());
        assert!(target.join("keep.txt").exists());
    }

    #[test]
    fn paths_overlap_same_nested_and_disjoint() {
        let temp = TempDir::new().unwrap();
        let outer = temp.path().join("outer");
        let inner = outer.join("inner");
        let other = temp.path().join("other");
        fs::create_dir_all(&inner).unwrap();
        fs::create_dir_all(&other).unwrap();

        assert!(paths_overlap(&outer, &outer));
        assert!(paths_overlap(&outer, &inner));
        assert!(paths_overlap(&inner, &outer));
        assert!(!paths_overlap(&inner, &other));
        assert!(!paths_overlap(&outer, &temp.path().join("missing")));
    }

    #[cfg(unix)]
    #[test]
    fn paths_overlap_sees_through_symlinks() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real");
        fs::create_dir_all(&real).unwrap();
        let alias = temp.path().join("alias");
        symlink_dir(&real, &alias).unwrap();

        assert!(paths_overlap(&alias, &real));
    }
}
