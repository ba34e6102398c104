//! On-disk layout of extension backups.

use assert_fs::TempDir;
use assert_fs::prelude::*;
use kpx_devtools::{BackupKind, BackupManager};
use kpx_fs::NormalizedPath;
use predicates::prelude::*;

fn installed_tree(temp: &TempDir) -> NormalizedPath {
    let installed = temp.child("installed");
    installed.child("main.py").write_str("# release\n").unwrap();
    installed
        .child("keepassxc/__init__.py")
        .write_str("")
        .unwrap();
    NormalizedPath::new(installed.path())
}

#[test]
fn test_backup_layout() {
    let temp = TempDir::new().unwrap();
    let source = installed_tree(&temp);
    let manager = BackupManager::new("com.example.ext", NormalizedPath::new(temp.child("backup").path()));

    let backup = manager.create_backup(&source).unwrap();

    temp.child("backup/backup.toml")
        .assert(predicate::str::contains("extension_id = \"com.example.ext\""))
        .assert(predicate::str::contains("type = \"tree\""))
        .assert(predicate::str::contains("sha256:"));
    temp.child("backup/content/main.py")
        .assert(predicate::str::diff("# release\n"));
    temp.child("backup/content/keepassxc/__init__.py")
        .assert(predicate::path::exists());
    assert!(matches!(backup.metadata.kind, BackupKind::Tree { .. }));
}

#[test]
fn test_restore_into_vacant_path() {
    let temp = TempDir::new().unwrap();
    let source = installed_tree(&temp);
    let manager = BackupManager::new("com.example.ext", NormalizedPath::new(temp.child("backup").path()));
    manager.create_backup(&source).unwrap();
    let dest = NormalizedPath::new(temp.child("restored/ext").path());

    manager.restore_backup(&dest).unwrap();

    temp.child("restored/ext/main.py")
        .assert(predicate::str::contains("release"));
    // The backup stays until deleted explicitly
    assert!(manager.has_backup());
    manager.delete_backup().unwrap();
    temp.child("backup").assert(predicate::path::missing());
}
