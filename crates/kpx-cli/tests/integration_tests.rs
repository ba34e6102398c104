//! Integration tests for the kpx binary.
//!
//! These tests exercise the actual compiled binary using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the kpx binary with a clean environment
fn kpx_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kpx"));
    cmd.env("NO_COLOR", "1")
        .env_remove("KPX_CONFIG")
        .env_remove("KPX_DATABASE")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_output() {
    kpx_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("KeePassXC"))
        .stdout(predicate::str::contains("symlink"))
        .stdout(predicate::str::contains("run-ul"));
}

#[test]
fn test_version_output() {
    kpx_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kpx"));
}

#[test]
fn test_no_command_prints_hint() {
    kpx_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("kpx --help"));
}

#[test]
fn test_unknown_command_fails() {
    kpx_cmd().arg("deploy").assert().failure();
}

#[test]
fn test_completions_bash() {
    kpx_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kpx"));
}

#[test]
fn test_missing_working_dir_fails() {
    kpx_cmd()
        .args(["-C", "/nonexistent/kpx-work", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("does not exist"));
}

#[cfg(unix)]
mod unix {
    use super::kpx_cmd;
    use kpx_fs::checksum::compute_tree_checksum;
    use kpx_test_utils::keepassxc::FakeKeepassxc;
    use kpx_test_utils::workspace::{TEST_EXTENSION_ID, TestWorkspace};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;

    /// Write a kpx.toml into the working directory pointing every location
    /// into the temporary workspace
    fn write_config(ws: &TestWorkspace, extra: &str) {
        let config = format!(
            "[workflow]\nextension_id = {:?}\ndata_home = {:?}\nbackup_dir = {:?}\n{}\n",
            TEST_EXTENSION_ID,
            ws.data_home(),
            ws.backup_dir(),
            extra
        );
        fs::write(ws.working_dir().join("kpx.toml"), config).unwrap();
    }

    fn write_vault_config(ws: &TestWorkspace, fake: &FakeKeepassxc) {
        let (program, args) = fake.command();
        let config = format!(
            "keepassxc_cli = [{:?}, {:?}]\n\n[extension]\ndatabase-path = {:?}\n",
            program,
            args[0],
            fake.database
        );
        fs::write(ws.working_dir().join("kpx.toml"), config).unwrap();
    }

    fn kpx_in(dir: &Path) -> assert_cmd::Command {
        let mut cmd = kpx_cmd();
        cmd.arg("-C").arg(dir);
        cmd
    }

    #[test]
    fn test_symlink_then_unlink_round_trip() {
        let ws = TestWorkspace::new();
        ws.install_release("# release 1.0");
        write_config(&ws, "");
        let before = compute_tree_checksum(&ws.installed_dir()).unwrap();

        kpx_in(&ws.working_dir())
            .arg("symlink")
            .assert()
            .success()
            .stdout(predicate::str::contains("Linked"));
        assert!(ws.installed_dir().is_symlink());

        kpx_in(&ws.working_dir())
            .arg("symlink")
            .assert()
            .success()
            .stdout(predicate::str::contains("already links"));

        kpx_in(&ws.working_dir())
            .args(["status", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""state": "linked""#))
            .stdout(predicate::str::contains(r#""backup_pending": true"#));

        kpx_in(&ws.working_dir())
            .arg("unlink")
            .assert()
            .success()
            .stdout(predicate::str::contains("Restored"));

        assert!(!ws.installed_dir().is_symlink());
        assert_eq!(compute_tree_checksum(&ws.installed_dir()).unwrap(), before);
    }

    #[test]
    fn test_unlink_without_backup_refuses() {
        let ws = TestWorkspace::new();
        ws.install_release("# release 1.0");
        write_config(&ws, "");

        kpx_in(&ws.working_dir())
            .arg("unlink")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("No backup found"));
        ws.assert_file_contains(&ws.installed_dir().join("main.py"), "release 1.0");
    }

    #[test]
    fn test_config_found_from_subdirectory() {
        let ws = TestWorkspace::new();
        write_config(&ws, "");

        let mut cmd = kpx_cmd();
        cmd.current_dir(ws.working_dir().join("keepassxc"))
            .args(["status", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""state": "missing""#))
            .stdout(predicate::str::contains(TEST_EXTENSION_ID));
    }

    #[test]
    fn test_quality_gate_passes() {
        let ws = TestWorkspace::new();
        write_config(&ws, "python = \"true\"");

        kpx_in(&ws.working_dir())
            .arg("test")
            .assert()
            .success()
            .stdout(predicate::str::contains("pylint"))
            .stdout(predicate::str::contains("pytest"));
    }

    #[test]
    fn test_quality_gate_failure_exits_non_zero() {
        let ws = TestWorkspace::new();
        write_config(&ws, "python = \"false\"");

        kpx_in(&ws.working_dir())
            .arg("test")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Command failed"));
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let ws = TestWorkspace::new();
        write_config(&ws, "python = \"kpx-no-such-python\"");

        kpx_in(&ws.working_dir())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Command not found: kpx-no-such-python"));
    }

    #[test]
    fn test_search_with_piped_passphrase() {
        let ws = TestWorkspace::new();
        let fake = FakeKeepassxc::standard(&ws.root().join("vault"));
        write_vault_config(&ws, &fake);

        kpx_in(&ws.working_dir())
            .args(["search", "onlinesite"])
            .write_stdin("right passphrase\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("onlinesite personal"))
            .stdout(predicate::str::contains("onlinesite work"))
            .stdout(predicate::str::contains("bank").not());
    }

    #[test]
    fn test_search_json_truncates() {
        let ws = TestWorkspace::new();
        let fake = FakeKeepassxc::standard(&ws.root().join("vault"));
        write_vault_config(&ws, &fake);

        kpx_in(&ws.working_dir())
            .args(["search", "onlinesite", "--json", "--max-results", "1"])
            .write_stdin("right passphrase\n")
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""type": "render""#))
            .stdout(predicate::str::contains("1 more results available"));
    }

    #[test]
    fn test_search_wrong_passphrase_fails() {
        let ws = TestWorkspace::new();
        let fake = FakeKeepassxc::standard(&ws.root().join("vault"));
        write_vault_config(&ws, &fake);

        kpx_in(&ws.working_dir())
            .args(["search", "onlinesite"])
            .write_stdin("wrong passphrase\n")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Database is locked"));
    }

    #[test]
    fn test_show_single_attribute() {
        let ws = TestWorkspace::new();
        let fake = FakeKeepassxc::standard(&ws.root().join("vault"));
        write_vault_config(&ws, &fake);

        kpx_in(&ws.working_dir())
            .args(["show", "onlinesite personal", "--attr", "password"])
            .write_stdin("right passphrase\n")
            .assert()
            .success()
            .stdout("password\n");
    }

    #[test]
    fn test_show_json() {
        let ws = TestWorkspace::new();
        let fake = FakeKeepassxc::standard(&ws.root().join("vault"));
        write_vault_config(&ws, &fake);

        kpx_in(&ws.working_dir())
            .args(["show", "onlinesite personal", "--json"])
            .write_stdin("right passphrase\n")
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""notes": "line1\nline2""#));
    }

    #[test]
    fn test_database_option_overrides_config() {
        let ws = TestWorkspace::new();
        let fake = FakeKeepassxc::standard(&ws.root().join("vault"));
        write_vault_config(&ws, &fake);

        kpx_in(&ws.working_dir())
            .args(["search", "bank", "--database", "/nonexistent/db.kdbx"])
            .write_stdin("right passphrase\n")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Database file not found"));
    }
}
