//! Task execution: fail-fast ordering and exit status propagation.

#![cfg(unix)]

use kpx_devtools::{DevConfig, Error, ExtensionLayout, Step, Task, TaskPlan, TaskRunner};
use kpx_test_utils::workspace::{TEST_EXTENSION_ID, TestWorkspace};
use rstest::rstest;
use std::fs;

fn layout(ws: &TestWorkspace) -> ExtensionLayout {
    ExtensionLayout::new(
        TEST_EXTENSION_ID,
        &ws.working_dir(),
        &ws.data_home(),
        &ws.backup_dir(),
    )
    .unwrap()
}

#[test]
fn test_quality_gate_succeeds_when_every_step_succeeds() {
    let ws = TestWorkspace::new();
    let config = DevConfig {
        python: "true".to_string(),
        ..DevConfig::default()
    };
    let plan = Task::Test.plan(&config, &layout(&ws));

    TaskRunner::new(ws.working_dir()).run(&plan).unwrap();
}

#[test]
fn test_quality_gate_fails_on_first_failing_step() {
    let ws = TestWorkspace::new();
    let config = DevConfig {
        python: "false".to_string(),
        ..DevConfig::default()
    };
    let plan = Task::Test.plan(&config, &layout(&ws));

    let err = TaskRunner::new(ws.working_dir()).run(&plan).unwrap_err();
    match err {
        Error::CommandFailed { command, code } => {
            assert_eq!(code, 1);
            assert!(command.contains("pylint"), "first step should fail: {}", command);
        }
        other => panic!("expected CommandFailed, got {:?}", other),
    }
}

#[test]
fn test_later_steps_do_not_run_after_failure() {
    let ws = TestWorkspace::new();
    let marker = ws.root().join("ran");
    let plan = TaskPlan {
        task: Task::Test,
        steps: vec![
            Step::new("false"),
            Step::new("touch").arg(marker.to_string_lossy()),
        ],
    };

    assert!(TaskRunner::new(ws.working_dir()).run(&plan).is_err());
    assert!(!marker.exists());
}

#[rstest]
#[case(0, true)]
#[case(3, false)]
#[case(42, false)]
fn test_exit_code_propagates(#[case] code: i32, #[case] ok: bool) {
    let ws = TestWorkspace::new();
    let step = Step::new("sh").args(["-c".to_string(), format!("exit {}", code)]);

    let result = TaskRunner::new(ws.working_dir()).run_step(&step);
    assert_eq!(result.is_ok(), ok);
    if let Err(Error::CommandFailed { code: actual, .. }) = result {
        assert_eq!(actual, code);
    }
}

#[test]
fn test_missing_program_is_reported() {
    let ws = TestWorkspace::new();
    let step = Step::new("kpx-definitely-not-installed");

    let result = TaskRunner::new(ws.working_dir()).run_step(&step);
    assert!(matches!(result, Err(Error::CommandNotFound { .. })));
}

#[test]
fn test_step_environment_and_cwd_reach_the_child() {
    let ws = TestWorkspace::new();
    let out = ws.root().join("env.txt");
    let step = Step::new("sh")
        .args([
            "-c".to_string(),
            format!("printf '%s|%s' \"$VERBOSE\" \"$(pwd)\" > '{}'", out.display()),
        ])
        .env("VERBOSE", "1")
        .current_dir(ws.data_home());

    TaskRunner::new(ws.working_dir()).run_step(&step).unwrap();

    let written = fs::read_to_string(&out).unwrap();
    let (verbose, cwd) = written.split_once('|').unwrap();
    assert_eq!(verbose, "1");
    assert_eq!(
        fs::canonicalize(cwd).unwrap(),
        fs::canonicalize(ws.data_home()).unwrap()
    );
}

#[test]
fn test_steps_default_to_runner_working_dir() {
    let ws = TestWorkspace::new();
    let step = Step::new("test").args(["-f", "main.py"]);

    TaskRunner::new(ws.working_dir()).run_step(&step).unwrap();
}
