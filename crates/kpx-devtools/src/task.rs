//! Workflow task plans
//!
//! Each task is a fixed sequence of subprocess invocations. Building the
//! plan is pure; running it is the job of [`TaskRunner`](crate::TaskRunner).

use crate::config::DevConfig;
use crate::layout::ExtensionLayout;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;

/// The developer-facing workflow tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Install pinned dependencies
    Init,
    /// Lint, type check and run the test suite
    Test,
    /// Start the host launcher in development mode
    RunHost,
    /// Start the extension entry point against the development host
    Run,
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Test => "test",
            Self::RunHost => "run-ul",
            Self::Run => "run",
        }
    }

    /// Build the steps for this task
    pub fn plan(&self, config: &DevConfig, layout: &ExtensionLayout) -> TaskPlan {
        let steps = match self {
            Self::Init => vec![init_step(config)],
            Self::Test => test_steps(config),
            Self::RunHost => vec![Step::new(&config.host_command).args(["--no-extensions", "--dev", "-v"])],
            Self::Run => vec![run_step(config, layout, std::env::var_os("PYTHONPATH").as_deref())],
        };
        TaskPlan { task: *self, steps }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single subprocess invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, OsString)>,
    /// Working directory; the runner's directory when `None`
    pub cwd: Option<PathBuf>,
}

impl Step {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Look up an environment override by name
    pub fn env_value(&self, key: &str) -> Option<&OsStr> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, value.to_string_lossy())?;
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// The ordered steps of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPlan {
    pub task: Task,
    pub steps: Vec<Step>,
}

fn python_module(config: &DevConfig, module: &str) -> Step {
    Step::new(&config.python).args(["-m", module])
}

fn init_step(config: &DevConfig) -> Step {
    python_module(config, "pip").args(["install", "-r", config.requirements.as_str()])
}

fn test_steps(config: &DevConfig) -> Vec<Step> {
    let targets = [config.package.as_str(), config.entry_point.as_str()];

    let mut steps = vec![python_module(config, "pylint").args(targets)];
    if config.type_check {
        steps.push(python_module(config, "mypy").args(targets));
    }
    steps.push(
        python_module(config, "pytest")
            .args(["--doctest-modules", "--pycodestyle"])
            .args(targets)
            .arg(&config.tests_dir),
    );
    steps
}

fn run_step(config: &DevConfig, layout: &ExtensionLayout, existing_pythonpath: Option<&OsStr>) -> Step {
    let installed = layout.installed_dir.to_native();
    let entry = installed.join(&config.entry_point);

    Step::new(&config.python)
        .arg(entry.to_string_lossy())
        .current_dir(installed)
        .env("VERBOSE", "1")
        .env("ULAUNCHER_WS_API", config.ws_api_url(&layout.extension_id))
        .env(
            "PYTHONPATH",
            extend_python_path(existing_pythonpath, &config.extra_python_path),
        )
}

/// Append `extra` to an existing search path, skipping empty parts
pub fn extend_python_path(existing: Option<&OsStr>, extra: &str) -> OsString {
    let mut paths: Vec<PathBuf> = existing
        .map(|value| std::env::split_paths(value).filter(|p| !p.as_os_str().is_empty()).collect())
        .unwrap_or_default();
    if !extra.is_empty() {
        paths.push(PathBuf::from(extra));
    }
    std::env::join_paths(paths).unwrap_or_else(|_| OsString::from(extra))
}
