//! Sequential, fail-fast execution of task plans

use crate::task::{Step, TaskPlan};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs task plans as child processes with inherited stdio
#[derive(Debug, Clone)]
pub struct TaskRunner {
    working_dir: PathBuf,
}

impl TaskRunner {
    /// Create a runner whose steps default to `working_dir`
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run every step in order, stopping at the first failure
    pub fn run(&self, plan: &TaskPlan) -> Result<()> {
        tracing::info!(task = %plan.task, steps = plan.steps.len(), "Starting task");
        for step in &plan.steps {
            self.run_step(step)?;
        }
        tracing::info!(task = %plan.task, "Task finished");
        Ok(())
    }

    /// Run a single step, waiting for it to exit
    pub fn run_step(&self, step: &Step) -> Result<()> {
        let cwd = step.cwd.as_deref().unwrap_or(&self.working_dir);

        let mut cmd = Command::new(&step.program);
        cmd.args(&step.args).current_dir(cwd);
        for (key, value) in &step.env {
            cmd.env(key, value);
        }

        tracing::info!(command = %step, cwd = %cwd.display(), "Running");

        let status = cmd.status().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::CommandNotFound {
                    command: step.program.clone(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        if status.success() {
            return Ok(());
        }

        match status.code() {
            Some(code) => Err(Error::CommandFailed {
                command: step.to_string(),
                code,
            }),
            None => Err(Error::CommandTerminated {
                command: step.to_string(),
            }),
        }
    }
}
