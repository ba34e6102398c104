//! Wrapper around `keepassxc-cli`
//!
//! Keeps track of the passphrase and the inactivity lock. Every CLI
//! invocation gets the passphrase on stdin; nothing is cached besides the
//! passphrase itself.

use crate::entry::{Attribute, EntryDetails};
use crate::{Error, Result};
use kpx_fs::expand_home;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Program name used when none is configured
pub const DEFAULT_CLI: &str = "keepassxc-cli";

/// Printed by the CLI when a search matches nothing
const NO_RESULTS_MARKER: &str = "No results for that";

/// Captured output of one CLI run
#[derive(Debug, Clone, Default)]
struct CliOutput {
    stdout: String,
    stderr: String,
}

/// A KeePassXC database accessed through the CLI
#[derive(Clone)]
pub struct KeepassxcDatabase {
    program: String,
    prefix_args: Vec<String>,
    cli_checked: bool,
    path: Option<PathBuf>,
    path_checked: bool,
    passphrase: Option<String>,
    passphrase_expires_at: Option<Instant>,
    inactivity_lock_timeout: u64,
}

impl fmt::Debug for KeepassxcDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeepassxcDatabase")
            .field("program", &self.program)
            .field("path", &self.path)
            .field("unlocked", &self.passphrase.is_some())
            .field("inactivity_lock_timeout", &self.inactivity_lock_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for KeepassxcDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl KeepassxcDatabase {
    /// Use `keepassxc-cli` from `PATH`
    pub fn new() -> Self {
        Self::with_cli(DEFAULT_CLI, Vec::new())
    }

    /// Use a different program, invoked with `prefix_args` before the
    /// CLI subcommand
    pub fn with_cli(program: impl Into<String>, prefix_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args,
            cli_checked: false,
            path: None,
            path_checked: false,
            passphrase: None,
            passphrase_expires_at: None,
            inactivity_lock_timeout: 0,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn inactivity_lock_timeout(&self) -> u64 {
        self.inactivity_lock_timeout
    }

    /// Check that the CLI runs and the database file exists.
    ///
    /// Cheap to call before every query: each check succeeds only once.
    /// Switching to a different path locks the database.
    pub fn initialize(&mut self, path: &Path, inactivity_lock_timeout: u64) -> Result<()> {
        self.inactivity_lock_timeout = inactivity_lock_timeout;

        if !self.cli_checked {
            if !self.can_execute_cli() {
                return Err(Error::CliNotFound);
            }
            self.cli_checked = true;
        }

        if self.path.as_deref() != Some(path) {
            tracing::debug!(path = %path.display(), "Database path changed, locking");
            self.path = Some(path.to_path_buf());
            self.path_checked = false;
            self.lock();
        }

        if !self.path_checked {
            if !path.exists() {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            self.path_checked = true;
        }

        Ok(())
    }

    /// Point at a different database file (expanding `~`) and lock
    pub fn change_path(&mut self, new_path: &str) {
        self.path = Some(expand_home(new_path));
        self.path_checked = false;
        self.lock();
    }

    /// Change the inactivity timeout, in seconds, and lock immediately
    pub fn change_inactivity_lock_timeout(&mut self, secs: u64) {
        self.inactivity_lock_timeout = secs;
        self.lock();
    }

    /// Forget the passphrase
    pub fn lock(&mut self) {
        self.passphrase = None;
        self.passphrase_expires_at = None;
    }

    /// Whether the database has to be unlocked before use.
    ///
    /// An expired inactivity timeout locks the database as a side effect.
    pub fn is_passphrase_needed(&mut self) -> bool {
        if self.passphrase.is_none() {
            return true;
        }
        if self.inactivity_lock_timeout > 0 {
            let expired = self
                .passphrase_expires_at
                .is_none_or(|expires_at| Instant::now() > expires_at);
            if expired {
                tracing::info!("Inactivity timeout expired, locking database");
                self.lock();
                return true;
            }
        }
        false
    }

    /// Try the passphrase with `ls`; keep it only if the CLI accepts it
    pub fn verify_and_set_passphrase(&mut self, passphrase: &str) -> Result<bool> {
        let path = self.require_path()?;
        self.passphrase = Some(passphrase.to_string());

        let output = self.run_cli(&["ls", "-q", path.as_str()])?;
        if !output.stderr.is_empty() {
            tracing::debug!(stderr = %output.stderr.trim_end(), "Passphrase rejected");
            self.lock();
            return Ok(false);
        }
        tracing::info!("Database unlocked");
        Ok(true)
    }

    /// Entry names whose title contains `query`, without the leading `/`.
    ///
    /// Uses `locate` and falls back to `search` on CLI versions that do
    /// not have it.
    pub fn search(&mut self, query: &str) -> Result<Vec<String>> {
        if self.is_passphrase_needed() {
            return Err(Error::LockedDatabase);
        }
        let path = self.require_path()?;

        let mut output = self.run_cli(&["locate", "-q", path.as_str(), query])?;
        if !output.stderr.is_empty() {
            tracing::debug!(stderr = %output.stderr.trim_end(), "locate failed, trying search");
            output = self.run_cli(&["search", "-q", path.as_str(), query])?;
        }
        if !output.stderr.is_empty() {
            if output.stderr.contains(NO_RESULTS_MARKER) {
                return Ok(Vec::new());
            }
            return Err(Error::Cli {
                message: output.stderr.trim_end().to_string(),
            });
        }

        Ok(output
            .stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| line.strip_prefix('/').unwrap_or(line).to_string())
            .collect())
    }

    /// Fetch username, password, URL and notes of `entry` (given without
    /// the leading `/`)
    pub fn get_entry_details(&mut self, entry: &str) -> Result<EntryDetails> {
        if self.is_passphrase_needed() {
            return Err(Error::LockedDatabase);
        }
        let path = self.require_path()?;
        let entry_path = format!("/{}", entry);

        let mut details = EntryDetails::default();
        for attr in Attribute::ALL {
            let args = [
                "show",
                "-q",
                "-a",
                attr.cli_name(),
                path.as_str(),
                entry_path.as_str(),
            ];
            let output = self.run_cli(&args)?;
            if !output.stderr.is_empty() {
                return Err(Error::Cli {
                    message: output.stderr.trim_end().to_string(),
                });
            }
            details.set(attr, output.stdout.trim_end_matches('\n').to_string());
        }
        Ok(details)
    }

    /// Whether the CLI can be started at all; its exit status is ignored
    pub fn can_execute_cli(&self) -> bool {
        let result = Command::new(&self.program)
            .args(&self.prefix_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(e) = &result {
            tracing::warn!(program = %self.program, error = %e, "Cannot execute keepassxc-cli");
        }
        result.is_ok()
    }

    fn require_path(&self) -> Result<String> {
        self.path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .ok_or(Error::NoDatabase)
    }

    /// Run the CLI with the passphrase on stdin.
    ///
    /// A non-zero exit without any stderr output is reported as stderr so
    /// callers only have to look at one place.
    fn run_cli(&mut self, args: &[&str]) -> Result<CliOutput> {
        tracing::debug!(
            program = %self.program,
            subcommand = args.first().copied().unwrap_or_default(),
            "Running keepassxc-cli"
        );

        let mut child = Command::new(&self.program)
            .args(&self.prefix_args)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                tracing::warn!(program = %self.program, error = %e, "Cannot execute keepassxc-cli");
                Error::CliNotFound
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let passphrase = self.passphrase.as_deref().unwrap_or_default();
            match stdin.write_all(passphrase.as_bytes()) {
                Ok(()) => {}
                // The CLI may exit before reading, e.g. on a missing file
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(Error::Io(e)),
            }
        }
        let output = child.wait_with_output()?;

        if self.inactivity_lock_timeout > 0 {
            self.passphrase_expires_at =
                Some(Instant::now() + Duration::from_secs(self.inactivity_lock_timeout));
        }

        let mut stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() && stderr.is_empty() {
            stderr = format!("{} exited with {}", self.program, output.status);
        }
        Ok(CliOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr,
        })
    }
}
