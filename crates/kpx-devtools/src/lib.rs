//! Development workflow for the KeePassXC launcher extension
//!
//! Four independent operations, each a flat sequence of filesystem or
//! subprocess steps:
//!
//! - [`Task::Init`]: install pinned dependencies
//! - [`Task::Test`]: lint, optionally type check, run tests
//! - [`Task::RunHost`] / [`Task::Run`]: run the host or the extension locally
//! - [`InstallManager`]: back up the installed extension and replace it with
//!   a symlink to the working directory, then restore it again

pub mod backup;
pub mod config;
pub mod error;
pub mod install;
pub mod layout;
pub mod runner;
pub mod task;

pub use backup::{Backup, BackupKind, BackupManager, BackupMetadata};
pub use config::{DEFAULT_EXTENSION_ID, DevConfig};
pub use error::{Error, Result};
pub use install::{InstallManager, InstallState, InstallStatus, LinkOutcome, UnlinkOutcome};
pub use layout::{ExtensionLayout, validate_extension_id};
pub use runner::TaskRunner;
pub use task::{Step, Task, TaskPlan};
