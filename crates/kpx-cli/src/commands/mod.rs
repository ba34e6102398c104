//! Command implementations for kpx-cli

pub mod install;
pub mod vault;
pub mod workflow;

pub use install::{run_status, run_symlink, run_unlink};
pub use vault::{run_query, run_search, run_show};
pub use workflow::run_task;
