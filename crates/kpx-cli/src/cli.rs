//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use kpx_vault::Attribute;
use std::path::PathBuf;

/// Keyword the launcher uses for the extension by default
pub const DEFAULT_KEYWORD: &str = "kp";

/// kpx - develop and drive the KeePassXC launcher extension
#[derive(Parser, Debug)]
#[command(name = "kpx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to kpx.toml in the working directory or above)
    #[arg(long, global = true, env = "KPX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the database is and how to use it
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseArgs {
    /// Path to the .kdbx database
    #[arg(long, env = "KPX_DATABASE")]
    pub database: Option<String>,

    /// Maximum number of results to show
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Seconds of inactivity before the database locks again (0 disables)
    #[arg(long)]
    pub lock_timeout: Option<u64>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install the extension's pinned Python dependencies
    Init,

    /// Lint, type check and run the extension's test suite
    Test,

    /// Start the launcher in development mode without extensions
    #[command(name = "run-ul", alias = "run_ul")]
    RunUl,

    /// Run the installed extension against the development launcher
    Run,

    /// Replace the installed extension with a link to the working directory
    ///
    /// The current installation is backed up first and restored by
    /// `kpx unlink`.
    Symlink,

    /// Remove the development link and restore the backed up installation
    Unlink,

    /// Show the development install state
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Search the database for entries whose title contains QUERY
    Search {
        /// Text to look for in entry titles
        query: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        db: DatabaseArgs,
    },

    /// Show the details of one entry
    Show {
        /// Full entry name, as printed by `kpx search`
        entry: String,

        /// Print only this attribute (username, password, url or notes)
        #[arg(long)]
        attr: Option<Attribute>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        db: DatabaseArgs,
    },

    /// Interactive search session, behaving like the launcher would
    Query {
        /// Keyword shown in front of the query
        #[arg(long, default_value = DEFAULT_KEYWORD)]
        keyword: String,

        #[command(flatten)]
        db: DatabaseArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
