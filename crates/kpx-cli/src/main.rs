//! kpx CLI
//!
//! Development workflow for the KeePassXC launcher extension, plus a
//! terminal front end for its search core.

mod cli;
mod commands;
mod context;
mod error;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use kpx_devtools::Task;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over the `-v` default
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        println!("{} KeePassXC extension workflow", "kpx".green().bold());
        println!();
        println!("Run {} for available commands.", "kpx --help".cyan());
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        clap_complete::generate(shell, &mut Cli::command(), "kpx", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = Context::load(cli.dir.as_deref(), cli.config.as_deref())?;
    tracing::debug!(
        working_dir = %ctx.working_dir.display(),
        config = ?ctx.config_path,
        "Resolved context"
    );
    execute_command(&ctx, command)
}

fn execute_command(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Init => commands::run_task(ctx, Task::Init),
        Commands::Test => commands::run_task(ctx, Task::Test),
        Commands::RunUl => commands::run_task(ctx, Task::RunHost),
        Commands::Run => commands::run_task(ctx, Task::Run),
        Commands::Symlink => commands::run_symlink(ctx),
        Commands::Unlink => commands::run_unlink(ctx),
        Commands::Status { json } => commands::run_status(ctx, json),
        Commands::Search { query, json, db } => commands::run_search(ctx, &query, json, &db),
        Commands::Show {
            entry,
            attr,
            json,
            db,
        } => commands::run_show(ctx, &entry, attr, json, &db),
        Commands::Query { keyword, db } => commands::run_query(ctx, &keyword, &db),
        Commands::Completions { .. } => Ok(()),
    }
}
