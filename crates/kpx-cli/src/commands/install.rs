//! Development install commands: symlink, unlink, status

use colored::Colorize;
use kpx_devtools::{
    BackupKind, ExtensionLayout, InstallManager, InstallState, LinkOutcome, UnlinkOutcome,
};

use crate::context::Context;
use crate::error::Result;

fn manager(ctx: &Context) -> Result<InstallManager> {
    let layout = ExtensionLayout::resolve(&ctx.config.workflow, &ctx.working_dir)?;
    Ok(InstallManager::new(layout))
}

/// Back up the installed extension and link the working directory in its place
pub fn run_symlink(ctx: &Context) -> Result<()> {
    let manager = manager(ctx)?;
    let layout = manager.layout();

    match manager.symlink()? {
        LinkOutcome::AlreadyLinked => {
            println!(
                "{} {} already links to {}",
                "=>".blue().bold(),
                layout.installed_dir,
                layout.working_dir
            );
        }
        LinkOutcome::Linked { backup } => {
            if let Some(backup) = backup {
                println!(
                    "{} Backed up {} to {}",
                    "=>".blue().bold(),
                    layout.installed_dir,
                    backup.path.as_str().cyan()
                );
            }
            println!(
                "{} Linked {} -> {}",
                "OK".green().bold(),
                layout.installed_dir,
                layout.working_dir
            );
        }
    }
    Ok(())
}

/// Remove the development link and restore the backup
pub fn run_unlink(ctx: &Context) -> Result<()> {
    let manager = manager(ctx)?;
    let installed = manager.layout().installed_dir.clone();

    match manager.unlink()? {
        UnlinkOutcome::Restored(backup) => {
            let what = match backup.metadata.kind {
                BackupKind::Tree { .. } => "installation",
                BackupKind::Symlink { .. } => "link",
            };
            println!(
                "{} Restored {} at {} (backed up {})",
                "OK".green().bold(),
                what,
                installed,
                backup.metadata.created.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        UnlinkOutcome::Removed => {
            println!(
                "{} Removed {} (no backup to restore)",
                "OK".green().bold(),
                installed
            );
        }
    }
    Ok(())
}

/// Print the development install state
pub fn run_status(ctx: &Context, json: bool) -> Result<()> {
    let status = manager(ctx)?.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let state = match &status.state {
        InstallState::Missing => "not installed".yellow(),
        InstallState::Linked => "linked to working directory".green(),
        InstallState::ForeignLink { target } => {
            format!("linked to {}", target.display()).yellow()
        }
        InstallState::Installed => "installed".normal(),
    };

    println!("{}", "Extension Status".bold());
    println!();
    println!("{}:  {}", "Installed".dimmed(), status.installed_dir);
    println!("{}:    {}", "Working".dimmed(), status.working_dir);
    println!("{}:      {}", "State".dimmed(), state);
    if status.backup_pending {
        println!("{}:     {} ({})", "Backup".dimmed(), "pending".cyan(), status.backup_dir);
    } else {
        println!("{}:     {}", "Backup".dimmed(), "none".dimmed());
    }
    Ok(())
}
