//! Workflow tasks: init, test, run-ul, run

use colored::Colorize;
use kpx_devtools::{ExtensionLayout, Task, TaskRunner};

use crate::context::Context;
use crate::error::Result;

/// Build the plan for `task` and run it, stopping at the first failure
pub fn run_task(ctx: &Context, task: Task) -> Result<()> {
    let layout = ExtensionLayout::resolve(&ctx.config.workflow, &ctx.working_dir)?;
    let plan = task.plan(&ctx.config.workflow, &layout);

    for step in &plan.steps {
        println!("{} {}", "=>".blue().bold(), step);
    }
    TaskRunner::new(&ctx.working_dir).run(&plan)?;

    println!("{} {}", "OK".green().bold(), task.name());
    Ok(())
}
