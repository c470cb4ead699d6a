//! Top-level subcommand orchestration.
pub mod completions;
pub mod install;
pub mod version;

use anyhow::Result;

use crate::logging::Logger;
use crate::tasks::{self, Context, Task};

/// Execute tasks in order, stopping at the first failure, then print the
/// summary.
///
/// # Errors
///
/// Returns the first task error.  Tasks after it never run.
pub fn run_tasks<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    let result = tasks
        .into_iter()
        .try_for_each(|task| tasks::execute(task, ctx));
    log.print_summary();
    result
}
