//! Task: merge the shell profile.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::shell_profile::ShellProfileMerge;

/// Merge prompt, PATH and environment exports into `~/.bash_profile`.
#[derive(Debug)]
pub struct ConfigureShell;

impl Task for ConfigureShell {
    fn name(&self) -> &'static str {
        "Configure shell"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let editor = ctx.editor.get().map(ToString::to_string);
        if editor.is_none() {
            ctx.log.warn("no editor was resolved; leaving EDITOR unset");
        }
        let merge = ShellProfileMerge::new(ctx.bash_profile_path(), editor);
        process_resources(ctx, std::iter::once(merge), &ProcessOpts::new("merge"))
    }
}
