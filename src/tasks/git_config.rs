//! Task: merge git configuration and the global ignore file.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, TaskStats, check_and_apply};
use crate::resources::git_config::GitConfigMerge;
use crate::resources::ignore_file::IgnoreFileEntry;

/// Merge identity and defaults into `~/.gitconfig` and ensure the global
/// ignore file lists the configured patterns.
#[derive(Debug)]
pub struct ConfigureGit;

impl Task for ConfigureGit {
    fn name(&self) -> &'static str {
        "Configure git"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::new();

        let merge = GitConfigMerge::new(ctx.gitconfig_path(), &*ctx.prompter);
        stats += check_and_apply(ctx, &merge, &ProcessOpts::new("merge"))?;

        for pattern in &ctx.settings.git.ignore_patterns {
            let entry = IgnoreFileEntry::new(ctx.global_ignore_path(), pattern.clone());
            stats += check_and_apply(ctx, &entry, &ProcessOpts::new("add"))?;
        }

        Ok(stats.finish(ctx))
    }
}
