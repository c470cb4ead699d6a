//! Task: bootstrap Homebrew.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::installer::run_installer;
use crate::resources::package::locate_brew;

/// Bootstrap the Homebrew package manager.
#[derive(Debug)]
pub struct InstallHomebrew;

impl Task for InstallHomebrew {
    fn name(&self) -> &'static str {
        "Install Homebrew"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if let Some(brew) = locate_brew(&*ctx.executor, &*ctx.fs_ops) {
            ctx.log.debug(&format!("using {brew}"));
            ctx.log.info("Homebrew already installed");
            return Ok(TaskResult::Ok);
        }

        let origin = ctx.script_source.origin();
        let installer = &ctx.settings.installer;
        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would pipe installer from {origin} into {}",
                installer.interpreter
            ));
            return Ok(TaskResult::DryRun);
        }

        ctx.log.info(&format!("downloading installer from {origin}"));
        run_installer(&*ctx.script_source, &*ctx.executor, installer)?;
        ctx.log.info("Homebrew installed");
        Ok(TaskResult::Ok)
    }
}
