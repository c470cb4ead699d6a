//! Task: enable the locate launch daemon.
use anyhow::Result;
use std::path::PathBuf;

use super::{Context, ProcessOpts, Task, TaskResult, apply_resource};
use crate::resources::Applicable as _;
use crate::resources::launch_daemon::{LOCATE_PLIST, LaunchDaemonResource};

/// Enable the `locate` database launch daemon.
///
/// Fire-and-forget: a failing `launchctl` is logged and the run continues.
#[derive(Debug)]
pub struct EnableLocateService;

impl Task for EnableLocateService {
    fn name(&self) -> &'static str {
        "Enable locate service"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_macos()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource =
            LaunchDaemonResource::new(PathBuf::from(LOCATE_PLIST), &*ctx.executor, &ctx.elevation);

        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would run: sudo {}", resource.description()));
            return Ok(TaskResult::DryRun);
        }

        let stats = apply_resource(ctx, &resource, &ProcessOpts::new("load").warn_on_error())?;
        Ok(stats.finish(ctx))
    }
}
