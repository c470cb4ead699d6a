//! Task: install the Xcode command-line tools.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::developer_tools::DeveloperToolsResource;

/// Install the Xcode command-line tools (compiler toolchain).
#[derive(Debug)]
pub struct InstallDeveloperTools;

impl Task for InstallDeveloperTools {
    fn name(&self) -> &'static str {
        "Install developer tools"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.is_macos()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource = DeveloperToolsResource::new(&*ctx.executor, &*ctx.prompter);
        process_resources(
            ctx,
            std::iter::once(resource),
            &ProcessOpts::new("install"),
        )
    }
}
