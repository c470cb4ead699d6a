//! Task: install command-line utilities through Homebrew.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, TaskStats};
use crate::resources::package::{
    install_formulae, installed_formulae, locate_brew, missing_formulae, require_brew,
};

/// Install the configured Homebrew formulae.
///
/// Queries the installed set **once**, then installs every missing formula
/// with a single `brew install`.  A missing `brew` is fatal.
#[derive(Debug)]
pub struct InstallUtilities;

impl Task for InstallUtilities {
    fn name(&self) -> &'static str {
        "Install utilities"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let formulae = &ctx.settings.formulae;
        if formulae.is_empty() {
            return Ok(TaskResult::Skipped("no formulae configured".to_string()));
        }

        // In a dry run the bootstrap before us did not install anything.
        if ctx.dry_run && locate_brew(&*ctx.executor, &*ctx.fs_ops).is_none() {
            ctx.log.dry_run(&format!(
                "would install after bootstrapping Homebrew: {}",
                formulae.join(" ")
            ));
            return Ok(TaskResult::DryRun);
        }
        let brew = require_brew(&*ctx.executor, &*ctx.fs_ops, "install formulae")?;

        ctx.log.debug(&format!(
            "batch-checking {} formulae with {brew}",
            formulae.len()
        ));
        let installed = installed_formulae(&*ctx.executor, &brew)?;
        let missing = missing_formulae(formulae, &installed);

        let mut stats = TaskStats::new();
        for name in formulae.iter().filter(|name| installed.contains(*name)) {
            ctx.log.debug(&format!("ok: {name} (brew)"));
            stats.already_ok += 1;
        }

        if !missing.is_empty() {
            let names = missing.join(" ");
            if ctx.dry_run {
                ctx.log.dry_run(&format!("would install: {names}"));
            } else {
                ctx.log.info(&format!("installing: {names}"));
                install_formulae(&*ctx.executor, &brew, &missing)
                    .with_context(|| format!("installing formulae: {names}"))?;
            }
            stats.changed += u32::try_from(missing.len()).unwrap_or(u32::MAX);
        }

        Ok(stats.finish(ctx))
    }
}
