//! Command: run the provisioning tasks.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::{GlobalOpts, InstallOpts};
use crate::config::Settings;
use crate::logging::{Log, Logger};
use crate::platform::Platform;
use crate::tasks::{self, Context, Task};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the settings file is invalid, the home directory
/// cannot be determined, or a task fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Arc<Logger>) -> Result<()> {
    let platform = Platform::detect();
    log.info(&format!("macsetup {} on {}", crate::version(), platform.os));

    log.stage("Loading settings");
    let settings = Settings::load(global.config.as_deref())?;
    log.info(&format!(
        "{} formulae, installer from {}",
        settings.formulae.len(),
        settings.installer.url
    ));
    if settings.installer.sha256.is_none() {
        log.debug("installer checksum not pinned");
    }

    let ctx = Context::new(
        settings,
        platform,
        Arc::clone(log) as Arc<dyn Log>,
        global.dry_run,
        global.home.clone(),
    )?;
    log.debug(&format!("home: {}", ctx.home.display()));

    let all_tasks = tasks::all_install_tasks();
    let tasks_to_run = select_tasks(&all_tasks, opts);
    super::run_tasks(tasks_to_run, &ctx, log)
}

/// Filter tasks by `--skip` and `--only`.
///
/// Names are matched case-insensitively by substring.  `--only` takes
/// precedence over `--skip`.
#[must_use]
pub fn select_tasks<'a>(all: &'a [Box<dyn Task>], opts: &InstallOpts) -> Vec<&'a dyn Task> {
    all.iter()
        .filter(|t| {
            let name = t.name().to_lowercase();
            if !opts.only.is_empty() {
                return opts.only.iter().any(|o| name.contains(&o.to_lowercase()));
            }
            if !opts.skip.is_empty() {
                return !opts.skip.iter().any(|s| name.contains(&s.to_lowercase()));
            }
            true
        })
        .map(AsRef::as_ref)
        .collect()
}
