use anyhow::Result;

use super::context::Context;
use crate::resources::{Applicable, Resource, ResourceChange, ResourceState};

/// Outcome of a task that did not fail.
///
/// # Examples
///
/// ```
/// use macsetup_cli::tasks::TaskResult;
///
/// let skipped = TaskResult::Skipped("no formulae configured".into());
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed.
    Ok,
    /// Task had nothing to do (e.g. an empty formula list).
    Skipped(String),
    /// Task only reported what it would change.
    DryRun,
}

/// Per-task change counters.
///
/// # Examples
///
/// ```
/// use macsetup_cli::tasks::TaskStats;
///
/// let mut stats = TaskStats::new();
/// stats.changed = 1;
/// stats.already_ok = 3;
///
/// assert_eq!(stats.summary(false), "1 changed, 3 already ok");
/// assert_eq!(stats.summary(true), "1 would change, 3 already ok");
/// ```
#[derive(Debug, Default)]
pub struct TaskStats {
    /// Resources changed (or that would change in a dry run).
    pub changed: u32,
    /// Resources already in the desired state.
    pub already_ok: u32,
    /// Resources left alone after a warning.
    pub skipped: u32,
}

impl TaskStats {
    /// Empty counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One-line summary; the skipped count only appears when non-zero.
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let line = format!("{} {verb}, {} already ok", self.changed, self.already_ok);
        if self.skipped > 0 {
            format!("{line}, {} skipped", self.skipped)
        } else {
            line
        }
    }

    /// Log the summary and turn the counters into a [`TaskResult`].
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.skipped += other.skipped;
    }
}

/// How a task treats its resources.
///
/// # Examples
///
/// ```
/// use macsetup_cli::tasks::ProcessOpts;
///
/// assert!(ProcessOpts::new("merge").bail_on_error);
/// assert!(!ProcessOpts::new("load").warn_on_error().bail_on_error);
/// ```
#[derive(Debug)]
pub struct ProcessOpts<'a> {
    /// Verb for log lines ("merge", "load", ...).
    pub verb: &'a str,
    /// Fail the task when `apply()` fails; otherwise warn and count a skip.
    pub bail_on_error: bool,
}

impl<'a> ProcessOpts<'a> {
    /// Apply every missing or incorrect resource; failures are fatal.
    #[must_use]
    pub const fn new(verb: &'a str) -> Self {
        Self {
            verb,
            bail_on_error: true,
        }
    }

    /// Downgrade apply failures to warnings.
    #[must_use]
    pub const fn warn_on_error(mut self) -> Self {
        self.bail_on_error = false;
        self
    }
}

/// Check and apply each resource, then log the task summary.
///
/// # Errors
///
/// Returns the first state-check error, or the first apply error when
/// `opts.bail_on_error` is set.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    opts: &ProcessOpts,
) -> Result<TaskResult> {
    let mut stats = TaskStats::new();
    for resource in resources {
        stats += check_and_apply(ctx, &resource, opts)?;
    }
    Ok(stats.finish(ctx))
}

/// Check one resource and bring it to the desired state.
///
/// `Invalid` resources are reported and left alone.  In a dry run nothing
/// is applied.
///
/// # Errors
///
/// Returns an error if the state cannot be determined, or if applying
/// fails while `opts.bail_on_error` is set.
pub fn check_and_apply<R: Resource + ?Sized>(
    ctx: &Context,
    resource: &R,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    match resource.current_state()? {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            delta.already_ok += 1;
        }
        ResourceState::Invalid { reason } => {
            ctx.log.warn(&format!("skipping {desc}: {reason}"));
            delta.skipped += 1;
        }
        ResourceState::Missing if ctx.dry_run => {
            ctx.log.dry_run(&format!("would {}: {desc}", opts.verb));
            delta.changed += 1;
        }
        ResourceState::Incorrect { current } if ctx.dry_run => {
            ctx.log
                .dry_run(&format!("would {} {desc} ({current})", opts.verb));
            delta.changed += 1;
        }
        ResourceState::Missing | ResourceState::Incorrect { .. } => {
            delta += apply_resource(ctx, resource, opts)?;
        }
    }
    Ok(delta)
}

/// Apply a resource without checking its state first.
///
/// Used directly for apply-only resources (see [`Applicable`]).
///
/// # Errors
///
/// Returns an error if `apply()` fails or reports
/// [`ResourceChange::Skipped`] while `opts.bail_on_error` is set.
pub fn apply_resource<R: Applicable + ?Sized>(
    ctx: &Context,
    resource: &R,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    let failure = match resource.apply() {
        Ok(ResourceChange::Applied) => {
            ctx.log.info(&format!("{}: {desc}", opts.verb));
            delta.changed += 1;
            return Ok(delta);
        }
        Ok(ResourceChange::AlreadyCorrect) => {
            ctx.log.debug(&format!("ok: {desc}"));
            delta.already_ok += 1;
            return Ok(delta);
        }
        Ok(ResourceChange::Skipped { reason }) if opts.bail_on_error => {
            anyhow::bail!("failed to {} {desc}: {reason}", opts.verb);
        }
        Err(e) if opts.bail_on_error => return Err(e),
        Ok(ResourceChange::Skipped { reason }) => reason,
        Err(e) => e.to_string(),
    };
    ctx.log
        .warn(&format!("failed to {} {desc}: {failure}", opts.verb));
    delta.skipped += 1;
    Ok(delta)
}
