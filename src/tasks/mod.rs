//! Named tasks that orchestrate resource changes, run in a fixed order.
pub mod developer_tools;
pub mod editor;
pub mod git_config;
pub mod homebrew;
pub mod locate;
mod processing;
pub mod shell;
pub mod utilities;

mod context;

pub use context::Context;
pub use processing::{
    ProcessOpts, TaskResult, TaskStats, apply_resource, check_and_apply, process_resources,
};

use anyhow::Result;

use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task should run on the current platform.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails to execute, such as when an
    /// external command exits non-zero, a download fails, or a file cannot
    /// be written.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete set of tasks run by the install command, in execution order.
///
/// Order matters: utilities need Homebrew, and the shell profile exports the
/// editor picked by [`editor::ResolveEditor`].
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(developer_tools::InstallDeveloperTools),
        Box::new(homebrew::InstallHomebrew),
        Box::new(utilities::InstallUtilities),
        Box::new(locate::EnableLocateService),
        Box::new(editor::ResolveEditor),
        Box::new(git_config::ConfigureGit),
        Box::new(shell::ConfigureShell),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error, with the task name as context, after recording
/// it as failed.  Callers stop the run on the first error.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log.debug(&format!(
            "skipping task: {} (not applicable on {})",
            task.name(),
            ctx.platform.os
        ));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(())
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
            Ok(())
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            Err(e.context(task.name().to_string()))
        }
    }
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::exit_code_for;
    use crate::platform::Os;
    use crate::resources::error::ResourceError;
    use test_helpers::make_context;

    /// A mock task for testing `execute()`.
    struct MockTask {
        name: &'static str,
        should_run: bool,
        result: fn() -> Result<TaskResult>,
    }

    impl Task for MockTask {
        fn name(&self) -> &str {
            self.name
        }
        fn should_run(&self, _ctx: &Context) -> bool {
            self.should_run
        }
        fn run(&self, _ctx: &Context) -> Result<TaskResult> {
            (self.result)()
        }
    }

    fn task(name: &'static str, result: fn() -> Result<TaskResult>) -> MockTask {
        MockTask {
            name,
            should_run: true,
            result,
        }
    }

    #[test]
    fn execute_records_non_applicable_task() {
        let (ctx, log) = make_context(Os::Linux);
        let mut t = task("mac-only", || Ok(TaskResult::Ok));
        t.should_run = false;

        execute(&t, &ctx).unwrap();
        let entries = log.task_entries();
        assert_eq!(entries[0].status, TaskStatus::NotApplicable);
    }

    #[test]
    fn execute_records_ok_skipped_and_dry_run() {
        let (ctx, log) = make_context(Os::MacOs);
        execute(&task("ok", || Ok(TaskResult::Ok)), &ctx).unwrap();
        execute(
            &task("skip", || Ok(TaskResult::Skipped("brew not found".into()))),
            &ctx,
        )
        .unwrap();
        execute(&task("dry", || Ok(TaskResult::DryRun)), &ctx).unwrap();

        let statuses: Vec<_> = log.task_entries().iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            [TaskStatus::Ok, TaskStatus::Skipped, TaskStatus::DryRun]
        );
        assert_eq!(log.failure_count(), 0);
    }

    #[test]
    fn execute_records_failure_and_returns_error() {
        let (ctx, log) = make_context(Os::MacOs);
        let err = execute(&task("fail", || Err(anyhow::anyhow!("kaboom"))), &ctx).unwrap_err();

        assert_eq!(log.failure_count(), 1);
        assert!(format!("{err:#}").contains("kaboom"));
        assert_eq!(err.to_string(), "fail");
    }

    #[test]
    fn execute_error_keeps_exit_code() {
        let (ctx, _log) = make_context(Os::MacOs);
        let err = execute(
            &task("brew", || {
                Err(ResourceError::ExecutionFailed {
                    program: "brew".to_string(),
                    exit_code: 9,
                    stderr: String::new(),
                }
                .into())
            }),
            &ctx,
        )
        .unwrap_err();
        assert_eq!(exit_code_for(&err), 9);
    }

    #[test]
    fn install_tasks_run_in_declared_order() {
        let names: Vec<String> = all_install_tasks()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        let editor = names.iter().position(|n| n == "Resolve editor").unwrap();
        let shell = names.iter().position(|n| n == "Configure shell").unwrap();
        let brew = names.iter().position(|n| n == "Install Homebrew").unwrap();
        let utils = names.iter().position(|n| n == "Install utilities").unwrap();
        assert!(editor < shell);
        assert!(brew < utils);
    }
}
