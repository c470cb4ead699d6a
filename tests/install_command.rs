#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `install` command.
//!
//! These tests exercise the full task list produced by [`all_install_tasks`],
//! the task-name-based filtering applied by the `--skip` and `--only` CLI
//! flags, and the abort-on-first-failure behaviour of the task runner.

mod common;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use common::{FakeApplications, ScriptedExecutor, TestHome, failed_exit_code};
use macsetup_cli::cli::InstallOpts;
use macsetup_cli::commands::{install::select_tasks, run_tasks};
use macsetup_cli::error::exit_code_for;
use macsetup_cli::logging::TaskStatus;
use macsetup_cli::platform::Os;
use macsetup_cli::tasks::{self, all_install_tasks};

// ---------------------------------------------------------------------------
// Snapshot: full install task list
// ---------------------------------------------------------------------------

/// Snapshot of all install task names in execution order.
///
/// Any addition, removal, rename or reordering of an install task fails
/// this test, prompting a deliberate snapshot update.
#[test]
fn install_task_names() {
    let all_tasks = all_install_tasks();
    let task_names: Vec<&str> = all_tasks.iter().map(|t| t.name()).collect();
    insta::assert_snapshot!("install_task_names", task_names.join("\n"));
}

#[test]
fn install_task_names_are_unique() {
    let tasks = all_install_tasks();
    let mut seen: HashSet<&str> = HashSet::new();
    for task in &tasks {
        assert!(
            seen.insert(task.name()),
            "duplicate install task name: '{}'",
            task.name()
        );
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[test]
fn skip_filters_by_substring() {
    let all = all_install_tasks();
    let opts = InstallOpts {
        skip: vec!["homebrew".to_string(), "LOCATE".to_string()],
        only: vec![],
    };
    let names: Vec<&str> = select_tasks(&all, &opts).iter().map(|t| t.name()).collect();
    assert!(!names.contains(&"Install Homebrew"));
    assert!(!names.contains(&"Enable locate service"));
    assert_eq!(names.len(), all.len() - 2);
}

#[test]
fn only_with_unknown_name_selects_nothing() {
    let all = all_install_tasks();
    let opts = InstallOpts {
        skip: vec![],
        only: vec!["fonts".to_string()],
    };
    assert!(select_tasks(&all, &opts).is_empty());
}

// ---------------------------------------------------------------------------
// Abort on first failure
// ---------------------------------------------------------------------------

/// A failing `brew install` stops the run with brew's exit code and no
/// later task runs.
#[test]
fn package_install_failure_aborts_with_its_exit_code() {
    // xcode-select -p, brew list --formula -1, brew install … (fails with 1)
    let env = TestHome::new(ScriptedExecutor::new(&[0, 0, 1], &["brew"]), &[]);
    let ctx = env.context(Os::MacOs);
    let all = all_install_tasks();

    let err = run_tasks(
        all.iter().map(AsRef::as_ref),
        &ctx,
        &env.log,
    )
    .unwrap_err();

    assert_eq!(exit_code_for(&err), 1);
    assert_eq!(failed_exit_code(&err), Some(1));
    assert_eq!(
        env.executor.calls(),
        [
            "xcode-select -p",
            "brew list --formula -1",
            "brew install git node tree colordiff",
        ]
    );

    let statuses: Vec<(String, TaskStatus)> = env
        .log
        .task_entries()
        .into_iter()
        .map(|t| (t.name, t.status))
        .collect();
    assert_eq!(
        statuses,
        [
            ("Install developer tools".to_string(), TaskStatus::Ok),
            ("Install Homebrew".to_string(), TaskStatus::Ok),
            ("Install utilities".to_string(), TaskStatus::Failed),
        ]
    );
    assert!(env.prompter.asked().is_empty(), "locate service never ran");
    assert!(!env.path().join(".gitconfig").exists());
    assert!(!env.path().join(".bash_profile").exists());
}

/// The installer interpreter's exit code is what the process exits with.
#[test]
fn installer_failure_propagates_interpreter_code() {
    // xcode-select -p, /bin/bash (fails with 3)
    let env = TestHome::new(ScriptedExecutor::new(&[0, 3], &[]), &[]);
    let ctx = env.context(Os::MacOs);
    let all = all_install_tasks();

    let err = run_tasks(all.iter().map(AsRef::as_ref), &ctx, &env.log).unwrap_err();
    assert_eq!(exit_code_for(&err), 3);
    assert_eq!(env.executor.calls(), ["xcode-select -p", "/bin/bash"]);
    assert_eq!(env.log.failure_count(), 1);
}

/// A bootstrap that leaves no usable `brew` behind fails the utilities
/// task instead of passing it over.
#[test]
fn missing_brew_after_bootstrap_aborts_utilities() {
    // xcode-select -p, /bin/bash (both succeed)
    let env = TestHome::new(ScriptedExecutor::new(&[0, 0], &[]), &[]);
    let ctx = env.context(Os::MacOs);
    let all = all_install_tasks();

    let err = run_tasks(all.iter().map(AsRef::as_ref), &ctx, &env.log).unwrap_err();

    assert_eq!(exit_code_for(&err), 1);
    assert!(format!("{err:#}").contains("brew"), "{err:#}");
    assert_eq!(env.executor.calls(), ["xcode-select -p", "/bin/bash"]);
    let statuses: Vec<TaskStatus> = env
        .log
        .task_entries()
        .into_iter()
        .map(|t| t.status)
        .collect();
    assert_eq!(statuses, [TaskStatus::Ok, TaskStatus::Ok, TaskStatus::Failed]);
    assert!(!env.path().join(".gitconfig").exists());
}

/// A `brew` at its install location but not on `PATH` is neither
/// reinstalled nor skipped; it is called by its full path.
#[test]
fn brew_outside_path_is_used_by_location() {
    // xcode-select -p, brew list --formula -1, brew install …
    let env = TestHome::new(ScriptedExecutor::new(&[0, 0, 0], &[]), &[]);
    let mut ctx = env.context(Os::MacOs);
    ctx.fs_ops = Arc::new(FakeApplications(vec![PathBuf::from(
        "/opt/homebrew/bin/brew",
    )]));
    let all = all_install_tasks();

    run_tasks(all.iter().take(3).map(AsRef::as_ref), &ctx, &env.log).unwrap();

    assert_eq!(
        env.executor.calls(),
        [
            "xcode-select -p",
            "/opt/homebrew/bin/brew list --formula -1",
            "/opt/homebrew/bin/brew install git node tree colordiff",
        ]
    );
}

/// On a non-macOS host only the platform-independent tasks run, and an
/// editor already on `PATH` flows into the shell profile.
#[test]
fn linux_run_merges_configuration() {
    // brew list --formula -1, brew install … (both succeed)
    let env = TestHome::new(
        ScriptedExecutor::new(&[0, 0], &["brew", "subl"]),
        &["Grace Hopper", "grace@example.com"],
    );
    let ctx = env.context(Os::Linux);
    let all = all_install_tasks();

    run_tasks(all.iter().map(AsRef::as_ref), &ctx, &env.log).unwrap();

    let entries = env.log.task_entries();
    assert_eq!(entries.len(), all.len());
    assert_eq!(entries[0].status, TaskStatus::NotApplicable);
    assert!(env.read(".gitconfig").contains("\tname = Grace Hopper\n"));
    assert!(
        env.read(".bash_profile")
            .contains("export EDITOR=\"subl --wait\"\n")
    );
    assert_eq!(env.read(".gitignore_global"), ".DS_Store\n");
}

#[test]
fn execute_is_usable_per_task() {
    let env = TestHome::new(ScriptedExecutor::new(&[], &[]), &[]);
    let ctx = env.context(Os::Linux);
    let all = all_install_tasks();
    let locate = all
        .iter()
        .find(|t| t.name() == "Enable locate service")
        .unwrap();

    tasks::execute(locate.as_ref(), &ctx).unwrap();
    assert_eq!(env.log.task_entries()[0].status, TaskStatus::NotApplicable);
}
