//! macOS workstation provisioner.
//!
//! Installs the developer toolchain, Homebrew and a handful of formulae,
//! enables the `locate` service, picks an editor, and merges sensible
//! defaults into `~/.gitconfig`, `~/.gitignore_global` and
//! `~/.bash_profile` without overwriting anything the operator already set.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: the tool's settings plus the line-preserving models of
//!   the files it edits
//! - **[`resources`]**: idempotent `check + apply` primitives (formulae,
//!   config merges, symlinks, …)
//! - **[`tasks`]**: named units of work wired to resources, run in order
//! - **[`commands`]**: top-level subcommand orchestration (`install`,
//!   `completions`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod editor;
pub mod elevation;
pub mod error;
pub mod exec;
pub mod installer;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod prompt;
pub mod resources;
pub mod tasks;

/// Version string: `MACSETUP_VERSION` when set at build time (release builds
/// or `git describe`), otherwise `dev-<package version>`.
#[must_use]
pub const fn version() -> &'static str {
    match option_env!("MACSETUP_VERSION") {
        Some(version) => version,
        None => concat!("dev-", env!("CARGO_PKG_VERSION")),
    }
}
