//! Homebrew formulae: locating `brew`, listing and batch-installing.
use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use super::error::ResourceError;
use crate::exec::Executor;
use crate::operations::FileSystemOps;

/// Where the Homebrew installer puts `brew` (Apple Silicon, then Intel).
///
/// A freshly bootstrapped `brew` is not on this process's `PATH` yet.
pub const BREW_LOCATIONS: &[&str] = &["/opt/homebrew/bin/brew", "/usr/local/bin/brew"];

/// Program to invoke for Homebrew.
///
/// `brew` when it is on `PATH`, otherwise the first of [`BREW_LOCATIONS`]
/// that exists.
#[must_use]
pub fn locate_brew(executor: &dyn Executor, fs: &dyn FileSystemOps) -> Option<String> {
    if executor.which("brew") {
        return Some("brew".to_string());
    }
    BREW_LOCATIONS
        .iter()
        .find(|path| fs.exists(Path::new(path)))
        .map(|path| (*path).to_string())
}

/// Like [`locate_brew`], but a missing `brew` is an error naming `purpose`.
///
/// # Errors
///
/// Returns [`ResourceError::NotFound`] if `brew` is neither on `PATH` nor
/// in a known install location.
pub fn require_brew(
    executor: &dyn Executor,
    fs: &dyn FileSystemOps,
    purpose: &str,
) -> Result<String, ResourceError> {
    locate_brew(executor, fs).ok_or_else(|| ResourceError::NotFound {
        resource: format!("brew (needed to {purpose})"),
    })
}

/// Query the full set of installed formula names.
///
/// Runs `<brew> list --formula -1` once, regardless of how many formulae
/// need to be checked.  A failing listing yields an empty set so every
/// formula is handed to `brew install`, which is itself idempotent.
///
/// # Errors
///
/// Returns an error if `brew` cannot be spawned.
pub fn installed_formulae(executor: &dyn Executor, brew: &str) -> Result<HashSet<String>> {
    let result = executor.run_unchecked(brew, &["list", "--formula", "-1"])?;
    if !result.success {
        return Ok(HashSet::new());
    }
    Ok(result
        .stdout
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Entries of `wanted` that are not in `installed`, in `wanted` order.
#[must_use]
pub fn missing_formulae<'a>(wanted: &'a [String], installed: &HashSet<String>) -> Vec<&'a str> {
    wanted
        .iter()
        .filter(|name| !installed.contains(*name))
        .map(String::as_str)
        .collect()
}

/// Install `names` with a single `<brew> install <names…>`.
///
/// Output goes straight to the terminal.
///
/// # Errors
///
/// Returns an error carrying brew's exit code if the install fails.
pub fn install_formulae(executor: &dyn Executor, brew: &str, names: &[&str]) -> Result<()> {
    if names.is_empty() {
        return Ok(());
    }
    let mut args = vec!["install"];
    args.extend_from_slice(names);
    executor.run_attached(brew, &args)?;
    Ok(())
}
