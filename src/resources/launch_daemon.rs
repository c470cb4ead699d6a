//! System launch daemon loaded through `sudo launchctl`.
use anyhow::Result;
use std::path::PathBuf;

use super::{Applicable, ResourceChange};
use crate::elevation::ElevationSession;
use crate::exec::Executor;

/// Launch daemon that rebuilds the `locate` database.
pub const LOCATE_PLIST: &str = "/System/Library/LaunchDaemons/com.apple.locate.plist";

/// A launch daemon enabled with `launchctl load -w`.
///
/// There is no unprivileged way to read the state of a system daemon, so
/// this is apply-only.  A failing `launchctl` is reported as
/// [`ResourceChange::Skipped`] rather than an error.
#[derive(Debug)]
pub struct LaunchDaemonResource<'a> {
    /// Property list describing the daemon.
    pub plist: PathBuf,
    executor: &'a dyn Executor,
    session: &'a ElevationSession,
}

impl<'a> LaunchDaemonResource<'a> {
    /// Create a new launch daemon resource.
    #[must_use]
    pub const fn new(
        plist: PathBuf,
        executor: &'a dyn Executor,
        session: &'a ElevationSession,
    ) -> Self {
        Self {
            plist,
            executor,
            session,
        }
    }
}

impl Applicable for LaunchDaemonResource<'_> {
    fn description(&self) -> String {
        format!("launchctl load -w {}", self.plist.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let credential = self.session.credential()?;
        let plist = self.plist.to_string_lossy();
        let result = self.executor.run_with_input(
            "sudo",
            &["-S", "launchctl", "load", "-w", &plist],
            &credential.as_stdin_line(),
        )?;
        if result.success {
            Ok(ResourceChange::Applied)
        } else {
            Ok(ResourceChange::Skipped {
                reason: format!(
                    "launchctl exited with {}",
                    result
                        .code
                        .map_or_else(|| "a signal".to_string(), |c| c.to_string())
                ),
            })
        }
    }
}
