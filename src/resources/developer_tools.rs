//! Apple command-line developer tools (the native compiler toolchain).
use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;
use crate::prompt::Prompter;

/// Exit code of `xcode-select --install` when the tools are already present.
const ALREADY_INSTALLED: i32 = 1;

const FINISHED_PROMPT: &str = "Click Install in the dialog and accept the EULA, then press enter when the installation is finished";

/// The Xcode command-line tools.
///
/// Installing them opens a GUI dialog; there is no way to wait for it
/// programmatically, so `apply` blocks until the operator confirms.
#[derive(Debug)]
pub struct DeveloperToolsResource<'a> {
    executor: &'a dyn Executor,
    prompter: &'a dyn Prompter,
}

impl<'a> DeveloperToolsResource<'a> {
    /// Create a new developer tools resource.
    #[must_use]
    pub const fn new(executor: &'a dyn Executor, prompter: &'a dyn Prompter) -> Self {
        Self { executor, prompter }
    }
}

impl Applicable for DeveloperToolsResource<'_> {
    fn description(&self) -> String {
        "Xcode command-line tools".to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        let result = self.executor.run_unchecked("xcode-select", &["--install"])?;
        if result.code == Some(ALREADY_INSTALLED) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        self.prompter.pause(FINISHED_PROMPT)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DeveloperToolsResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let result = self.executor.run_unchecked("xcode-select", &["-p"])?;
        if result.success {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
