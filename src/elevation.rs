//! Administrator credential for elevated commands.
//!
//! An [`ElevationSession`] is created once per run and shared through the
//! task context.  The password is requested on first use only and lives in
//! memory until the session is dropped.
use std::fmt;
use std::sync::{Arc, OnceLock};

use anyhow::Result;

use crate::prompt::Prompter;

const PASSWORD_PROMPT: &str = "Please enter your system password";

/// An administrator password.  `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a secret.
    #[must_use]
    pub const fn new(secret: String) -> Self {
        Self(secret)
    }

    /// The secret followed by a newline, as `sudo -S` expects on stdin.
    #[must_use]
    pub fn as_stdin_line(&self) -> Vec<u8> {
        let mut line = Vec::with_capacity(self.0.len() + 1);
        line.extend_from_slice(self.0.as_bytes());
        line.push(b'\n');
        line
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Lazily acquired credential scoped to one run.
pub struct ElevationSession {
    prompter: Arc<dyn Prompter>,
    credential: OnceLock<Credential>,
}

impl fmt::Debug for ElevationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElevationSession")
            .field("acquired", &self.is_acquired())
            .finish_non_exhaustive()
    }
}

impl ElevationSession {
    /// Create a session that will ask `prompter` for the password on first use.
    #[must_use]
    pub fn new(prompter: Arc<dyn Prompter>) -> Self {
        Self {
            prompter,
            credential: OnceLock::new(),
        }
    }

    /// Return the cached credential, prompting the operator the first time.
    ///
    /// # Errors
    ///
    /// Returns an error if the password prompt cannot read the terminal.
    pub fn credential(&self) -> Result<&Credential> {
        if let Some(credential) = self.credential.get() {
            return Ok(credential);
        }
        let secret = self.prompter.password(PASSWORD_PROMPT)?;
        Ok(self.credential.get_or_init(|| Credential::new(secret)))
    }

    /// Whether the password has already been entered in this run.
    #[must_use]
    pub fn is_acquired(&self) -> bool {
        self.credential.get().is_some()
    }
}
