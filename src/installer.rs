//! Homebrew bootstrap: fetch the installer script and pipe it to an interpreter.
//!
//! Fetching is behind the [`ScriptSource`] trait so the trust decision
//! (transport, checksum pinning) can be audited or replaced without touching
//! the task that runs the script.
use anyhow::{Context as _, Result};
use std::sync::OnceLock;
use std::time::Duration;

use crate::config::InstallerSettings;
use crate::exec::Executor;

/// Network timeout for the installer download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Source of the package-manager installer script.
#[cfg_attr(test, mockall::automock)]
pub trait ScriptSource: Send + Sync {
    /// Where the script comes from, for log messages.
    fn origin(&self) -> String;

    /// Fetch the script body.
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be retrieved or fails
    /// verification.
    fn fetch(&self) -> Result<Vec<u8>, DownloadError>;
}

/// Errors arising from fetching the installer script.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The URL does not use HTTPS.
    #[error("refusing to download installer over insecure URL: {url}")]
    InsecureUrl {
        /// The rejected URL.
        url: String,
    },

    /// The server answered with an error status.
    #[error("download failed for {url}: HTTP {code} {message}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// HTTP status code.
        code: u16,
        /// Reason phrase for the status.
        message: String,
    },

    /// The request failed before a status was received, or the body could
    /// not be read.
    #[error("download failed for {url}: {reason}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The body does not match the pinned SHA-256.
    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    Checksum {
        /// The URL that was requested.
        url: String,
        /// Configured digest.
        expected: String,
        /// Digest of the downloaded body.
        actual: String,
    },
}

/// [`ScriptSource`] that performs one HTTPS GET with `ureq`.
#[derive(Debug, Clone)]
pub struct HttpsScriptSource {
    url: String,
    sha256: Option<String>,
}

impl HttpsScriptSource {
    /// Create a source for `url`, optionally pinned to a SHA-256 digest.
    #[must_use]
    pub fn new(url: impl Into<String>, sha256: Option<String>) -> Self {
        Self {
            url: url.into(),
            sha256: sha256.map(|s| s.trim().to_ascii_lowercase()),
        }
    }

    /// Build a source from the `[installer]` settings.
    #[must_use]
    pub fn from_settings(settings: &InstallerSettings) -> Self {
        Self::new(settings.url.clone(), settings.sha256.clone())
    }

    fn verify(&self, body: &[u8]) -> Result<(), DownloadError> {
        let Some(expected) = &self.sha256 else {
            return Ok(());
        };
        let actual = sha256_hex(body);
        if &actual != expected {
            return Err(DownloadError::Checksum {
                url: self.url.clone(),
                expected: expected.clone(),
                actual,
            });
        }
        Ok(())
    }
}

impl ScriptSource for HttpsScriptSource {
    fn origin(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>, DownloadError> {
        if !is_https(&self.url) {
            return Err(DownloadError::InsecureUrl {
                url: self.url.clone(),
            });
        }
        let response = http_agent()
            .get(&self.url)
            .call()
            .map_err(|e| map_ureq_error(&self.url, &e))?;
        let body = response
            .into_body()
            .read_to_vec()
            .map_err(|e| DownloadError::Transport {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;
        self.verify(&body)?;
        Ok(body)
    }
}

/// Fetch the installer from `source` and stream it into the interpreter's
/// stdin.  The interpreter's output goes straight to the terminal.
///
/// # Errors
///
/// Returns the [`DownloadError`] if fetching fails, and an
/// [`ExecutionFailed`](crate::resources::error::ResourceError::ExecutionFailed)
/// carrying the interpreter's exit code if it exits non-zero.
pub fn run_installer(
    source: &dyn ScriptSource,
    executor: &dyn Executor,
    settings: &InstallerSettings,
) -> Result<()> {
    let script = source.fetch()?;
    let args: Vec<&str> = settings.args.iter().map(String::as_str).collect();
    executor
        .run_with_input(&settings.interpreter, &args, &script)?
        .check(&settings.interpreter)
        .with_context(|| format!("running installer from {}", source.origin()))?;
    Ok(())
}

fn is_https(url: &str) -> bool {
    url.get(..8)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
}

/// Lowercase hex SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;

    let digest = Sha256::digest(bytes);
    let mut hex = String::with_capacity(64);
    for b in &digest {
        // write! to a String is infallible; unwrap_or(()) makes that explicit.
        write!(hex, "{b:02x}").unwrap_or(());
    }
    hex
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(code) => DownloadError::Status {
            url: url.to_owned(),
            code: *code,
            message: ureq::http::StatusCode::from_u16(*code)
                .ok()
                .and_then(|status| status.canonical_reason())
                .unwrap_or("Unknown Status")
                .to_owned(),
        },
        other => DownloadError::Transport {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
