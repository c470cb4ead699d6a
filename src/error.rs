//! Domain-specific error types and exit-code mapping.
//!
//! Internal modules return typed errors (e.g. [`ConfigError`],
//! [`ResourceError`], [`DownloadError`]) while command handlers at the CLI
//! boundary work with [`anyhow::Error`].  [`exit_code_for`] recovers the
//! process exit code from an error chain.
//!
//! # Exit codes
//!
//! ```text
//! 0    every task completed
//! N    the first external command that failed exited with N
//! 1    anything else (network failure, I/O, invalid settings, signal)
//! ```

use thiserror::Error;

pub use crate::installer::DownloadError;
pub use crate::resources::error::ResourceError;

/// Errors that arise from loading the tool's own settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file is not valid TOML or has unexpected fields.
    #[error("Invalid settings in {file}: {message}")]
    InvalidSyntax {
        /// Path of the offending file.
        file: String,
        /// Parser message.
        message: String,
    },

    /// A settings file named on the command line does not exist.
    #[error("Settings file not found: {path}")]
    NotFound {
        /// Path that was given.
        path: String,
    },

    /// An I/O error occurred while reading the settings file.
    #[error("IO error reading settings file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Map an error chain to the process exit code.
///
/// The exit code of the first [`ResourceError::ExecutionFailed`] found in the
/// chain is propagated when it fits in `1..=255`; every other failure maps
/// to `1`.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| match cause.downcast_ref::<ResourceError>() {
            Some(ResourceError::ExecutionFailed { exit_code, .. }) => Some(*exit_code),
            _ => None,
        })
        .and_then(|code| u8::try_from(code).ok())
        .filter(|&code| code != 0)
        .unwrap_or(1)
}
