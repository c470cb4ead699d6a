//! TOML settings file parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Deserialize a TOML file into `T`, or `T::default()` if it does not exist.
///
/// The tool runs on built-in defaults until the operator writes a settings
/// file at the default location.
///
/// # Errors
///
/// As [`load_config`], except that a missing file is not an error.
pub fn load_config_or_default<T: DeserializeOwned + Default>(
    path: &Path,
) -> Result<T, ConfigError> {
    match load_config(path) {
        Err(ConfigError::NotFound { .. }) => Ok(T::default()),
        other => other,
    }
}

/// Deserialize a TOML file into `T`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if the file does not exist,
/// [`ConfigError::Io`] if it cannot be read, and
/// [`ConfigError::InvalidSyntax`] if it is not valid TOML for `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            ConfigError::Io {
                path: path.display().to_string(),
                source,
            }
        }
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::InvalidSyntax {
        file: path.display().to_string(),
        message: e.message().to_string(),
    })
}
