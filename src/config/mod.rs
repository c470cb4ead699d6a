//! Settings for the provisioner and models of the files it edits.
pub mod ini;
pub mod profile;
pub mod toml_loader;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Official Homebrew installer script.
pub const DEFAULT_INSTALLER_URL: &str =
    "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";

/// Formulae installed by default.
pub const DEFAULT_FORMULAE: &[&str] = &["git", "node", "tree", "colordiff"];

/// Operator-tunable settings, loaded from `settings.toml`.
///
/// Every field has a built-in default, so an absent file or an empty one
/// reproduces the standard workstation setup.
///
/// ```toml
/// formulae = ["git", "node", "tree", "colordiff", "jq"]
///
/// [installer]
/// url = "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh"
/// interpreter = "/bin/bash"
/// sha256 = "…"
///
/// [git]
/// ignore_patterns = [".DS_Store"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Homebrew formulae the utilities task ensures are installed.
    pub formulae: Vec<String>,
    /// Package-manager bootstrap source.
    pub installer: InstallerSettings,
    /// Version-control defaults.
    pub git: GitSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            formulae: DEFAULT_FORMULAE.iter().map(ToString::to_string).collect(),
            installer: InstallerSettings::default(),
            git: GitSettings::default(),
        }
    }
}

/// Where the Homebrew installer comes from and how it is run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerSettings {
    /// HTTPS URL of the installer script.
    pub url: String,
    /// Program that reads the script on stdin.
    pub interpreter: String,
    /// Extra arguments for the interpreter.
    pub args: Vec<String>,
    /// Expected lowercase hex SHA-256 of the script, if pinned.
    pub sha256: Option<String>,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_INSTALLER_URL.to_string(),
            interpreter: "/bin/bash".to_string(),
            args: Vec::new(),
            sha256: None,
        }
    }
}

/// Settings for the git configuration task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitSettings {
    /// Lines ensured in `~/.gitignore_global`.
    pub ignore_patterns: Vec<String>,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            ignore_patterns: vec![".DS_Store".to_string()],
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// An explicit `path` must exist.  A missing file at the default
    /// location yields the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `path` is missing, or if the file
    /// cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => toml_loader::load_config(path),
            None => default_path().map_or_else(
                || Ok(Self::default()),
                |p| toml_loader::load_config_or_default(&p),
            ),
        }
    }
}

/// `$XDG_CONFIG_HOME/macsetup/settings.toml`, falling back to
/// `~/.config/macsetup/settings.toml`.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .map(|base| base.join("macsetup").join("settings.toml"))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn write_temp_toml(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_match_standard_setup() {
        let s = Settings::default();
        assert_eq!(s.formulae, ["git", "node", "tree", "colordiff"]);
        assert_eq!(s.installer.url, DEFAULT_INSTALLER_URL);
        assert_eq!(s.installer.interpreter, "/bin/bash");
        assert!(s.installer.sha256.is_none());
        assert_eq!(s.git.ignore_patterns, [".DS_Store"]);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let (_dir, path) = write_temp_toml(
            r#"formulae = ["jq"]

[installer]
sha256 = "abc123"
"#,
        );
        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.formulae, ["jq"]);
        assert_eq!(s.installer.sha256.as_deref(), Some("abc123"));
        assert_eq!(s.installer.url, DEFAULT_INSTALLER_URL);
        assert_eq!(s.git, GitSettings::default());
    }

    #[test]
    fn unknown_key_is_an_error() {
        let (_dir, path) = write_temp_toml("[installer]\nurll = \"x\"\n");
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(ConfigError::InvalidSyntax { .. })
        ));
    }
}
