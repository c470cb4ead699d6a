//! Merge of prompt, PATH and environment exports into the shell profile.
use anyhow::Result;
use std::path::PathBuf;

use super::fs::{read_or_empty, write_file};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::profile::{ShellProfile, path_contains};

/// Colored `user:host:cwd` prompt.
pub const PROMPT_EXPORT: &str = r#"export PS1="\[$(tput bold)\]\[$(tput setaf 5)\]\u\[$(tput sgr0)\]:\[$(tput bold)\]\[$(tput setaf 2)\]\h\[$(tput sgr0)\]:\[$(tput bold)\]\[$(tput setaf 4)\]\w\[$(tput sgr0)\]\n$ \[$(tput sgr0)\]""#;

/// Directories prepended to `PATH`, checked in this order.
pub const PATH_FRAGMENTS: &[&str] = &["/usr/local/sbin", "/usr/local/bin", "$HOME/bin"];

/// Environment variables exported when their name appears nowhere.
const ENV_EXPORTS: &[(&str, &str)] = &[
    ("CLICOLOR", "1"),
    ("LSCOLORS", "ExFxCxDxBxegedabagacad"),
    ("PAGER", "less"),
];

/// Idempotent merge into `~/.bash_profile`.
///
/// Presence is detected per line with plain substring predicates; missing
/// lines are appended and nothing existing is rewritten.
#[derive(Debug, Clone)]
pub struct ShellProfileMerge {
    /// Path of the shell profile.
    pub path: PathBuf,
    /// Editor command for `EDITOR`, or `None` to leave `EDITOR` alone.
    pub editor: Option<String>,
}

impl ShellProfileMerge {
    /// Create a merge for the profile at `path`.
    #[must_use]
    pub const fn new(path: PathBuf, editor: Option<String>) -> Self {
        Self { path, editor }
    }

    /// Lines that would be appended to `profile`, in append order.
    #[must_use]
    pub fn missing_lines(&self, profile: &ShellProfile) -> Vec<String> {
        let mut lines = Vec::new();

        if !profile.any_line(|line| line.contains("PS1=")) {
            lines.push(PROMPT_EXPORT.to_string());
        }

        for fragment in PATH_FRAGMENTS {
            if !profile.any_line(|line| path_contains(line, fragment)) {
                lines.push(format!("export PATH={fragment}:$PATH"));
            }
        }

        let editor = self
            .editor
            .as_ref()
            .map(|editor| ("EDITOR", format!("\"{editor} --wait\"")));
        let exports = ENV_EXPORTS
            .iter()
            .map(|(name, value)| (*name, (*value).to_string()))
            .chain(editor);
        for (name, value) in exports {
            if !profile.any_line(|line| line.contains(name)) {
                lines.push(format!("export {name}={value}"));
            }
        }

        lines
    }

    fn load(&self) -> Result<ShellProfile> {
        Ok(ShellProfile::parse(&read_or_empty(&self.path)?))
    }
}

impl Applicable for ShellProfileMerge {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        let mut profile = self.load()?;
        let missing = self.missing_lines(&profile);
        if missing.is_empty() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        for line in missing {
            profile.append(line);
        }
        write_file(&self.path, &profile.to_bytes())?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ShellProfileMerge {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.path.exists() {
            return Ok(ResourceState::Missing);
        }
        let missing = self.missing_lines(&self.load()?);
        if missing.is_empty() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!("{} line(s) missing", missing.len()),
            })
        }
    }
}
