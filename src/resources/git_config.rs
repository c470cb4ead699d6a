//! Merge of identity and defaults into the global git config file.
use anyhow::Result;
use std::path::PathBuf;

use super::fs::{read_or_empty, write_file};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::config::ini::IniDocument;
use crate::prompt::Prompter;

/// Sections guaranteed to exist after the merge, in creation order.
pub const SECTIONS: &[&str] = &["user", "core", "push", "diff", "color"];

/// Identity keys under `[user]` and the prompt used to ask for each.
pub const IDENTITY_PROMPTS: &[(&str, &str)] = &[
    ("name", "Please enter your name"),
    ("email", "Please enter your email address"),
];

/// `(section, key, value)` defaults applied when the key is absent.
pub const DEFAULTS: &[(&str, &str, &str)] = &[
    ("core", "excludesfile", "~/.gitignore_global"),
    ("push", "default", "current"),
    ("diff", "renames", "true"),
    ("color", "ui", "true"),
];

/// Idempotent merge into `~/.gitconfig`.
///
/// Existing values always win: keys that are present are never rewritten,
/// and the operator is asked for `user.name` / `user.email` only when they
/// are missing.
#[derive(Debug)]
pub struct GitConfigMerge<'a> {
    /// Path of the git config file.
    pub path: PathBuf,
    prompter: &'a dyn Prompter,
}

impl<'a> GitConfigMerge<'a> {
    /// Create a merge for the config file at `path`.
    #[must_use]
    pub const fn new(path: PathBuf, prompter: &'a dyn Prompter) -> Self {
        Self { path, prompter }
    }

    /// Dotted names of every section or key the merge would add to `doc`.
    #[must_use]
    pub fn missing(doc: &IniDocument) -> Vec<String> {
        let sections = SECTIONS
            .iter()
            .filter(|s| !doc.has_section(s))
            .map(|s| format!("[{s}]"));
        let identity = IDENTITY_PROMPTS
            .iter()
            .filter(|(key, _)| !doc.has_key("user", key))
            .map(|(key, _)| format!("user.{key}"));
        let defaults = DEFAULTS
            .iter()
            .filter(|(section, key, _)| !doc.has_key(section, key))
            .map(|(section, key, _)| format!("{section}.{key}"));
        sections.chain(identity).chain(defaults).collect()
    }

    fn load(&self) -> Result<IniDocument> {
        Ok(IniDocument::parse(&read_or_empty(&self.path)?))
    }
}

impl Applicable for GitConfigMerge<'_> {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        let mut doc = self.load()?;

        for section in SECTIONS {
            doc.ensure_section(section);
        }
        for (key, prompt) in IDENTITY_PROMPTS {
            if !doc.has_key("user", key) {
                let answer = self.prompter.input(prompt)?;
                doc.set_if_absent("user", key, answer.trim());
            }
        }
        for (section, key, value) in DEFAULTS {
            doc.set_if_absent(section, key, value);
        }

        if !doc.is_modified() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        write_file(&self.path, &doc.to_bytes())?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for GitConfigMerge<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.path.exists() {
            return Ok(ResourceState::Missing);
        }
        let missing = Self::missing(&self.load()?);
        if missing.is_empty() {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!("missing {}", missing.join(", ")),
            })
        }
    }
}
