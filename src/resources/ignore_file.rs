//! A single pattern line in a plain-text ignore file.
use anyhow::Result;
use std::path::PathBuf;

use super::fs::{read_or_empty, write_file};
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// Ensures `pattern` appears as a whole line in the file at `path`.
///
/// The line is appended only when no existing line (ignoring surrounding
/// whitespace) equals the pattern, so repeated runs do not accumulate
/// duplicates.
#[derive(Debug, Clone)]
pub struct IgnoreFileEntry {
    /// Ignore file path (e.g. `~/.gitignore_global`).
    pub path: PathBuf,
    /// Pattern line to ensure.
    pub pattern: String,
}

impl IgnoreFileEntry {
    /// Create a new ignore entry resource.
    #[must_use]
    pub const fn new(path: PathBuf, pattern: String) -> Self {
        Self { path, pattern }
    }

    fn is_present(&self, content: &[u8]) -> bool {
        content
            .split(|&b| b == b'\n')
            .any(|line| line.trim_ascii() == self.pattern.as_bytes())
    }
}

impl Applicable for IgnoreFileEntry {
    fn description(&self) -> String {
        format!("{} in {}", self.pattern, self.path.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let mut content = read_or_empty(&self.path)?;
        if self.is_present(&content) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        if !content.is_empty() && !content.ends_with(b"\n") {
            content.push(b'\n');
        }
        content.extend_from_slice(self.pattern.as_bytes());
        content.push(b'\n');
        write_file(&self.path, &content)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for IgnoreFileEntry {
    fn current_state(&self) -> Result<ResourceState> {
        if self.is_present(&read_or_empty(&self.path)?) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
