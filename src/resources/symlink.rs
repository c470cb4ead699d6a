//! Symlink resource.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::error::ResourceError;
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// A symlink resource that can be checked and applied.
///
/// An existing link to `source` is left alone.  Anything else already at
/// `target` (a regular file, or a link pointing elsewhere) belongs to the
/// operator and is never replaced.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// What the symlink points to.  It need not exist yet.
    pub source: PathBuf,
    /// Where the symlink is created.
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        match self.current_state()? {
            ResourceState::Correct => return Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Invalid { reason } | ResourceState::Incorrect { current: reason } => {
                return Err(ResourceError::InvalidState {
                    resource: self.target.display().to_string(),
                    reason,
                }
                .into());
            }
            ResourceState::Missing => {}
        }

        super::fs::ensure_parent_dir(&self.target)?;
        create_symlink(&self.source, &self.target)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for SymlinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        if self.target.symlink_metadata().is_err() {
            return Ok(ResourceState::Missing);
        }
        match std::fs::read_link(&self.target) {
            Ok(existing) if existing == self.source => Ok(ResourceState::Correct),
            Ok(existing) => Ok(ResourceState::Invalid {
                reason: format!("already links to {}", existing.display()),
            }),
            Err(_) => Ok(ResourceState::Invalid {
                reason: "path is occupied by a regular file or directory".to_string(),
            }),
        }
    }
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).with_context(|| {
            format!(
                "creating symlink {} -> {}",
                link.display(),
                target.display()
            )
        })
    }

    #[cfg(not(unix))]
    {
        anyhow::bail!(
            "cannot create {} -> {}: symlinks require a Unix host",
            link.display(),
            target.display()
        )
    }
}
