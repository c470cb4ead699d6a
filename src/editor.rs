//! Text editor detection and installation.
//!
//! [`resolve_editor`] always ends with a definite editor command or a
//! definite error.  Precedence: an editor already on `PATH`, then an
//! installed Sublime Text bundle, then an installed Atom bundle, and only
//! then a fresh Atom install through Homebrew Cask.
use anyhow::{Context as _, Result};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::resources::package::require_brew;
use crate::resources::symlink::SymlinkResource;
use crate::resources::{Applicable as _, Resource as _, ResourceState};
use crate::tasks::Context;

/// Sublime Text bundles, newest naming last.
const SUBLIME_APPS: &[&str] = &[
    "/Applications/Sublime Text.app",
    "/Applications/Sublime Text 2.app",
    "/Applications/Sublime Text 3.app",
];

/// Command-line helper inside a Sublime Text bundle.
const SUBLIME_CLI: &str = "Contents/SharedSupport/bin/subl";

const ATOM_APP: &str = "/Applications/Atom.app";

/// Command-line helper inside the Atom bundle.
const ATOM_CLI: &str = "Contents/Resources/app/atom.sh";

/// `brew` invocations that install Atom, in order.
const CASK_INSTALL: &[&[&str]] = &[
    &["tap", "caskroom/cask"],
    &["install", "caskroom/cask/brew-cask"],
    &["cask", "install", "atom"],
];

/// An editor the shell profile can export as `EDITOR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    /// Sublime Text (`subl`).
    Sublime,
    /// Atom (`atom`).
    Atom,
}

impl EditorCommand {
    /// Preference order when probing `PATH`.
    pub const ALL: [Self; 2] = [Self::Sublime, Self::Atom];

    /// Executable name on `PATH`.
    #[must_use]
    pub const fn command(self) -> &'static str {
        match self {
            Self::Sublime => "subl",
            Self::Atom => "atom",
        }
    }
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Find or install an editor and return its command.
///
/// Touches the filesystem only to create `~/bin` and one symlink into an
/// application bundle.  A path already occupied by something else is
/// reported and left alone; the editor is still returned.
///
/// # Errors
///
/// Returns an error if the link cannot be created, or if an Atom install is
/// required and `brew` is unavailable or one of its commands fails (the
/// command's exit code is preserved).
pub fn resolve_editor(ctx: &Context) -> Result<EditorCommand> {
    if let Some(editor) = EditorCommand::ALL
        .into_iter()
        .find(|e| ctx.executor.which(e.command()))
    {
        ctx.log.info(&format!("{editor} found in PATH"));
        return Ok(editor);
    }

    if let Some(app) = SUBLIME_APPS
        .iter()
        .map(Path::new)
        .find(|app| ctx.fs_ops.exists(app))
    {
        ctx.log.info(&format!("found {}", app.display()));
        link_cli(ctx, &app.join(SUBLIME_CLI), EditorCommand::Sublime)?;
        return Ok(EditorCommand::Sublime);
    }

    let atom = Path::new(ATOM_APP);
    if ctx.fs_ops.exists(atom) {
        ctx.log.info(&format!("found {}", atom.display()));
        link_cli(ctx, &atom.join(ATOM_CLI), EditorCommand::Atom)?;
        return Ok(EditorCommand::Atom);
    }

    install_atom(ctx)?;
    Ok(EditorCommand::Atom)
}

/// Link `~/bin/<command>` to the helper script inside an app bundle.
fn link_cli(ctx: &Context, helper: &Path, editor: EditorCommand) -> Result<()> {
    let link = SymlinkResource::new(helper.to_path_buf(), link_path(ctx, editor));
    let desc = link.description();
    match link.current_state()? {
        ResourceState::Correct => ctx.log.debug(&format!("ok: {desc}")),
        ResourceState::Invalid { reason } | ResourceState::Incorrect { current: reason } => {
            ctx.log
                .warn(&format!("not linking {}: {reason}", link.target.display()));
        }
        ResourceState::Missing if ctx.dry_run => ctx.log.dry_run(&format!("would link: {desc}")),
        ResourceState::Missing => {
            link.apply()?;
            ctx.log.info(&format!("linked: {desc}"));
        }
    }
    Ok(())
}

fn link_path(ctx: &Context, editor: EditorCommand) -> PathBuf {
    ctx.bin_dir().join(editor.command())
}

fn install_atom(ctx: &Context) -> Result<()> {
    if ctx.dry_run {
        for args in CASK_INSTALL {
            ctx.log.dry_run(&format!("would run: brew {}", args.join(" ")));
        }
        return Ok(());
    }

    let brew = require_brew(&*ctx.executor, &*ctx.fs_ops, "install Atom")?;

    ctx.log.info("no editor found, installing Atom");
    for args in CASK_INSTALL {
        ctx.executor
            .run_attached(&brew, args)
            .with_context(|| format!("{brew} {}", args.join(" ")))?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::exit_code_for;
    use crate::operations::MockFileSystemOps;
    use crate::platform::Os;
    use crate::prompt::test_helpers::ScriptedPrompter;
    use crate::resources::error::ResourceError;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::context_with;
    use std::sync::Arc;

    fn context(
        home: &Path,
        executor: MockExecutor,
        fs: MockFileSystemOps,
    ) -> (Context, Arc<MockExecutor>) {
        let executor = Arc::new(executor);
        let (mut ctx, _log) = context_with(
            Os::MacOs,
            home,
            Arc::clone(&executor) as _,
            Arc::new(ScriptedPrompter::new(&[])),
        );
        ctx.fs_ops = Arc::new(fs);
        (ctx, executor)
    }

    #[test]
    fn editor_on_path_wins_without_side_effects() {
        let home = tempfile::tempdir().unwrap();
        let (ctx, executor) = context(
            home.path(),
            MockExecutor::default().with_available(&["atom"]),
            MockFileSystemOps::new().with_existing("/Applications/Sublime Text.app"),
        );

        assert_eq!(resolve_editor(&ctx).unwrap(), EditorCommand::Atom);
        assert_eq!(executor.call_count(), 0);
        assert!(!home.path().join("bin").exists());
    }

    #[test]
    fn subl_preferred_over_atom_on_path() {
        let home = tempfile::tempdir().unwrap();
        let (ctx, _) = context(
            home.path(),
            MockExecutor::default().with_available(&["atom", "subl"]),
            MockFileSystemOps::new(),
        );
        assert_eq!(resolve_editor(&ctx).unwrap(), EditorCommand::Sublime);
    }

    #[cfg(unix)]
    #[test]
    fn first_sublime_bundle_is_linked() {
        let home = tempfile::tempdir().unwrap();
        let (ctx, executor) = context(
            home.path(),
            MockExecutor::default(),
            MockFileSystemOps::new()
                .with_existing("/Applications/Sublime Text 2.app")
                .with_existing("/Applications/Sublime Text 3.app")
                .with_existing(ATOM_APP),
        );

        assert_eq!(resolve_editor(&ctx).unwrap(), EditorCommand::Sublime);
        let target = std::fs::read_link(home.path().join("bin/subl")).unwrap();
        assert_eq!(
            target,
            PathBuf::from("/Applications/Sublime Text 2.app/Contents/SharedSupport/bin/subl")
        );
        assert_eq!(executor.call_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn atom_bundle_is_linked() {
        let home = tempfile::tempdir().unwrap();
        let (ctx, _) = context(
            home.path(),
            MockExecutor::default(),
            MockFileSystemOps::new().with_existing(ATOM_APP),
        );

        assert_eq!(resolve_editor(&ctx).unwrap(), EditorCommand::Atom);
        let target = std::fs::read_link(home.path().join("bin/atom")).unwrap();
        assert_eq!(
            target,
            PathBuf::from("/Applications/Atom.app/Contents/Resources/app/atom.sh")
        );
    }

    #[cfg(unix)]
    #[test]
    fn existing_correct_link_is_kept() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join("bin")).unwrap();
        let helper = PathBuf::from(ATOM_APP).join(ATOM_CLI);
        std::os::unix::fs::symlink(&helper, home.path().join("bin/atom")).unwrap();
        let (ctx, _) = context(
            home.path(),
            MockExecutor::default(),
            MockFileSystemOps::new().with_existing(ATOM_APP),
        );

        assert_eq!(resolve_editor(&ctx).unwrap(), EditorCommand::Atom);
        assert_eq!(std::fs::read_link(home.path().join("bin/atom")).unwrap(), helper);
    }

    #[test]
    fn occupied_link_path_is_left_alone() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join("bin")).unwrap();
        std::fs::write(home.path().join("bin/subl"), "#!/bin/sh\n").unwrap();
        let (ctx, _) = context(
            home.path(),
            MockExecutor::default(),
            MockFileSystemOps::new().with_existing("/Applications/Sublime Text.app"),
        );

        assert_eq!(resolve_editor(&ctx).unwrap(), EditorCommand::Sublime);
        assert_eq!(
            std::fs::read_to_string(home.path().join("bin/subl")).unwrap(),
            "#!/bin/sh\n"
        );
    }

    #[test]
    fn atom_installed_through_cask_when_nothing_found() {
        let home = tempfile::tempdir().unwrap();
        let (ctx, executor) = context(
            home.path(),
            MockExecutor::with_codes(vec![(true, 0), (true, 0), (true, 0)])
                .with_available(&["brew"]),
            MockFileSystemOps::new(),
        );

        assert_eq!(resolve_editor(&ctx).unwrap(), EditorCommand::Atom);
        assert_eq!(
            executor.command_lines(),
            [
                "brew tap caskroom/cask",
                "brew install caskroom/cask/brew-cask",
                "brew cask install atom",
            ]
        );
    }

    #[test]
    fn cask_failure_stops_with_exit_code() {
        let home = tempfile::tempdir().unwrap();
        let (ctx, executor) = context(
            home.path(),
            MockExecutor::with_codes(vec![(true, 0), (false, 6)]).with_available(&["brew"]),
            MockFileSystemOps::new(),
        );

        let err = resolve_editor(&ctx).unwrap_err();
        assert_eq!(exit_code_for(&err), 6);
        assert_eq!(executor.call_count(), 2);
    }

    #[test]
    fn cask_install_uses_brew_outside_path() {
        let home = tempfile::tempdir().unwrap();
        let (ctx, executor) = context(
            home.path(),
            MockExecutor::with_codes(vec![(true, 0), (true, 0), (true, 0)]),
            MockFileSystemOps::new().with_existing("/usr/local/bin/brew"),
        );

        assert_eq!(resolve_editor(&ctx).unwrap(), EditorCommand::Atom);
        assert_eq!(
            executor.command_lines()[2],
            "/usr/local/bin/brew cask install atom"
        );
    }

    #[test]
    fn missing_brew_is_a_definite_error() {
        let home = tempfile::tempdir().unwrap();
        let (ctx, executor) = context(home.path(), MockExecutor::default(), MockFileSystemOps::new());

        let err = resolve_editor(&ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResourceError>(),
            Some(ResourceError::NotFound { .. })
        ));
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn dry_run_links_and_installs_nothing() {
        let home = tempfile::tempdir().unwrap();
        let (mut ctx, executor) = context(
            home.path(),
            MockExecutor::default(),
            MockFileSystemOps::new().with_existing(ATOM_APP),
        );
        ctx.dry_run = true;
        assert_eq!(resolve_editor(&ctx).unwrap(), EditorCommand::Atom);
        assert!(!home.path().join("bin").exists());

        ctx.fs_ops = Arc::new(MockFileSystemOps::new());
        assert_eq!(resolve_editor(&ctx).unwrap(), EditorCommand::Atom);
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn display_is_the_command() {
        assert_eq!(EditorCommand::Sublime.to_string(), "subl");
        assert_eq!(EditorCommand::Atom.to_string(), "atom");
    }
}
