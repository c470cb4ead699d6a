use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use anyhow::Result;

use crate::config::Settings;
use crate::editor::EditorCommand;
use crate::elevation::ElevationSession;
use crate::exec::{Executor, SystemExecutor};
use crate::installer::{HttpsScriptSource, ScriptSource};
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::platform::Platform;
use crate::prompt::{Prompter, TerminalPrompter};

/// Shared context for task execution.
pub struct Context {
    /// Settings loaded from `settings.toml` (or the built-in defaults).
    pub settings: Arc<Settings>,
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Home directory whose dotfiles are merged.
    pub home: PathBuf,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Operator prompts.
    pub prompter: Arc<dyn Prompter>,
    /// Administrator credential, acquired on first elevated command.
    pub elevation: Arc<ElevationSession>,
    /// Where the Homebrew installer script comes from.
    pub script_source: Arc<dyn ScriptSource>,
    /// Editor chosen by `ResolveEditor`, read by `ConfigureShell`.
    pub editor: OnceLock<EditorCommand>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("home", &self.home)
            .field("executor", &"<dyn Executor>")
            .field("fs_ops", &"<dyn FileSystemOps>")
            .field("prompter", &"<dyn Prompter>")
            .field("elevation", &self.elevation)
            .field("script_source", &self.script_source.origin())
            .field("editor", &self.editor.get())
            .finish()
    }
}

impl Context {
    /// Creates a new context wired to the real system.
    ///
    /// `home` overrides the operator's home directory; when `None` it is
    /// taken from `HOME`.
    ///
    /// # Errors
    ///
    /// Returns an error if no home override is given and the HOME
    /// environment variable is not set.
    pub fn new(
        settings: Settings,
        platform: Platform,
        log: Arc<dyn Log>,
        dry_run: bool,
        home: Option<PathBuf>,
    ) -> Result<Self> {
        let home = match home {
            Some(home) => home,
            None => std::env::var_os("HOME")
                .filter(|h| !h.is_empty())
                .map(PathBuf::from)
                .ok_or_else(|| anyhow::anyhow!("HOME environment variable is not set"))?,
        };

        let prompter: Arc<dyn Prompter> = Arc::new(TerminalPrompter);
        let script_source = Arc::new(HttpsScriptSource::from_settings(&settings.installer));

        Ok(Self {
            settings: Arc::new(settings),
            platform: Arc::new(platform),
            log,
            dry_run,
            home,
            executor: Arc::new(SystemExecutor),
            fs_ops: Arc::new(SystemFileSystemOps),
            elevation: Arc::new(ElevationSession::new(Arc::clone(&prompter))),
            prompter,
            script_source,
            editor: OnceLock::new(),
        })
    }

    /// `~/.gitconfig`.
    #[must_use]
    pub fn gitconfig_path(&self) -> PathBuf {
        self.home.join(".gitconfig")
    }

    /// `~/.gitignore_global`.
    #[must_use]
    pub fn global_ignore_path(&self) -> PathBuf {
        self.home.join(".gitignore_global")
    }

    /// `~/.bash_profile`.
    #[must_use]
    pub fn bash_profile_path(&self) -> PathBuf {
        self.home.join(".bash_profile")
    }

    /// `~/bin`, where editor command-line links are placed.
    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        self.home.join("bin")
    }
}
