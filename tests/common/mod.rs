// Shared helpers for integration tests.
//
// Provides scripted stand-ins for every injectable seam (executor, prompter,
// installer source, application lookup) and a builder that wires them into a
// task `Context` rooted at a temporary home directory.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use macsetup_cli::config::Settings;
use macsetup_cli::elevation::ElevationSession;
use macsetup_cli::exec::{ExecResult, Executor};
use macsetup_cli::installer::{DownloadError, ScriptSource};
use macsetup_cli::logging::{Log, Logger};
use macsetup_cli::operations::FileSystemOps;
use macsetup_cli::platform::{Os, Platform};
use macsetup_cli::prompt::Prompter;
use macsetup_cli::resources::error::ResourceError;
use macsetup_cli::tasks::Context;

/// Executor that answers from a queue of exit codes and records every
/// command line.  An exhausted queue answers with exit code 127.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    codes: Mutex<VecDeque<i32>>,
    available: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new(codes: &[i32], available: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().copied().collect()),
            available: available.iter().map(ToString::to_string).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn next(&self, program: &str, args: &[&str]) -> ExecResult {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().expect("calls lock").push(line);
        let code = self
            .codes
            .lock()
            .expect("codes lock")
            .pop_front()
            .unwrap_or(127);
        ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: code == 0,
            code: Some(code),
        }
    }
}

impl Executor for ScriptedExecutor {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.next(program, args).check(program)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(self.next(program, args))
    }

    fn run_attached(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.next(program, args).check(program)
    }

    fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        _input: &[u8],
    ) -> anyhow::Result<ExecResult> {
        Ok(self.next(program, args))
    }

    fn which(&self, program: &str) -> bool {
        self.available.contains(program)
    }
}

/// Prompter that answers from a queue and remembers what it was asked.
#[derive(Debug, Default)]
pub struct QueuedPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl QueuedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(ToString::to_string).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().expect("asked lock").clone()
    }

    fn next(&self, prompt: &str) -> anyhow::Result<String> {
        self.asked.lock().expect("asked lock").push(prompt.to_string());
        self.answers
            .lock()
            .expect("answers lock")
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("unexpected prompt: {prompt}"))
    }
}

impl Prompter for QueuedPrompter {
    fn password(&self, prompt: &str) -> anyhow::Result<String> {
        self.next(prompt)
    }

    fn input(&self, prompt: &str) -> anyhow::Result<String> {
        self.next(prompt)
    }

    fn pause(&self, prompt: &str) -> anyhow::Result<()> {
        self.asked.lock().expect("asked lock").push(prompt.to_string());
        Ok(())
    }
}

/// Installer source that serves a fixed script without touching the network.
#[derive(Debug)]
pub struct StaticScript(pub &'static [u8]);

impl ScriptSource for StaticScript {
    fn origin(&self) -> String {
        "https://installer.test/install.sh".to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, DownloadError> {
        Ok(self.0.to_vec())
    }
}

/// Filesystem fake that reports only the listed paths as present.
#[derive(Debug, Default)]
pub struct FakeApplications(pub Vec<PathBuf>);

impl FileSystemOps for FakeApplications {
    fn exists(&self, path: &Path) -> bool {
        self.0.iter().any(|p| p == path)
    }
}

/// An isolated home directory plus the seams wired into its [`Context`].
pub struct TestHome {
    /// Temporary home directory, deleted on drop.
    pub home: tempfile::TempDir,
    pub executor: Arc<ScriptedExecutor>,
    pub prompter: Arc<QueuedPrompter>,
    pub log: Arc<Logger>,
}

impl TestHome {
    pub fn new(executor: ScriptedExecutor, answers: &[&str]) -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp home"),
            executor: Arc::new(executor),
            prompter: Arc::new(QueuedPrompter::new(answers)),
            log: Arc::new(Logger::new("integration")),
        }
    }

    pub fn path(&self) -> &Path {
        self.home.path()
    }

    pub fn write(&self, name: &str, content: &str) {
        std::fs::write(self.path().join(name), content).expect("write home file");
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path().join(name)).expect("read home file")
    }

    /// Build a task context for `os` over this home.
    pub fn context(&self, os: Os) -> Context {
        let prompter: Arc<dyn Prompter> = Arc::clone(&self.prompter) as Arc<dyn Prompter>;
        Context {
            settings: Arc::new(Settings::default()),
            platform: Arc::new(Platform::new(os)),
            log: Arc::clone(&self.log) as Arc<dyn Log>,
            dry_run: false,
            home: self.path().to_path_buf(),
            executor: Arc::clone(&self.executor) as Arc<dyn Executor>,
            fs_ops: Arc::new(FakeApplications::default()),
            elevation: Arc::new(ElevationSession::new(Arc::clone(&prompter))),
            prompter,
            script_source: Arc::new(StaticScript(b"echo installed\n")),
            editor: OnceLock::new(),
        }
    }
}

/// Exit code carried by the first failed command in `err`'s chain.
pub fn failed_exit_code(err: &anyhow::Error) -> Option<i32> {
    err.chain()
        .find_map(|cause| match cause.downcast_ref::<ResourceError>() {
            Some(ResourceError::ExecutionFailed { exit_code, .. }) => Some(*exit_code),
            _ => None,
        })
}
