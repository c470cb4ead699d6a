//! Operator prompts on the controlling terminal.
use anyhow::{Context as _, Result};
use dialoguer::{Input, Password};

/// Interactive operator input.
///
/// Production code uses [`TerminalPrompter`]; tests substitute a scripted
/// implementation so merges that ask for identity fields stay deterministic.
pub trait Prompter: Send + Sync + std::fmt::Debug {
    /// Read a secret without echoing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn password(&self, prompt: &str) -> Result<String>;

    /// Read a line of visible text.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn input(&self, prompt: &str) -> Result<String>;

    /// Block until the operator presses enter.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn pause(&self, prompt: &str) -> Result<()>;
}

/// [`Prompter`] backed by `dialoguer` on stdin/stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn password(&self, prompt: &str) -> Result<String> {
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .context("reading password")
    }

    fn input(&self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("reading answer to '{prompt}'"))
    }

    fn pause(&self, prompt: &str) -> Result<()> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("waiting for confirmation")?;
        Ok(())
    }
}
