//! Line-oriented model of an interactive shell profile.
//!
//! Shell profiles have no fixed grammar, so [`ShellProfile`] never parses
//! them.  Callers ask whether any line satisfies a predicate and append
//! lines that are missing.  Lines are kept as raw bytes, so a profile that
//! is not valid UTF-8 is rewritten with its existing bytes untouched.
use std::borrow::Cow;

/// Ordered lines of a shell profile.
///
/// # Examples
///
/// ```
/// use macsetup_cli::config::profile::ShellProfile;
///
/// let mut profile = ShellProfile::parse(b"export PAGER=less\n");
/// assert!(profile.any_line(|line| line.contains("PAGER")));
/// profile.append("export CLICOLOR=1");
/// assert_eq!(profile.to_bytes(), b"export PAGER=less\n\nexport CLICOLOR=1\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellProfile {
    lines: Vec<Vec<u8>>,
    appended: usize,
}

impl ShellProfile {
    /// Split `content` into lines.  A single trailing newline is not a line.
    #[must_use]
    pub fn parse(content: &[u8]) -> Self {
        let body = content.strip_suffix(b"\n").unwrap_or(content);
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            body.split(|&b| b == b'\n').map(<[u8]>::to_vec).collect()
        };
        Self { lines, appended: 0 }
    }

    /// Whether any line satisfies `predicate`.
    ///
    /// The predicate sees a lossy UTF-8 view of each line; bytes that are
    /// not UTF-8 can only ever fail a match.
    pub fn any_line(&self, predicate: impl Fn(&str) -> bool) -> bool {
        self.lines
            .iter()
            .any(|line| predicate(&String::from_utf8_lossy(line)))
    }

    /// Append `line`.  The first append to a non-empty profile is separated
    /// from the existing content by a blank line.
    pub fn append(&mut self, line: impl Into<String>) {
        let needs_gap = self
            .lines
            .last()
            .is_some_and(|last| !last.trim_ascii().is_empty());
        if self.appended == 0 && needs_gap {
            self.lines.push(Vec::new());
        }
        self.lines.push(line.into().into_bytes());
        self.appended += 1;
    }

    /// Number of lines appended since parsing.
    #[must_use]
    pub const fn appended(&self) -> usize {
        self.appended
    }

    /// All lines in order, decoded lossily for display.
    pub fn lines(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.lines.iter().map(|line| String::from_utf8_lossy(line))
    }

    /// Lines joined by `\n`, ending with exactly one newline when non-empty.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for line in &self.lines {
            out.extend_from_slice(line);
            out.push(b'\n');
        }
        out
    }
}

/// Whether `line` assigns a `PATH` that contains `fragment`.
///
/// Matches any line with `PATH=` followed later on the same line by the
/// fragment, so `export PATH=/usr/local/bin:$PATH` covers `/usr/local/bin`.
#[must_use]
pub fn path_contains(line: &str, fragment: &str) -> bool {
    line.find("PATH=")
        .and_then(|idx| line.get(idx + "PATH=".len()..))
        .is_some_and(|rest| rest.contains(fragment))
}
