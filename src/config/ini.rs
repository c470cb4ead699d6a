//! Line-preserving model of git-style INI files.
//!
//! [`IniDocument`] keeps every input line as raw bytes so that comments,
//! blank lines, indentation, lines it does not understand and bytes that
//! are not UTF-8 survive a round trip unchanged.  Only lines added through
//! [`IniDocument::set_if_absent`] and [`IniDocument::ensure_section`] differ
//! from the input.

/// One physical line of the document.
///
/// Names and values are read from a lossy UTF-8 view of the line; only
/// `raw` is ever written back.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// `[name]` or `[name "sub"]`; `name` is the trimmed bracket contents.
    Header { name: String, raw: Vec<u8> },
    /// `key = value` or a bare boolean `key`.
    Entry {
        key: String,
        value: Option<String>,
        raw: Vec<u8>,
    },
    /// Comment, blank, or anything else; kept as-is.
    Other(Vec<u8>),
}

impl Line {
    fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            return Self::Other(raw.to_vec());
        }
        if let Some(name) = parse_header(trimmed) {
            return Self::Header {
                name,
                raw: raw.to_vec(),
            };
        }
        match parse_entry(trimmed) {
            Some((key, value)) => Self::Entry {
                key,
                value,
                raw: raw.to_vec(),
            },
            None => Self::Other(raw.to_vec()),
        }
    }

    fn raw(&self) -> &[u8] {
        match self {
            Self::Header { raw, .. } | Self::Entry { raw, .. } | Self::Other(raw) => raw,
        }
    }

    const fn is_header(&self) -> bool {
        matches!(self, Self::Header { .. })
    }
}

/// Ordered sections of key/value options, parsed leniently.
///
/// As in git, section and key names are ASCII case-insensitive while a
/// subsection (`[remote "origin"]`) must match exactly.
///
/// # Examples
///
/// ```
/// use macsetup_cli::config::ini::IniDocument;
///
/// let mut doc = IniDocument::parse(b"[User]\n\tname = Ada\n");
/// assert_eq!(doc.get("user", "NAME"), Some("Ada"));
/// assert!(!doc.set_if_absent("user", "name", "Grace"));
/// assert!(doc.set_if_absent("push", "default", "current"));
/// assert_eq!(doc.to_bytes(), b"[User]\n\tname = Ada\n[push]\n\tdefault = current\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    lines: Vec<Line>,
    trailing_newline: bool,
    modified: bool,
}

impl IniDocument {
    /// Parse `content`. Never fails; unrecognised lines are kept verbatim.
    #[must_use]
    pub fn parse(content: &[u8]) -> Self {
        if content.is_empty() {
            return Self::default();
        }
        let (body, trailing_newline) = content
            .strip_suffix(b"\n")
            .map_or((content, false), |body| (body, true));
        Self {
            lines: body.split(|&b| b == b'\n').map(Line::parse).collect(),
            trailing_newline,
            modified: false,
        }
    }

    /// Whether a section matching `name` exists.
    #[must_use]
    pub fn has_section(&self, name: &str) -> bool {
        self.lines
            .iter()
            .any(|line| matches!(line, Line::Header { name: n, .. } if same_section(n, name)))
    }

    /// Value of `key` in `section`. A bare key reads as `"true"`.
    ///
    /// When a section appears more than once, all occurrences are searched
    /// and the last assignment wins.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let mut current: Option<&str> = None;
        let mut found = None;
        for line in &self.lines {
            match line {
                Line::Header { name, .. } => current = Some(name.as_str()),
                Line::Entry { key: k, value, .. }
                    if current.is_some_and(|name| same_section(name, section))
                        && k.eq_ignore_ascii_case(key) =>
                {
                    found = Some(value.as_deref().unwrap_or("true"));
                }
                _ => {}
            }
        }
        found
    }

    /// Whether `key` is set in `section`.
    #[must_use]
    pub fn has_key(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Append a `[name]` header at the end of the document if missing.
    ///
    /// Returns `true` if the document changed.
    pub fn ensure_section(&mut self, name: &str) -> bool {
        if self.has_section(name) {
            return false;
        }
        let raw = format!("[{name}]").into_bytes();
        self.lines.push(Line::Header {
            name: name.to_string(),
            raw,
        });
        self.modified = true;
        true
    }

    /// Set `section.key = value` unless the key already exists.
    ///
    /// The entry is inserted after the last entry of the section's last
    /// occurrence, creating the section at the end of the file if needed.
    /// Existing lines are never touched.  Returns `true` if the document
    /// changed.
    pub fn set_if_absent(&mut self, section: &str, key: &str, value: &str) -> bool {
        if self.has_key(section, key) {
            return false;
        }
        self.ensure_section(section);

        let insert_at = self.section_insert_point(section);
        self.lines.insert(
            insert_at,
            Line::Entry {
                key: key.to_string(),
                value: Some(value.to_string()),
                raw: format!("\t{key} = {value}").into_bytes(),
            },
        );
        self.modified = true;
        true
    }

    /// Whether any line was added since parsing.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Render the document.  Added content always ends with a newline.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            out.extend_from_slice(line.raw());
        }
        if !self.lines.is_empty() && (self.trailing_newline || self.modified) {
            out.push(b'\n');
        }
        out
    }

    /// Index just after the header or last entry of the final occurrence of
    /// `section`.  Comments and blank lines trailing the section stay below
    /// the new entry.
    fn section_insert_point(&self, section: &str) -> usize {
        let header = self
            .lines
            .iter()
            .rposition(|line| matches!(line, Line::Header { name, .. } if same_section(name, section)));
        let Some(header) = header else {
            return self.lines.len();
        };
        let end = self
            .lines
            .iter()
            .skip(header + 1)
            .position(Line::is_header)
            .map_or(self.lines.len(), |offset| header + 1 + offset);
        self.lines
            .get(header..end)
            .and_then(|body| {
                body.iter()
                    .rposition(|line| !matches!(line, Line::Other(_)))
            })
            .map_or(end, |last| header + last + 1)
    }
}

/// Whether header contents `header` name the section `wanted`.
///
/// The section part compares ASCII case-insensitively; anything after it
/// (a quoted subsection) must match exactly.
fn same_section(header: &str, wanted: &str) -> bool {
    let (base, sub) = split_section(header);
    let (wanted_base, wanted_sub) = split_section(wanted);
    base.eq_ignore_ascii_case(wanted_base) && sub == wanted_sub
}

/// Split `remote "origin"` into `("remote", "\"origin\"")`.
fn split_section(name: &str) -> (&str, &str) {
    name.find(|c: char| c == '"' || c.is_whitespace())
        .map_or((name, ""), |at| {
            let (base, sub) = name.split_at(at);
            (base, sub.trim())
        })
}

/// Parse a `[name]` or `[name "subsection"]` header into its trimmed contents.
fn parse_header(line: &str) -> Option<String> {
    let inner = line.strip_prefix('[')?;
    let close = inner.rfind(']')?;
    let rest = inner.get(close + 1..)?.trim_start();
    if !(rest.is_empty() || rest.starts_with('#') || rest.starts_with(';')) {
        return None;
    }
    let name = inner.get(..close)?.trim();
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// Parse `key = value` or a bare `key`.
fn parse_entry(line: &str) -> Option<(String, Option<String>)> {
    let (key, value) = match line.split_once('=') {
        Some((key, value)) => (key.trim(), Some(value.trim().to_string())),
        None => (line, None),
    };
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    valid.then(|| (key.to_string(), value))
}
