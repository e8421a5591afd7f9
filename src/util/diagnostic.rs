//! Terminal rendering for resolution and compile failures.
//!
//! A [`Diagnostic`] is a headline plus optional notes, a repository path and
//! hints. Rendered, it reads:
//!
//! ```text
//! error: could not find library `servo`
//!   in /srv/propeller-c-lib
//!   note: directories matching `servo` without `servo.h`: libservo-old
//!   hint: Check that `servo.h` is spelled correctly
//! ```

use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    /// SGR code for the headline label.
    fn sgr(self) -> &'static str {
        match self {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    headline: String,
    path: Option<PathBuf>,
    notes: Vec<String>,
    hints: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, headline: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            headline: headline.into(),
            path: None,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn error(headline: impl Into<String>) -> Self {
        Self::new(Severity::Error, headline)
    }

    pub fn warning(headline: impl Into<String>) -> Self {
        Self::new(Severity::Warning, headline)
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// A concrete action that may fix the problem.
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// The file or directory the problem was found in.
    pub fn at(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Render for a terminal, with ANSI styling when `color` is set.
    pub fn render(&self, color: bool) -> String {
        let mut out = String::new();
        let paint = |sgr: &str, text: &str| {
            if color {
                format!("\x1b[{}m{}\x1b[0m", sgr, text)
            } else {
                text.to_string()
            }
        };

        let _ = writeln!(
            out,
            "{}: {}",
            paint(self.severity.sgr(), self.severity.label()),
            self.headline
        );
        if let Some(ref path) = self.path {
            let _ = writeln!(out, "  in {}", path.display());
        }
        for note in &self.notes {
            let _ = writeln!(out, "  {}: {}", paint("1", "note"), note);
        }
        for hint in &self.hints {
            let _ = writeln!(out, "  {}: {}", paint("1;36", "hint"), hint);
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// Write a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.render(color));
}
