//! Line-tagged semantic diagnostics.
//!
//! Analysis never stops at the first problem: every check runs to
//! completion and appends to a shared [`Diagnostics`] sink, so one pass
//! over a document reports everything wrong with it. Rendered output is
//! part of the compiler's contract: one `error: <line>: <message>` line
//! per diagnostic, in discovery order, followed by a count trailer.

use std::fmt;

/// A single semantic error, tagged with its 1-based source line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}: {}", self.line, self.message)
    }
}

/// Accumulates diagnostics during analysis.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error at the given source line.
    pub fn error(&mut self, line: u32, message: impl Into<String>) {
        self.errors.push(Diagnostic {
            line,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter()
    }

    /// Converts the sink into an error value, or `None` if nothing was
    /// reported.
    pub fn into_result(self) -> Result<(), SemanticErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(SemanticErrors {
                errors: self.errors,
            })
        }
    }
}

/// The full set of semantic errors found in one document.
///
/// The `Display` form is the compiler's user-facing error report,
/// terminated by a `N error(s)` count trailer.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
#[error("{}", render(.errors))]
pub struct SemanticErrors {
    errors: Vec<Diagnostic>,
}

impl SemanticErrors {
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }
}

fn render(errors: &[Diagnostic]) -> String {
    let mut out = String::new();
    for error in errors {
        out.push_str(&error.to_string());
        out.push('\n');
    }
    let noun = if errors.len() == 1 { "error" } else { "errors" };
    out.push_str(&format!("{} {noun}\n", errors.len()));
    out
}
