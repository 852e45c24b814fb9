//! Diagnostics produced by semantic analysis.
//!
//! Diagnostics are immutable records collected into an ordered [`DiagnosticReport`];
//! analysis never stops at the first problem, so a single pass reports every issue
//! in a unit. The [`errors`] catalog owns the message spellings.

use thiserror::Error;

use crate::ast::Span;

/// A single diagnostic with location information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{severity}: {message}")]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: String, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            span,
            message,
        }
    }

    pub fn warning(kind: DiagnosticKind, message: String, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            span,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// What went wrong, as a closed vocabulary usable by tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Same identifier, incompatible base types (or declarator shapes) in one scope.
    ConflictingType,
    /// A name restated where no restatement is allowed (block locals, parameter lists).
    Redeclaration,
    /// A second defining declarator for an already-defined identifier.
    Redefinition,
    /// A function-shaped declarator carrying an initializer.
    InvalidInitializer,
    /// A base specifier combination that does not name a type.
    InvalidType,
    /// `continue` outside any loop.
    MisplacedContinue,
    /// `break` outside any loop or switch.
    MisplacedBreak,
}

/// Ordered, append-only collection of diagnostics in source-encounter order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiagnosticReport {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Whether any collected diagnostic is an error (warnings do not count).
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl<'a> IntoIterator for &'a DiagnosticReport {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

/// Render a diagnostic against its source with a caret under the offending range.
pub fn format_diagnostic(file_name: &str, source: &str, diagnostic: &Diagnostic) -> String {
    let (line_num, col_num, line_text) = line_info(source, diagnostic.span.start);

    let width = line_num.to_string().len();
    let underline = diagnostic
        .span
        .end
        .saturating_sub(diagnostic.span.start)
        .min(line_text.len().saturating_sub(col_num - 1))
        .max(1);

    let mut out = String::new();
    out.push_str(&format!("{diagnostic}\n"));
    out.push_str(&format!(
        "  --> {file_name}:{line_num}:{col_num}\n",
    ));
    out.push_str(&format!("  {:>width$} |\n", ""));
    out.push_str(&format!("  {line_num:>width$} | {line_text}\n"));
    out.push_str(&format!(
        "  {:>width$} | {}{}\n",
        "",
        " ".repeat(col_num - 1),
        "^".repeat(underline),
    ));
    out
}

/// Get line number, column number, and line text for a byte offset.
fn line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    (line_num, offset - line_start + 1, &source[line_start..line_end])
}

// ============================================================================
// Error catalog: message spellings for everything the analyzer reports
// ============================================================================

pub mod errors {
    use super::*;

    pub fn conflicting_types(name: &str, spelled: &str, span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::ConflictingType,
            format!("conflicting types for '{name}'; have '{spelled}'"),
            span,
        )
    }

    pub fn different_kind(name: &str, span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::ConflictingType,
            format!("'{name}' redeclared as different kind of symbol"),
            span,
        )
    }

    pub fn redeclaration(name: &str, span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::Redeclaration,
            format!("redeclaration of '{name}'"),
            span,
        )
    }

    pub fn redefinition(name: &str, span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::Redefinition,
            format!("redefinition of '{name}'"),
            span,
        )
    }

    pub fn function_initialized(name: &str, span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::InvalidInitializer,
            format!("function '{name}' is initialized like a variable"),
            span,
        )
    }

    pub fn invalid_type(spelled: &str, span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::InvalidType,
            format!("invalid combination of type specifiers: '{spelled}'"),
            span,
        )
    }

    pub fn misplaced_continue(span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::MisplacedContinue,
            "continue statement not within a loop".to_string(),
            span,
        )
    }

    pub fn misplaced_break(span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::MisplacedBreak,
            "break statement not within loop or switch".to_string(),
            span,
        )
    }
}
