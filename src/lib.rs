#![forbid(unsafe_code)]
//! Semantic analysis for a C-family front end.
//!
//! Given an already-parsed syntax tree, this crate resolves declarations through a
//! scope-stacked symbol table, reconciles declarator groups (declaration vs.
//! definition vs. redeclaration, shared base specifiers, function declarators),
//! validates `break`/`continue` placement, and accumulates position-correct
//! diagnostics. Lexing, parsing, expression type checking, and code generation are
//! out of scope and live in the stages around this one.
//!
//! The entry point is [`analyze`]: one call per translation unit, returning the
//! resolved file-scope symbol table together with the full diagnostic report.
//! Units share no state, so a batch can analyze them in parallel with independent
//! calls.
//!
//! ## Panic Policy
//!
//! Production code uses `Result` or `Option` with `?` / `ok_or` / `map_err`;
//! `.unwrap()` and `.expect()` are acceptable in tests. A malformed input tree is
//! surfaced as [`analyzer::AnalyzeError`], never as a panic.

pub mod analyzer;
pub mod control;
pub mod reconcile;
pub mod symbols;
pub mod types;

pub use csema_syntax::ast;
pub use csema_syntax::diagnostics;

pub use analyzer::{Analysis, AnalyzeError, Analyzer, analyze};
pub use symbols::SymbolTable;
pub use types::TypeDescriptor;
