#![forbid(unsafe_code)]
//! Shared syntax boundary for the csema analyzer: AST node types and diagnostics.
//!
//! This crate is intentionally "syntax-only": it defines the already-parsed tree the
//! analyzer consumes and the diagnostic records it produces, but performs no name
//! resolution or validation itself. Lexing and parsing live in the front end that
//! feeds this boundary and are not part of this workspace.
//!
//! ## Notes
//! - All nodes carry a [`ast::Span`] so diagnostics stay position-correct.
//! - Diagnostics are plain data ([`diagnostics::Diagnostic`]); rendering against
//!   source text is a separate step ([`diagnostics::format_diagnostic`]).

pub mod ast;
pub mod diagnostics;
