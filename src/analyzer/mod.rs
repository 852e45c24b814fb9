//! Semantic analysis driver.
//!
//! Walks an already-parsed [`Program`] depth-first in source order, opening and
//! closing scopes, routing declarators through reconciliation and jump statements
//! through the control-context tracker. Diagnostics accumulate; the walk always
//! runs to completion so every independent problem in a unit is reported in one
//! pass.
//!
//! ## Notes
//!
//! - One [`Analyzer`] per unit. Instances share nothing, so separate units can be
//!   analyzed in parallel by separate instances.
//! - The only hard failure is a malformed input tree that closes more scopes than
//!   it opened; that surfaces as [`AnalyzeError`] from [`analyze`] itself rather
//!   than as a diagnostic.
//!
//! ## Examples
//!
//! ```
//! use csema::analyze;
//! use csema::ast::Program;
//!
//! let analysis = analyze(&Program::default()).expect("well-formed tree");
//! assert!(!analysis.report.has_errors());
//! ```


use thiserror::Error;

use csema_syntax::ast::{
    DeclGroup, DeclaratorShape, Expr, ForInit, FunctionDef, Param, Program, Spanned, Stmt,
};
use csema_syntax::diagnostics::{DiagnosticReport, errors};

use crate::control::ControlContext;
use crate::reconcile::{self, Action, Candidate};
use crate::symbols::{DeclState, Declaration, ScopeKind, SymbolTable};
use crate::types::{self, TypeDescriptor};

/// Non-recoverable analysis failure: the input tree violated a structural
/// invariant. Distinct from user-facing diagnostics, which never abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    #[error("scope stack underflow: left more blocks than were entered")]
    ScopeUnderflow,
}

/// Result of analyzing one unit: the persisting file-scope symbol table and the
/// full diagnostic list in source order.
#[derive(Debug)]
pub struct Analysis {
    pub symbols: SymbolTable,
    pub report: DiagnosticReport,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        self.report.has_errors()
    }
}

/// Analyzer state for a single unit.
pub struct Analyzer {
    symbols: SymbolTable,
    control: ControlContext,
    report: DiagnosticReport,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            control: ControlContext::new(),
            report: DiagnosticReport::new(),
        }
    }

    /// Walk the whole unit and produce the final [`Analysis`].
    pub fn analyze(mut self, program: &Program) -> Result<Analysis, AnalyzeError> {
        for item in &program.items {
            self.visit_stmt(item)?;
        }
        tracing::debug!(
            globals = self.symbols.file_scope().len(),
            diagnostics = self.report.len(),
            "analysis complete"
        );
        Ok(Analysis {
            symbols: self.symbols,
            report: self.report,
        })
    }

    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) -> Result<(), AnalyzeError> {
        match &stmt.node {
            Stmt::Declaration(group) => self.declare_group(group),
            Stmt::Function(func) => self.declare_function(func)?,
            Stmt::Block(stmts) => self.visit_block(stmts)?,
            Stmt::While(while_stmt) => {
                self.visit_expr(&while_stmt.cond);
                self.control.enter_loop();
                self.visit_stmt(&while_stmt.body)?;
                self.control.exit_loop();
            }
            Stmt::DoWhile(do_stmt) => {
                self.control.enter_loop();
                self.visit_stmt(&do_stmt.body)?;
                self.control.exit_loop();
                self.visit_expr(&do_stmt.cond);
            }
            Stmt::For(for_stmt) => {
                // The init clause gets its own scope wrapped around the body.
                self.symbols.enter_scope(ScopeKind::Block);
                match &for_stmt.init {
                    Some(ForInit::Declaration(group)) => self.declare_group(group),
                    Some(ForInit::Expr(expr)) => self.visit_expr(expr),
                    None => {}
                }
                if let Some(cond) = &for_stmt.cond {
                    self.visit_expr(cond);
                }
                if let Some(step) = &for_stmt.step {
                    self.visit_expr(step);
                }
                self.control.enter_loop();
                self.visit_stmt(&for_stmt.body)?;
                self.control.exit_loop();
                self.leave_scope()?;
            }
            Stmt::Switch(switch_stmt) => {
                self.visit_expr(&switch_stmt.cond);
                self.control.enter_switch();
                self.visit_stmt(&switch_stmt.body)?;
                self.control.exit_switch();
            }
            Stmt::Break => {
                if !self.control.in_breakable() {
                    self.report.push(errors::misplaced_break(stmt.span));
                }
            }
            Stmt::Continue => {
                if !self.control.in_loop() {
                    self.report.push(errors::misplaced_continue(stmt.span));
                }
            }
            Stmt::Expr(expr) => self.visit_expr(expr),
            Stmt::Empty => {}
        }
        Ok(())
    }

    fn visit_block(&mut self, stmts: &[Spanned<Stmt>]) -> Result<(), AnalyzeError> {
        self.symbols.enter_scope(ScopeKind::Block);
        for stmt in stmts {
            self.visit_stmt(stmt)?;
        }
        self.leave_scope()
    }

    /// One base specifier, several declarators, each reconciled independently
    /// against the same resolved type.
    fn declare_group(&mut self, group: &DeclGroup) {
        let written = &group.specifiers.node;
        if !types::specifiers_valid(written) {
            self.report
                .push(errors::invalid_type(&types::spell(written), group.specifiers.span));
        }
        let ty = TypeDescriptor::resolve(written);
        let spelling = types::spell(written);

        for declarator in &group.declarators {
            self.declare_one(Candidate {
                name: &declarator.node.name,
                ty: &ty,
                spelling: &spelling,
                shape: declarator.node.shape,
                has_init: declarator.node.init.is_some(),
                has_body: false,
                span: declarator.span,
            });
            if let Some(init) = &declarator.node.init {
                self.visit_expr(init);
            }
        }
    }

    fn declare_one(&mut self, candidate: Candidate<'_>) {
        let at_file_scope = self.symbols.at_file_scope();
        let outcome = reconcile::reconcile(
            self.symbols.lookup_local(candidate.name),
            &candidate,
            at_file_scope,
        );
        if let Some(diagnostic) = outcome.diagnostic {
            self.report.push(diagnostic);
        }
        match outcome.action {
            Action::Insert(state) => self.symbols.insert(Declaration {
                name: candidate.name.to_string(),
                ty: candidate.ty.clone(),
                shape: candidate.shape,
                state,
                span: candidate.span,
                used: false,
            }),
            Action::Promote => self.symbols.promote(candidate.name),
            Action::Keep => {}
        }
    }

    fn declare_function(&mut self, func: &FunctionDef) -> Result<(), AnalyzeError> {
        let written = &func.specifiers.node;
        if !types::specifiers_valid(written) {
            self.report
                .push(errors::invalid_type(&types::spell(written), func.specifiers.span));
        }
        let ty = TypeDescriptor::resolve(written);
        let spelling = types::spell(written);

        self.declare_one(Candidate {
            name: &func.name.node,
            ty: &ty,
            spelling: &spelling,
            shape: DeclaratorShape::Function,
            has_init: false,
            has_body: true,
            span: func.name.span,
        });

        // Parameters live in their own scope, opened before the body's block
        // scope. Jumps cannot escape a function, so the control context is reset
        // across the body.
        let saved = std::mem::take(&mut self.control);
        self.symbols.enter_scope(ScopeKind::Function);
        self.declare_params(&func.params);
        self.visit_block(&func.body)?;
        self.leave_scope()?;
        self.control = saved;
        Ok(())
    }

    fn declare_params(&mut self, params: &[Spanned<Param>]) {
        for param in params {
            if !types::specifiers_valid(&param.node.specifiers) {
                self.report.push(errors::invalid_type(
                    &types::spell(&param.node.specifiers),
                    param.span,
                ));
            }
            let Some(name) = &param.node.name else {
                continue;
            };
            // Parameter lists allow no restatement at all, matching type or not.
            if self.symbols.lookup_local(name).is_some() {
                self.report.push(errors::redeclaration(name, param.span));
                continue;
            }
            self.symbols.insert(Declaration {
                name: name.clone(),
                ty: TypeDescriptor::resolve(&param.node.specifiers),
                shape: DeclaratorShape::Variable,
                state: DeclState::Defined,
                span: param.span,
                used: false,
            });
        }
    }

    /// Reference resolution. Unknown identifiers are the expression checker's
    /// concern, not ours, so they pass through silently.
    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        match &expr.node {
            Expr::Int(_) | Expr::Float(_) => {}
            Expr::Ident(name) => {
                self.symbols.mark_used(name);
            }
            Expr::Binary { lhs, rhs, .. } => {
                self.visit_expr(lhs);
                self.visit_expr(rhs);
            }
        }
    }

    fn leave_scope(&mut self) -> Result<(), AnalyzeError> {
        self.symbols
            .exit_scope()
            .map(drop)
            .ok_or(AnalyzeError::ScopeUnderflow)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience entry point: analyze one unit with a fresh [`Analyzer`].
#[tracing::instrument(skip_all, fields(item_count = program.items.len()))]
pub fn analyze(program: &Program) -> Result<Analysis, AnalyzeError> {
    Analyzer::new().analyze(program)
}
