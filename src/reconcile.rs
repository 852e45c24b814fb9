//! Declarator reconciliation.
//!
//! Each declarator in a group is judged independently against whatever the
//! innermost scope already holds for its name. The outcome is an action for the
//! symbol table plus at most one diagnostic; nothing here aborts the walk, so a
//! conflicting declarator still leaves a best-effort record behind and later
//! statements keep getting checked.
//!
//! File scope and block scope disagree on restatement: at file scope a compatible
//! redeclaration is a legal tentative declaration, while block locals may not be
//! restated at all.

use csema_syntax::ast::{DeclaratorShape, Span};
use csema_syntax::diagnostics::{Diagnostic, errors};

use crate::symbols::{DeclState, Declaration};
use crate::types::TypeDescriptor;

/// One declarator, flattened for reconciliation.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub name: &'a str,
    pub ty: &'a TypeDescriptor,
    /// The base type as written, for messages.
    pub spelling: &'a str,
    pub shape: DeclaratorShape,
    pub has_init: bool,
    pub has_body: bool,
    pub span: Span,
}

impl Candidate<'_> {
    /// Whether this declarator defines storage (initializer) or a body.
    pub fn defines(&self) -> bool {
        self.has_init || self.has_body
    }
}

/// What the symbol table should do with the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Fresh name in this scope: insert with the given state.
    Insert(DeclState),
    /// Leave the existing record untouched.
    Keep,
    /// Existing record moves from declared to defined.
    Promote,
}

/// Reconciliation outcome: a table action and an optional diagnostic.
#[derive(Debug)]
pub struct Reconciled {
    pub action: Action,
    pub diagnostic: Option<Diagnostic>,
}

impl Reconciled {
    fn ok(action: Action) -> Self {
        Self {
            action,
            diagnostic: None,
        }
    }

    fn keep_with(diagnostic: Diagnostic) -> Self {
        Self {
            action: Action::Keep,
            diagnostic: Some(diagnostic),
        }
    }
}

/// Decide the fate of a candidate declarator against the innermost scope.
pub fn reconcile(
    existing: Option<&Declaration>,
    candidate: &Candidate<'_>,
    at_file_scope: bool,
) -> Reconciled {
    // A function declarator can never carry an initializer, whatever came before.
    if candidate.shape == DeclaratorShape::Function && candidate.has_init {
        let action = match existing {
            Some(_) => Action::Keep,
            None => Action::Insert(DeclState::Declared),
        };
        return Reconciled {
            action,
            diagnostic: Some(errors::function_initialized(candidate.name, candidate.span)),
        };
    }

    let Some(prev) = existing else {
        let state = if candidate.defines() {
            DeclState::Defined
        } else {
            DeclState::Declared
        };
        return Reconciled::ok(Action::Insert(state));
    };

    if prev.shape != candidate.shape {
        return Reconciled::keep_with(errors::different_kind(candidate.name, candidate.span));
    }

    if at_file_scope {
        if prev.ty != *candidate.ty {
            return Reconciled::keep_with(errors::conflicting_types(
                candidate.name,
                candidate.spelling,
                candidate.span,
            ));
        }
        if candidate.defines() {
            return match prev.state {
                DeclState::Defined => {
                    Reconciled::keep_with(errors::redefinition(candidate.name, candidate.span))
                }
                DeclState::Declared => Reconciled::ok(Action::Promote),
            };
        }
        // Compatible tentative redeclaration, before or after a definition.
        Reconciled::ok(Action::Keep)
    } else if candidate.defines() {
        Reconciled::keep_with(errors::redefinition(candidate.name, candidate.span))
    } else {
        Reconciled::keep_with(errors::redeclaration(candidate.name, candidate.span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csema_syntax::ast::TypeKeyword;
    use csema_syntax::diagnostics::DiagnosticKind;

    fn int_ty() -> TypeDescriptor {
        TypeDescriptor::resolve(&[TypeKeyword::Int])
    }

    fn float_ty() -> TypeDescriptor {
        TypeDescriptor::resolve(&[TypeKeyword::Float])
    }

    fn existing(shape: DeclaratorShape, state: DeclState, ty: TypeDescriptor) -> Declaration {
        Declaration {
            name: "a".to_string(),
            ty,
            shape,
            state,
            span: Span::default(),
            used: false,
        }
    }

    fn var_candidate<'a>(ty: &'a TypeDescriptor, spelling: &'a str, has_init: bool) -> Candidate<'a> {
        Candidate {
            name: "a",
            ty,
            spelling,
            shape: DeclaratorShape::Variable,
            has_init,
            has_body: false,
            span: Span::default(),
        }
    }

    fn kind(outcome: &Reconciled) -> Option<DiagnosticKind> {
        outcome.diagnostic.as_ref().map(|d| d.kind)
    }

    #[test]
    fn test_fresh_name_inserts() {
        let ty = int_ty();
        let outcome = reconcile(None, &var_candidate(&ty, "int", false), true);
        assert_eq!(outcome.action, Action::Insert(DeclState::Declared));
        assert!(outcome.diagnostic.is_none());

        let outcome = reconcile(None, &var_candidate(&ty, "int", true), true);
        assert_eq!(outcome.action, Action::Insert(DeclState::Defined));
    }

    #[test]
    fn test_file_scope_tentative_redeclaration_is_silent() {
        let ty = int_ty();
        let prev = existing(DeclaratorShape::Variable, DeclState::Declared, int_ty());
        let outcome = reconcile(Some(&prev), &var_candidate(&ty, "int", false), true);
        assert_eq!(outcome.action, Action::Keep);
        assert!(outcome.diagnostic.is_none());

        // Also legal after a definition.
        let prev = existing(DeclaratorShape::Variable, DeclState::Defined, int_ty());
        let outcome = reconcile(Some(&prev), &var_candidate(&ty, "int", false), true);
        assert!(outcome.diagnostic.is_none());
    }

    #[test]
    fn test_file_scope_conflicting_type() {
        let ty = float_ty();
        let prev = existing(DeclaratorShape::Variable, DeclState::Defined, int_ty());
        let outcome = reconcile(Some(&prev), &var_candidate(&ty, "float", false), true);
        assert_eq!(outcome.action, Action::Keep);
        assert_eq!(kind(&outcome), Some(DiagnosticKind::ConflictingType));
        assert_eq!(
            outcome.diagnostic.expect("diagnostic").message,
            "conflicting types for 'a'; have 'float'"
        );
    }

    #[test]
    fn test_file_scope_definition_promotes_then_conflicts() {
        let ty = int_ty();
        let prev = existing(DeclaratorShape::Variable, DeclState::Declared, int_ty());
        let outcome = reconcile(Some(&prev), &var_candidate(&ty, "int", true), true);
        assert_eq!(outcome.action, Action::Promote);
        assert!(outcome.diagnostic.is_none());

        let prev = existing(DeclaratorShape::Variable, DeclState::Defined, int_ty());
        let outcome = reconcile(Some(&prev), &var_candidate(&ty, "int", true), true);
        assert_eq!(kind(&outcome), Some(DiagnosticKind::Redefinition));
    }

    #[test]
    fn test_block_scope_rejects_any_restatement() {
        let ty = int_ty();
        let prev = existing(DeclaratorShape::Variable, DeclState::Declared, int_ty());

        let outcome = reconcile(Some(&prev), &var_candidate(&ty, "int", false), false);
        assert_eq!(kind(&outcome), Some(DiagnosticKind::Redeclaration));

        let outcome = reconcile(Some(&prev), &var_candidate(&ty, "int", true), false);
        assert_eq!(kind(&outcome), Some(DiagnosticKind::Redefinition));
    }

    #[test]
    fn test_shape_mismatch() {
        let ty = int_ty();
        let prev = existing(DeclaratorShape::Function, DeclState::Declared, int_ty());
        let outcome = reconcile(Some(&prev), &var_candidate(&ty, "int", false), true);
        assert_eq!(kind(&outcome), Some(DiagnosticKind::ConflictingType));
        assert_eq!(
            outcome.diagnostic.expect("diagnostic").message,
            "'a' redeclared as different kind of symbol"
        );
    }

    #[test]
    fn test_function_declarator_with_initializer() {
        let ty = int_ty();
        let candidate = Candidate {
            name: "test",
            ty: &ty,
            spelling: "int",
            shape: DeclaratorShape::Function,
            has_init: true,
            has_body: false,
            span: Span::default(),
        };

        // Fires regardless of prior state.
        let outcome = reconcile(None, &candidate, true);
        assert_eq!(outcome.action, Action::Insert(DeclState::Declared));
        assert_eq!(kind(&outcome), Some(DiagnosticKind::InvalidInitializer));

        let prev = existing(DeclaratorShape::Function, DeclState::Declared, int_ty());
        let outcome = reconcile(Some(&prev), &candidate, true);
        assert_eq!(outcome.action, Action::Keep);
        assert_eq!(kind(&outcome), Some(DiagnosticKind::InvalidInitializer));
    }

    #[test]
    fn test_function_body_defines() {
        let ty = int_ty();
        let candidate = Candidate {
            name: "a",
            ty: &ty,
            spelling: "int",
            shape: DeclaratorShape::Function,
            has_init: false,
            has_body: true,
            span: Span::default(),
        };

        let outcome = reconcile(None, &candidate, true);
        assert_eq!(outcome.action, Action::Insert(DeclState::Defined));

        let prev = existing(DeclaratorShape::Function, DeclState::Declared, int_ty());
        let outcome = reconcile(Some(&prev), &candidate, true);
        assert_eq!(outcome.action, Action::Promote);

        let prev = existing(DeclaratorShape::Function, DeclState::Defined, int_ty());
        let outcome = reconcile(Some(&prev), &candidate, true);
        assert_eq!(kind(&outcome), Some(DiagnosticKind::Redefinition));
    }
}
