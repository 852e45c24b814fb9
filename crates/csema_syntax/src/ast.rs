//! Abstract syntax tree definitions for the analyzed C-family language.
//!
//! The tree is the boundary the analyzer consumes: it is already parsed, and every
//! node carries a source span. Expressions are deliberately minimal (literals,
//! identifiers, binary operations) since expression checking is handled elsewhere;
//! they exist so initializers and conditions have something to hang off.

use std::fmt;

/// Source location span (byte offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A node with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Identifier (interned string index in practice, String for simplicity here).
pub type Ident = String;

/// A translation unit: top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub items: Vec<Spanned<Stmt>>,
}

/// Type specifier keywords, as written in the source.
///
/// A declaration's base type is a sequence of these; the analyzer normalizes the
/// sequence into a canonical descriptor before comparing declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKeyword {
    Signed,
    Unsigned,
    Short,
    Long,
    Char,
    Int,
    Float,
    Double,
}

impl TypeKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKeyword::Signed => "signed",
            TypeKeyword::Unsigned => "unsigned",
            TypeKeyword::Short => "short",
            TypeKeyword::Long => "long",
            TypeKeyword::Char => "char",
            TypeKeyword::Int => "int",
            TypeKeyword::Float => "float",
            TypeKeyword::Double => "double",
        }
    }
}

impl fmt::Display for TypeKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Statements, including declarations and function definitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// One base specifier shared by one or more declarators, e.g. `int a, f(), x = 3;`.
    Declaration(DeclGroup),
    /// A function definition with a body.
    Function(FunctionDef),
    /// `{ ... }`
    Block(Vec<Spanned<Stmt>>),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    Switch(SwitchStmt),
    Break,
    Continue,
    Expr(Spanned<Expr>),
    /// A lone `;`.
    Empty,
}

/// A declaration statement: one resolved base type, several declarators.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclGroup {
    pub specifiers: Spanned<Vec<TypeKeyword>>,
    pub declarators: Vec<Spanned<Declarator>>,
}

/// A single declarator within a group.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: Ident,
    pub shape: DeclaratorShape,
    /// Trailing `= expr`, if any. Function-shaped declarators must not carry one.
    pub init: Option<Spanned<Expr>>,
}

/// Declarator shape, kept as a closed variant so reconciliation can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaratorShape {
    Variable,
    Function,
}

/// A function definition: `int main(...) { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub specifiers: Spanned<Vec<TypeKeyword>>,
    pub name: Spanned<Ident>,
    pub params: Vec<Spanned<Param>>,
    pub body: Vec<Spanned<Stmt>>,
}

/// A function parameter. Unnamed parameters are legal in declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub specifiers: Vec<TypeKeyword>,
    pub name: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub cond: Spanned<Expr>,
    pub body: Box<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    pub body: Box<Spanned<Stmt>>,
    pub cond: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<ForInit>,
    pub cond: Option<Spanned<Expr>>,
    pub step: Option<Spanned<Expr>>,
    pub body: Box<Spanned<Stmt>>,
}

/// The first clause of a `for` header: a declaration or a plain expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(DeclGroup),
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub cond: Spanned<Expr>,
    pub body: Box<Spanned<Stmt>>,
}

/// Minimal expression vocabulary for initializers and conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Ident(Ident),
    Binary {
        op: BinaryOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Assign,
    Eq,
    Ne,
    Lt,
    Gt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let a = Span::new(4, 10);
        let b = Span::new(7, 15);
        assert_eq!(a.merge(b), Span::new(4, 15));
        assert_eq!(b.merge(a), Span::new(4, 15));
    }

    #[test]
    fn test_type_keyword_spelling() {
        assert_eq!(TypeKeyword::Unsigned.as_str(), "unsigned");
        assert_eq!(TypeKeyword::Double.to_string(), "double");
    }
}
