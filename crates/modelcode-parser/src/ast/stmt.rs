//! Statement AST nodes.
//!
//! A statement block is a sequence of assignments (`v = expr`,
//! `v += expr`, ...) and bare expressions, separated by line breaks or `;`.

use crate::ast::expr::{Expr, Ident};
use crate::ast::AssignOp;
use modelcode_core::Span;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// Assignment to a name
    Assign(AssignStmt<'ast>),
    /// Bare expression
    Expr(ExprStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Assign(s) => s.span,
            Self::Expr(s) => s.span,
        }
    }
}

/// An assignment statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    /// The assigned name
    pub target: Ident<'ast>,
    /// The assignment operator
    pub op: AssignOp,
    /// The assigned value
    pub value: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// An expression statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    /// The expression
    pub expr: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}
