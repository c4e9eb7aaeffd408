//! Expression AST nodes.
//!
//! # Expression Precedence
//!
//! The parser uses Pratt parsing with the following precedence levels:
//! 1. `or`
//! 2. `and`
//! 3. `not` (prefix)
//! 4. Comparisons (`==`, `!=`, `<`, `<=`, `>`, `>=`)
//! 5. Additive (`+`, `-`)
//! 6. Multiplicative (`*`, `/`, `%`)
//! 7. Prefix sign (`-`, `+`)
//! 8. Power (`**`), right associative
//! 9. Call

use std::fmt;

use crate::ast::{BinaryOp, UnaryOp};
use modelcode_core::Span;

/// An identifier with its source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    /// The identifier name
    pub name: &'ast str,
    /// Source location
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    /// Create a new identifier.
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(LiteralExpr),
    /// Name reference
    Ident(Ident<'ast>),
    /// Binary operation
    Binary(&'ast BinaryExpr<'ast>),
    /// Unary prefix operation
    Unary(&'ast UnaryExpr<'ast>),
    /// Function call
    Call(&'ast CallExpr<'ast>),
    /// Parenthesized expression
    Paren(&'ast ParenExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Call(e) => e.span,
            Self::Paren(e) => e.span,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &Expr<'ast> {
        let mut expr = self;
        while let Expr::Paren(paren) = expr {
            expr = paren.expr;
        }
        expr
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr {
    /// The literal kind
    pub kind: LiteralKind,
    /// Source location
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind {
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// Boolean literal
    Bool(bool),
}

impl LiteralKind {
    /// The numeric value of the literal; booleans are 0 or 1.
    pub fn as_f64(&self) -> f64 {
        match self {
            LiteralKind::Int(v) => *v as f64,
            LiteralKind::Float(v) => *v,
            LiteralKind::Bool(b) => f64::from(u8::from(*b)),
        }
    }
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    /// Left operand
    pub left: &'ast Expr<'ast>,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A unary prefix operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    /// Operator
    pub op: UnaryOp,
    /// Operand
    pub operand: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A call of a named function: `exp(-t / tau)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// The called name
    pub callee: Ident<'ast>,
    /// Arguments
    pub args: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A parenthesized expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    /// Inner expression
    pub expr: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => match lit.kind {
                LiteralKind::Int(v) => write!(f, "{v}"),
                LiteralKind::Float(v) => write!(f, "{v:?}"),
                LiteralKind::Bool(true) => f.write_str("True"),
                LiteralKind::Bool(false) => f.write_str("False"),
            },
            Expr::Ident(ident) => f.write_str(ident.name),
            Expr::Binary(bin) => write!(f, "{} {} {}", bin.left, bin.op, bin.right),
            Expr::Unary(un) => write!(f, "{}{}", un.op, un.operand),
            Expr::Call(call) => {
                write!(f, "{}(", call.callee.name)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Paren(paren) => write!(f, "({})", paren.expr),
        }
    }
}
