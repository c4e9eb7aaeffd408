//! Lowering from the parser AST to [`Term`].

use bumpalo::Bump;
use modelcode_parser::{BinaryOp, Expr, LiteralKind, Parser, UnaryOp};

use crate::{SymbolicError, Term};

impl Term {
    /// Parse a code string into a term.
    ///
    /// Only arithmetic is symbolic: comparisons, logical operators, and
    /// boolean literals are rejected.
    pub fn parse(code: &str) -> Result<Term, SymbolicError> {
        let arena = Bump::new();
        let expr = Parser::expression(code, &arena)?;
        lower(expr)
    }
}

/// Convert an AST expression into an owned term.
pub fn lower(expr: &Expr<'_>) -> Result<Term, SymbolicError> {
    match expr {
        Expr::Literal(lit) => match lit.kind {
            LiteralKind::Int(v) => Ok(Term::Const(v as f64)),
            LiteralKind::Float(v) => Ok(Term::Const(v)),
            LiteralKind::Bool(_) => Err(SymbolicError::unsupported("boolean literal")),
        },
        Expr::Ident(ident) => Ok(Term::symbol(ident.name)),
        Expr::Paren(paren) => lower(paren.expr),
        Expr::Unary(unary) => {
            let operand = lower(unary.operand)?;
            match unary.op {
                UnaryOp::Neg => Ok(-operand),
                UnaryOp::Plus => Ok(operand),
                UnaryOp::Not => Err(SymbolicError::unsupported("'not'")),
            }
        }
        Expr::Binary(binary) => {
            if binary.op.is_comparison() || binary.op.is_logical() {
                return Err(SymbolicError::unsupported(format!("'{}'", binary.op)));
            }
            let left = lower(binary.left)?;
            let right = lower(binary.right)?;
            Ok(match binary.op {
                BinaryOp::Add => left + right,
                BinaryOp::Sub => left - right,
                BinaryOp::Mul => left * right,
                BinaryOp::Div => left / right,
                BinaryOp::Mod => Term::Rem(left.into(), right.into()),
                BinaryOp::Pow => left.pow(right),
                op => return Err(SymbolicError::unsupported(format!("'{op}'"))),
            })
        }
        Expr::Call(call) => {
            let args = call
                .args
                .iter()
                .map(lower)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Term::call(call.callee.name, args))
        }
    }
}
