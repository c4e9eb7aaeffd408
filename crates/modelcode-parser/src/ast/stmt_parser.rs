//! Statement parsing.

use modelcode_core::{ParseError, ParseErrorKind};

use super::parser::Parser;
use crate::ast::{AssignOp, AssignStmt, ExprStmt, Ident, Stmt};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse one statement, up to (not including) its separator.
    pub fn parse_statement(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start = *self.peek();

        let stmt = if start.kind == TokenKind::Identifier
            && let Some(op) = AssignOp::from_token(self.peek_nth(1).kind)
        {
            self.advance();
            self.advance();
            let value = self.parse_expr(0)?;
            Stmt::Assign(AssignStmt {
                target: Ident::new(start.lexeme, start.span),
                op,
                value,
                span: start.span.merge(value.span()),
            })
        } else {
            let expr = self.parse_expr(0)?;
            if AssignOp::from_token(self.peek().kind).is_some() {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidAssignTarget,
                    expr.span(),
                    format!("cannot assign to '{expr}'"),
                ));
            }
            Stmt::Expr(ExprStmt {
                expr,
                span: expr.span(),
            })
        };

        if !self.peek().kind.is_statement_end() {
            let token = *self.peek();
            return Err(ParseError::expected_token(
                token.span,
                "line break or ';'",
                token.kind.description(),
            ));
        }

        Ok(stmt)
    }
}
