//! Expression parsing using Pratt parsing (precedence climbing).

use modelcode_core::{ParseError, ParseErrorKind};

use super::parser::Parser;
use crate::ast::expr::*;
use crate::ast::{BinaryOp, UnaryOp};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse an expression with a minimum binding power.
    ///
    /// This is the core of the Pratt parser. It handles operator precedence
    /// by only consuming operators with sufficient binding power.
    pub fn parse_expr(&mut self, min_bp: u8) -> Result<&'ast Expr<'ast>, ParseError> {
        let mut lhs = self.parse_prefix()?;

        while let Some(bin_op) = BinaryOp::from_token(self.peek().kind) {
            let (l_bp, r_bp) = bin_op.binding_power();
            if l_bp < min_bp {
                break;
            }

            self.advance();
            let rhs = self.parse_expr(r_bp)?;
            let span = lhs.span().merge(rhs.span());
            lhs = self.arena.alloc(Expr::Binary(self.arena.alloc(BinaryExpr {
                left: lhs,
                op: bin_op,
                right: rhs,
                span,
            })));
        }

        Ok(lhs)
    }

    /// Parse a prefix expression (the start of an expression).
    fn parse_prefix(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let token = *self.peek();

        match token.kind {
            TokenKind::IntLiteral => {
                self.advance();
                // Integers too large for i64 are still valid numbers.
                let kind = match token.lexeme.parse::<i64>() {
                    Ok(value) => LiteralKind::Int(value),
                    Err(_) => LiteralKind::Float(self.parse_float(&token)?),
                };
                Ok(self.arena.alloc(Expr::Literal(LiteralExpr {
                    kind,
                    span: token.span,
                })))
            }
            TokenKind::FloatLiteral => {
                self.advance();
                let value = self.parse_float(&token)?;
                Ok(self.arena.alloc(Expr::Literal(LiteralExpr {
                    kind: LiteralKind::Float(value),
                    span: token.span,
                })))
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(self.arena.alloc(Expr::Literal(LiteralExpr {
                    kind: LiteralKind::Bool(token.kind == TokenKind::True),
                    span: token.span,
                })))
            }
            TokenKind::Identifier => {
                self.advance();
                let ident = Ident::new(token.lexeme, token.span);
                if self.check(TokenKind::LeftParen) {
                    self.parse_call(ident)
                } else {
                    Ok(self.arena.alloc(Expr::Ident(ident)))
                }
            }
            TokenKind::LeftParen => self.parse_paren(),
            kind => {
                if let Some(op) = UnaryOp::from_token(kind) {
                    self.advance();
                    let operand = self.parse_expr(op.binding_power())?;
                    let span = token.span.merge(operand.span());
                    return Ok(self.arena.alloc(Expr::Unary(self.arena.alloc(UnaryExpr {
                        op,
                        operand,
                        span,
                    }))));
                }
                if kind == TokenKind::Eof {
                    return Err(ParseError::expected_expression(token.span, "end of input"));
                }
                Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken,
                    token.span,
                    format!("expected expression, found {}", token.kind),
                ))
            }
        }
    }

    fn parse_float(&self, token: &crate::lexer::Token<'ast>) -> Result<f64, ParseError> {
        token.lexeme.parse::<f64>().map_err(|e| {
            ParseError::new(
                ParseErrorKind::InvalidLiteral,
                token.span,
                format!("invalid number '{}': {e}", token.lexeme),
            )
        })
    }

    /// Parse a parenthesized expression.
    fn parse_paren(&mut self) -> Result<&'ast Expr<'ast>, ParseError> {
        let open = self.expect(TokenKind::LeftParen)?;
        let expr = self.parse_expr(0)?;
        let close = self.expect(TokenKind::RightParen)?;
        Ok(self.arena.alloc(Expr::Paren(self.arena.alloc(ParenExpr {
            expr,
            span: open.span.merge(close.span),
        }))))
    }

    /// Parse a call of a named function.
    fn parse_call(&mut self, callee: Ident<'ast>) -> Result<&'ast Expr<'ast>, ParseError> {
        self.expect(TokenKind::LeftParen)?;

        let mut args = bumpalo::collections::Vec::new_in(self.arena);
        if !self.check(TokenKind::RightParen) {
            args.push(*self.parse_expr(0)?);
            while self.eat(TokenKind::Comma).is_some() {
                if self.check(TokenKind::RightParen) {
                    break;
                }
                args.push(*self.parse_expr(0)?);
            }
        }

        self.expect(TokenKind::RightParen)?;
        let span = callee.span.merge(self.previous_span());

        Ok(self.arena.alloc(Expr::Call(self.arena.alloc(CallExpr {
            callee,
            args: args.into_bump_slice(),
            span,
        }))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    fn parse<'ast>(source: &str, arena: &'ast Bump) -> &'ast Expr<'ast> {
        Parser::expression(source, arena).unwrap()
    }

    fn binary<'a, 'ast>(expr: &'a Expr<'ast>) -> &'a BinaryExpr<'ast> {
        match expr {
            Expr::Binary(bin) => bin,
            other => panic!("expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let arena = Bump::new();
        let expr = parse("a + b * c", &arena);
        let add = binary(expr);
        assert_eq!(add.op, BinaryOp::Add);
        assert_eq!(binary(add.right).op, BinaryOp::Mul);
    }

    #[test]
    fn power_is_right_associative() {
        let arena = Bump::new();
        let expr = parse("a ** b ** c", &arena);
        let outer = binary(expr);
        assert_eq!(outer.op, BinaryOp::Pow);
        assert!(matches!(outer.left, Expr::Ident(i) if i.name == "a"));
        assert_eq!(binary(outer.right).op, BinaryOp::Pow);
    }

    #[test]
    fn negation_binds_looser_than_power() {
        let arena = Bump::new();
        let expr = parse("-x**2", &arena);
        match expr {
            Expr::Unary(un) => {
                assert_eq!(un.op, UnaryOp::Neg);
                assert_eq!(binary(un.operand).op, BinaryOp::Pow);
            }
            other => panic!("expected unary, got {other:?}"),
        }
    }

    #[test]
    fn negative_exponent() {
        let arena = Bump::new();
        let expr = parse("2**-1", &arena);
        let pow = binary(expr);
        assert!(matches!(pow.right, Expr::Unary(_)));
    }

    #[test]
    fn not_binds_looser_than_comparison() {
        let arena = Bump::new();
        let expr = parse("not v > 1 and w", &arena);
        let and = binary(expr);
        assert_eq!(and.op, BinaryOp::And);
        match and.left {
            Expr::Unary(un) => assert_eq!(binary(un.operand).op, BinaryOp::Greater),
            other => panic!("expected unary, got {other:?}"),
        }
    }

    #[test]
    fn call_with_arguments() {
        let arena = Bump::new();
        let expr = parse("clip(v, 0, vmax)", &arena);
        match expr {
            Expr::Call(call) => {
                assert_eq!(call.callee.name, "clip");
                assert_eq!(call.args.len(), 3);
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn parentheses_group() {
        let arena = Bump::new();
        let expr = parse("(a + b) * c", &arena);
        let mul = binary(expr);
        assert_eq!(mul.op, BinaryOp::Mul);
        assert_eq!(binary(mul.left.unparen()).op, BinaryOp::Add);
    }

    #[test]
    fn literals() {
        let arena = Bump::new();
        let expr = parse("1.5e3", &arena);
        assert!(matches!(
            expr,
            Expr::Literal(LiteralExpr { kind: LiteralKind::Float(v), .. }) if *v == 1500.0
        ));
        let expr = parse("True", &arena);
        assert!(matches!(
            expr,
            Expr::Literal(LiteralExpr { kind: LiteralKind::Bool(true), .. })
        ));
    }

    #[test]
    fn missing_operand() {
        let arena = Bump::new();
        let errors = Parser::expression("v +", &arena).unwrap_err();
        let error = errors.first().unwrap();
        assert_eq!(error.kind, ParseErrorKind::ExpectedExpression);
        assert_eq!(error.message, "expected expression, found end of input");

        let errors = Parser::expression("v + )", &arena).unwrap_err();
        assert_eq!(
            errors.first().map(|e| e.kind),
            Some(ParseErrorKind::UnexpectedToken)
        );
    }

    #[test]
    fn missing_close_paren() {
        let arena = Bump::new();
        let errors = Parser::expression("(a + b", &arena).unwrap_err();
        assert_eq!(
            errors.first().map(|e| e.kind),
            Some(ParseErrorKind::ExpectedToken)
        );
    }

    #[test]
    fn display_round_trips_structure() {
        let arena = Bump::new();
        let expr = parse("-(a+b)*exp(c)", &arena);
        assert_eq!(expr.to_string(), "-(a + b) * exp(c)");
    }
}
