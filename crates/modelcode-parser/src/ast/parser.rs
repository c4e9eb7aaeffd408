//! Parser infrastructure.
//!
//! Provides the main [`Parser`] struct with token navigation and the two
//! entry points: [`Parser::expression`] for a single expression and
//! [`Parser::statements`] for a statement block.

use bumpalo::Bump;
use modelcode_core::{ParseError, ParseErrorKind, ParseErrors, Span};

use crate::ast::{Expr, Stmt};
use crate::lexer::{Lexer, Token, TokenKind};

/// The parser for model code.
///
/// The whole code string is tokenized upfront into a buffer, so peeking
/// ahead never touches the lexer.
///
/// The `'ast` lifetime refers to the arena where AST nodes and token
/// lexemes are allocated. The code string only needs to live during
/// the call to `new()`.
pub struct Parser<'ast> {
    /// Buffered tokens (lexemes allocated in arena)
    pub(super) buffer: Vec<Token<'ast>>,
    /// Current position in the buffer
    pub(super) position: usize,
    /// Accumulated parse errors
    pub(super) errors: ParseErrors,
    /// Arena allocator for AST nodes
    pub(super) arena: &'ast Bump,
}

impl<'ast> Parser<'ast> {
    /// Create a new parser for the given code.
    pub fn new(source: &str, arena: &'ast Bump) -> Self {
        let mut lexer = Lexer::new(source, arena);
        let mut buffer = Vec::with_capacity(source.len() / 2 + 1);
        let mut errors = ParseErrors::new();

        loop {
            let token = lexer.next_token();

            if token.kind == TokenKind::Error {
                for lex_error in lexer.take_errors() {
                    errors.push(ParseError::new(
                        ParseErrorKind::InvalidSyntax,
                        lex_error.span(),
                        lex_error.to_string(),
                    ));
                }
                continue;
            }

            let is_eof = token.kind == TokenKind::Eof;
            buffer.push(token);

            if is_eof {
                break;
            }
        }

        Self {
            buffer,
            position: 0,
            errors,
            arena,
        }
    }

    /// Parse code that must consist of exactly one expression.
    ///
    /// Trailing line breaks are allowed; anything else after the expression
    /// (a second statement, an assignment) is an error.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn expression(source: &str, arena: &'ast Bump) -> Result<&'ast Expr<'ast>, ParseErrors> {
        let mut parser = Parser::new(source, arena);
        if parser.has_errors() {
            return Err(parser.take_errors());
        }

        let expr = match parser.parse_expr(0) {
            Ok(expr) => expr,
            Err(error) => return Err(error.into()),
        };

        while parser.eat(TokenKind::Newline).is_some() {}

        if !parser.is_eof() {
            let token = *parser.peek();
            let kind = if token.kind.is_statement_end()
                || crate::ast::AssignOp::from_token(token.kind).is_some()
            {
                ParseErrorKind::ExpectedSingleExpression
            } else {
                ParseErrorKind::UnexpectedToken
            };
            return Err(ParseError::new(
                kind,
                token.span,
                format!("unexpected {} after expression", token.kind),
            )
            .into());
        }

        Ok(expr)
    }

    /// Parse a statement block.
    ///
    /// Statements are separated by line breaks or `;`. Parsing continues
    /// after an erroneous statement so that every error is reported.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn statements(source: &str, arena: &'ast Bump) -> Result<&'ast [Stmt<'ast>], ParseErrors> {
        let mut parser = Parser::new(source, arena);
        if parser.has_errors() {
            return Err(parser.take_errors());
        }

        let mut stmts = Vec::new();
        loop {
            parser.skip_separators();
            if parser.is_eof() {
                break;
            }
            match parser.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(error) => {
                    parser.errors.push(error);
                    parser.synchronize();
                }
            }
        }

        if parser.has_errors() {
            return Err(parser.take_errors());
        }
        Ok(arena.alloc_slice_copy(&stmts))
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Take the errors, leaving an empty error collection.
    pub fn take_errors(&mut self) -> ParseErrors {
        std::mem::take(&mut self.errors)
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> &Token<'ast> {
        self.peek_nth(0)
    }

    /// Peek ahead n tokens without consuming. Past the end this is EOF.
    pub fn peek_nth(&self, n: usize) -> &Token<'ast> {
        let last = self.buffer.len().saturating_sub(1);
        &self.buffer[(self.position + n).min(last)]
    }

    /// Get the current token and advance to the next.
    pub fn advance(&mut self) -> Token<'ast> {
        let token = *self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    /// Check if the current token matches the given kind.
    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Check if the current token is EOF.
    pub fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// If the current token matches the given kind, consume it and return Some.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Expect the current token to be of the given kind.
    /// If it matches, consume and return it. Otherwise, return an error.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = *self.peek();
            Err(ParseError::expected_token(
                token.span,
                kind.description(),
                token.kind.description(),
            ))
        }
    }

    /// Skip statement separators.
    pub(super) fn skip_separators(&mut self) {
        while matches!(self.peek().kind, TokenKind::Newline | TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Skip to the end of the current statement after an error.
    pub(super) fn synchronize(&mut self) {
        while !self.peek().kind.is_statement_end() {
            self.advance();
        }
    }

    /// Span of the token just consumed.
    pub(super) fn previous_span(&self) -> Span {
        self.position
            .checked_sub(1)
            .and_then(|i| self.buffer.get(i))
            .map(|t| t.span)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_rejects_trailing_statement() {
        let arena = Bump::new();
        let errors = Parser::expression("a + b; c", &arena).unwrap_err();
        assert_eq!(
            errors.first().map(|e| e.kind),
            Some(ParseErrorKind::ExpectedSingleExpression)
        );
    }

    #[test]
    fn expression_rejects_assignment() {
        let arena = Bump::new();
        let errors = Parser::expression("v = 1", &arena).unwrap_err();
        assert_eq!(
            errors.first().map(|e| e.kind),
            Some(ParseErrorKind::ExpectedSingleExpression)
        );
    }

    #[test]
    fn expression_allows_trailing_newline() {
        let arena = Bump::new();
        assert!(Parser::expression("a * b\n", &arena).is_ok());
    }

    #[test]
    fn empty_expression_is_an_error() {
        let arena = Bump::new();
        let errors = Parser::expression("", &arena).unwrap_err();
        assert_eq!(
            errors.first().map(|e| e.kind),
            Some(ParseErrorKind::ExpectedExpression)
        );
    }

    #[test]
    fn lexer_errors_surface_as_invalid_syntax() {
        let arena = Bump::new();
        let errors = Parser::expression("v ? 1", &arena).unwrap_err();
        assert_eq!(
            errors.first().map(|e| e.kind),
            Some(ParseErrorKind::InvalidSyntax)
        );
    }

    #[test]
    fn advance_stops_at_eof() {
        let arena = Bump::new();
        let mut parser = Parser::new("x", &arena);
        parser.advance();
        parser.advance();
        assert!(parser.is_eof());
    }
}
