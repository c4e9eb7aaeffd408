//! Main lexer implementation.
//!
//! The [`Lexer`] converts code text into a stream of [`Token`]s.
//! It dispatches on the first character of each token.
//!
//! Line breaks are significant between statements but not inside
//! parentheses, so the lexer tracks the nesting depth and only emits
//! [`TokenKind::Newline`] at depth zero. Runs of blank lines collapse into a
//! single newline token. `#` starts a comment running to the end of the line.

use std::collections::VecDeque;

use bumpalo::Bump;
use modelcode_core::{LexError, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};

/// Lexer for model code.
///
/// The `'src` lifetime is the code string being lexed (temporary).
/// The `'ast` lifetime is the arena where token lexemes are allocated (persists).
pub struct Lexer<'src, 'ast> {
    /// Low-level character cursor.
    cursor: Cursor<'src>,
    /// Arena for allocating token lexemes.
    arena: &'ast Bump,
    /// Lookahead buffer for peeking.
    lookahead: VecDeque<Token<'ast>>,
    /// Current parenthesis nesting depth.
    depth: u32,
    /// Whether the last emitted token was a newline (or nothing yet).
    at_line_start: bool,
    /// Accumulated errors.
    errors: Vec<LexError>,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    /// Create a new lexer for the given code.
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            lookahead: VecDeque::with_capacity(2),
            depth: 0,
            at_line_start: true,
            errors: Vec::new(),
        }
    }

    /// Take accumulated errors, leaving an empty vec.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Token<'ast> {
        if let Some(token) = self.lookahead.pop_front() {
            return token;
        }
        self.scan_token()
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&mut self) -> Token<'ast> {
        self.peek_nth(0)
    }

    /// Peek at the nth token ahead (0 = next).
    pub fn peek_nth(&mut self, n: usize) -> Token<'ast> {
        while self.lookahead.len() <= n {
            let token = self.scan_token();
            self.lookahead.push_back(token);
        }
        self.lookahead[n]
    }

    // =========================================
    // Internal: Token scanning
    // =========================================

    fn scan_token(&mut self) -> Token<'ast> {
        loop {
            self.skip_trivia();

            let start_line = self.cursor.line();
            let start_col = self.cursor.column();
            let start_offset = self.cursor.offset();

            let Some(c) = self.cursor.peek() else {
                return self.make_eof();
            };

            let token = match c {
                '\n' | '\r' => {
                    self.cursor.advance();
                    if self.depth > 0 || self.at_line_start {
                        continue;
                    }
                    self.make_token(TokenKind::Newline, start_line, start_col, start_offset)
                }
                c if c.is_ascii_digit() => {
                    self.scan_number(start_line, start_col, start_offset)
                }
                '.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.scan_number(start_line, start_col, start_offset)
                }
                c if is_ident_start(c) => {
                    self.scan_identifier(start_line, start_col, start_offset)
                }
                _ => self.scan_operator(start_line, start_col, start_offset),
            };

            self.at_line_start = matches!(token.kind, TokenKind::Newline | TokenKind::Semicolon);
            return token;
        }
    }

    /// Skip spaces, tabs and `#` comments. Line breaks are not trivia.
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.eat_while(|c| c == ' ' || c == '\t' || c == '\u{FEFF}');
            if self.cursor.eat('#') {
                self.cursor.eat_while(|c| c != '\n');
                continue;
            }
            // Line continuation.
            if self.cursor.peek() == Some('\\')
                && matches!(self.cursor.peek_nth(1), Some('\n'))
            {
                self.cursor.advance();
                self.cursor.advance();
                continue;
            }
            break;
        }
    }

    fn make_eof(&self) -> Token<'ast> {
        let line = self.cursor.line();
        let col = self.cursor.column();
        let lexeme = self.arena.alloc_str("");
        Token::new(TokenKind::Eof, lexeme, Span::point(line, col))
    }

    /// Create a token from start position to current position.
    /// Copies the lexeme into the arena.
    fn make_token(
        &self,
        kind: TokenKind,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'ast> {
        let len = self.cursor.offset() - start_offset;
        let span = Span::new(start_line, start_col, len);
        let src_lexeme =
            &self.cursor.source()[start_offset as usize..self.cursor.offset() as usize];
        let lexeme = self.arena.alloc_str(src_lexeme);
        Token::new(kind, lexeme, span)
    }

    /// Create an error token and record the error.
    fn make_error(&mut self, error: LexError) -> Token<'ast> {
        let span = error.span();
        let lexeme = self.arena.alloc_str("");
        self.errors.push(error);
        Token::new(TokenKind::Error, lexeme, span)
    }

    // =========================================
    // Scanning: Numbers
    // =========================================

    /// Scan a decimal number (integer or floating-point).
    fn scan_number(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'ast> {
        // Integer part (may be empty for `.5`)
        self.cursor.eat_while(|c| c.is_ascii_digit());

        let mut is_float = false;

        if self.cursor.eat('.') {
            self.cursor.eat_while(|c| c.is_ascii_digit());
            is_float = true;
        }

        if let Some('e' | 'E') = self.cursor.peek() {
            let signed = matches!(self.cursor.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self
                .cursor
                .peek_nth(digit_at)
                .is_some_and(|c| c.is_ascii_digit())
            {
                self.cursor.advance();
                if signed {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|c| c.is_ascii_digit());
                is_float = true;
            } else {
                self.cursor.advance();
                let len = self.cursor.offset() - start_offset;
                return self.make_error(LexError::InvalidNumber {
                    span: Span::new(start_line, start_col, len),
                    detail: "expected digits in exponent".to_string(),
                });
            }
        }

        // `3ms` is not a number followed by a name.
        if self.cursor.check(is_ident_start) {
            self.cursor.eat_while(is_ident_continue);
            let len = self.cursor.offset() - start_offset;
            return self.make_error(LexError::InvalidNumber {
                span: Span::new(start_line, start_col, len),
                detail: "identifier directly after number".to_string(),
            });
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.make_token(kind, start_line, start_col, start_offset)
    }

    // =========================================
    // Scanning: Identifiers and keywords
    // =========================================

    fn scan_identifier(
        &mut self,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'ast> {
        let lexeme = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start_line, start_col, start_offset)
    }

    // =========================================
    // Scanning: Operators
    // =========================================

    /// Scan an operator or punctuation token.
    fn scan_operator(
        &mut self,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'ast> {
        let Some(c) = self.cursor.advance() else {
            return self.make_eof();
        };
        let next = self.cursor.peek();

        let kind = match (c, next) {
            ('(', _) => {
                self.depth += 1;
                TokenKind::LeftParen
            }
            (')', _) => {
                self.depth = self.depth.saturating_sub(1);
                TokenKind::RightParen
            }
            (',', _) => TokenKind::Comma,
            (';', _) => TokenKind::Semicolon,

            ('+', Some('=')) => {
                self.cursor.advance();
                TokenKind::PlusEqual
            }
            ('+', _) => TokenKind::Plus,

            ('-', Some('=')) => {
                self.cursor.advance();
                TokenKind::MinusEqual
            }
            ('-', _) => TokenKind::Minus,

            ('*', Some('*')) => {
                self.cursor.advance();
                TokenKind::StarStar
            }
            ('*', Some('=')) => {
                self.cursor.advance();
                TokenKind::StarEqual
            }
            ('*', _) => TokenKind::Star,

            ('/', Some('=')) => {
                self.cursor.advance();
                TokenKind::SlashEqual
            }
            ('/', _) => TokenKind::Slash,

            ('%', _) => TokenKind::Percent,

            ('=', Some('=')) => {
                self.cursor.advance();
                TokenKind::EqualEqual
            }
            ('=', _) => TokenKind::Equal,

            ('!', Some('=')) => {
                self.cursor.advance();
                TokenKind::BangEqual
            }

            ('<', Some('=')) => {
                self.cursor.advance();
                TokenKind::LessEqual
            }
            ('<', _) => TokenKind::Less,

            ('>', Some('=')) => {
                self.cursor.advance();
                TokenKind::GreaterEqual
            }
            ('>', _) => TokenKind::Greater,

            (ch, _) => {
                let span = Span::new(start_line, start_col, ch.len_utf8() as u32);
                return self.make_error(LexError::UnexpectedChar { ch, span });
            }
        };

        self.make_token(kind, start_line, start_col, start_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let arena = Bump::new();
        let mut lexer = Lexer::new(source, &arena);
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token();
            kinds.push(token.kind);
            if token.kind == TokenKind::Eof {
                break;
            }
        }
        kinds
    }

    #[test]
    fn lex_expression() {
        assert_eq!(
            kinds("-v / tau + I**2"),
            vec![
                TokenKind::Minus,
                TokenKind::Identifier,
                TokenKind::Slash,
                TokenKind::Identifier,
                TokenKind::Plus,
                TokenKind::Identifier,
                TokenKind::StarStar,
                TokenKind::IntLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_numbers() {
        assert_eq!(
            kinds("1 2.5 .5 1e-3 3."),
            vec![
                TokenKind::IntLiteral,
                TokenKind::FloatLiteral,
                TokenKind::FloatLiteral,
                TokenKind::FloatLiteral,
                TokenKind::FloatLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_keywords_and_comparisons() {
        assert_eq!(
            kinds("not a and b >= 1 or c != True"),
            vec![
                TokenKind::Not,
                TokenKind::Identifier,
                TokenKind::And,
                TokenKind::Identifier,
                TokenKind::GreaterEqual,
                TokenKind::IntLiteral,
                TokenKind::Or,
                TokenKind::Identifier,
                TokenKind::BangEqual,
                TokenKind::True,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn newlines_outside_parens_only() {
        assert_eq!(
            kinds("v = (a +\n b)\n\n\nw += 1 # bump\n"),
            vec![
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::LeftParen,
                TokenKind::Identifier,
                TokenKind::Plus,
                TokenKind::Identifier,
                TokenKind::RightParen,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::PlusEqual,
                TokenKind::IntLiteral,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn leading_blank_lines_are_skipped() {
        assert_eq!(
            kinds("\n\n  # header\nv"),
            vec![TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn unexpected_character_is_recorded() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("v $ 1", &arena);
        lexer.next_token();
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Error);
        assert!(lexer.has_errors());
        assert!(matches!(
            lexer.take_errors().as_slice(),
            [LexError::UnexpectedChar { ch: '$', .. }]
        ));
    }

    #[test]
    fn number_glued_to_name_is_an_error() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("3ms", &arena);
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn peek_does_not_consume() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("a b", &arena);
        assert_eq!(lexer.peek_nth(1).lexeme, "b");
        assert_eq!(lexer.next_token().lexeme, "a");
        assert_eq!(lexer.next_token().lexeme, "b");
    }
}
