//! Lexical analysis for model code.

mod cursor;
mod lexer;
mod token;

pub use cursor::{is_ident_continue, is_ident_start};
pub use lexer::Lexer;
pub use token::{KEYWORDS, Token, TokenKind, lookup_keyword};
