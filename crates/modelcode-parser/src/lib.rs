//! Lexer, parser and text utilities for model code strings.
//!
//! Model code is a small Python-flavoured language: arithmetic on names and
//! numbers, function calls, comparisons, `and`/`or`/`not`, and, in
//! statement blocks, assignments such as `v = v_reset` or `w += b`.
//!
//! AST nodes are allocated in a [`bumpalo::Bump`] arena owned by the caller.

pub mod ast;
pub mod lexer;
pub mod stringtools;

pub use ast::{
    AssignOp, AssignStmt, BinaryExpr, BinaryOp, CallExpr, Expr, ExprStmt, Ident, LiteralExpr,
    LiteralKind, ParenExpr, Parser, Stmt, UnaryExpr, UnaryOp,
};
pub use stringtools::{get_identifiers, word_substitute};

// Re-export error types from core
pub use modelcode_core::{ParseError, ParseErrorKind, ParseErrors};
