//! Abstract Syntax Tree (AST) for model code.
//!
//! This module provides:
//! - AST node definitions for expressions and statements
//! - The [`Parser`] that turns code text into AST
//!
//! # Example
//!
//! ```
//! use modelcode_parser::Parser;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! match Parser::expression("-(v - v_rest) / tau", &arena) {
//!     Ok(expr) => println!("parsed: {expr}"),
//!     Err(errors) => eprintln!("parse errors: {errors}"),
//! }
//! ```

pub mod ops;

mod parser;

pub mod expr;
mod expr_parser;

pub mod stmt;
mod stmt_parser;

pub use expr::*;
pub use ops::*;
pub use parser::Parser;
pub use stmt::*;
