//! Core types shared by the modelcode crates.
//!
//! This crate holds the vocabulary every phase speaks:
//! - [`Span`] for source locations
//! - [`Dimension`] for physical dimensions
//! - [`Value`], [`Quantity`], [`Array`] and [`Function`] for bound values
//! - error types for lexing, parsing, evaluation and dimension checking

mod dimension;
mod error;
mod span;
mod value;

pub use dimension::Dimension;
pub use error::{
    DimensionMismatchError, EvalError, LexError, ParseError, ParseErrorKind, ParseErrors,
};
pub use span::Span;
pub use value::{Array, Comparison, Function, NativeFn, Quantity, Value};
