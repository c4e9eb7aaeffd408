//! Errors of the symbolic backend.

use modelcode_core::ParseErrors;
use thiserror::Error;

/// Errors raised while converting or analysing code symbolically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolicError {
    /// The code does not parse as an expression.
    #[error("{0}")]
    Parse(#[from] ParseErrors),

    /// The expression uses a construct with no symbolic meaning.
    #[error("{construct} is not supported in symbolic expressions")]
    Unsupported { construct: String },

    /// The expression is not affine in the given symbol.
    #[error("expression is not of the form f + g*{symbol}")]
    NotSeparable { symbol: String },
}

impl SymbolicError {
    /// Create an unsupported-construct error.
    pub fn unsupported(construct: impl Into<String>) -> Self {
        SymbolicError::Unsupported {
            construct: construct.into(),
        }
    }
}
