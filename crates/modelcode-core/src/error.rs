//! Error types shared by every processing phase.
//!
//! ## Error Hierarchy
//!
//! ```text
//! LexError               - tokenization errors
//! ParseError             - parser errors (with ParseErrorKind), collected in ParseErrors
//! DimensionMismatchError - inconsistent physical dimensions
//! EvalError              - evaluation errors (wraps DimensionMismatchError)
//! ```
//!
//! The root `modelcode` crate wraps these in its own `CodeError`, adding the
//! offending code string to every variant.

use thiserror::Error;

use crate::{Dimension, Span};

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur during lexical analysis (tokenization).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// An unexpected character was encountered.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// A numeric literal could not be parsed.
    #[error("invalid number at {span}: {detail}")]
    InvalidNumber { span: Span, detail: String },
}

impl LexError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A specific token was expected but not found.
    ExpectedToken,
    /// An unexpected token was encountered.
    UnexpectedToken,
    /// An expression was expected.
    ExpectedExpression,
    /// The code holds statements where a single expression is required.
    ExpectedSingleExpression,
    /// The left-hand side of an assignment is not a plain name.
    InvalidAssignTarget,
    /// A literal value could not be parsed.
    InvalidLiteral,
    /// Tokenization failed.
    InvalidSyntax,
}

impl ParseErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::ExpectedSingleExpression => "expected a single expression",
            ParseErrorKind::InvalidAssignTarget => "invalid assignment target",
            ParseErrorKind::InvalidLiteral => "invalid literal",
            ParseErrorKind::InvalidSyntax => "invalid syntax",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse error with location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    /// The category of this error.
    pub kind: ParseErrorKind,
    /// The source location where the error occurred.
    pub span: Span,
    /// A detailed error message.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    /// Create an "expected expression" error.
    pub fn expected_expression(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedExpression,
            span,
            format!("expected expression, found {found}"),
        )
    }

    /// Format the error with source context for display.
    ///
    /// Renders the offending line with a caret under the error location.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = String::new();
        let line = self.span.line;
        let column = self.span.col;

        output.push_str(&format!("Error at {}:{}: {}\n", line, column, self.kind));
        if !self.message.is_empty() {
            output.push_str(&format!("  {}\n", self.message));
        }

        if let Some(line_text) = source.lines().nth(line.saturating_sub(1) as usize) {
            output.push_str("  |\n");
            output.push_str(&format!("{:>3} | {}\n", line, line_text));
            let indent = " ".repeat(column.saturating_sub(1) as usize);
            let pointer = if self.span.len <= 1 {
                "^".to_string()
            } else {
                "^".to_string() + &"~".repeat((self.span.len - 1) as usize)
            };
            output.push_str(&format!("  | {}{}\n", indent, pointer));
        }

        output
    }
}

/// A collection of parse errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    /// Create a new empty error collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    /// The first recorded error, if any.
    pub fn first(&self) -> Option<&ParseError> {
        self.errors.first()
    }

    /// Convert to a Vec of errors.
    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl std::fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

// ============================================================================
// Dimension Errors
// ============================================================================

/// Two physical dimensions that had to agree did not.
///
/// `computed` is the dimension found on the left operand (or the computed
/// dimension of an expression); `expected` is the one it was compared
/// against. Unary checks, such as the argument of `exp`, carry no
/// `expected` dimension beyond "dimensionless".
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} ({computed}) ({expected})")]
pub struct DimensionMismatchError {
    /// What was being checked.
    pub message: String,
    /// The dimension that was found.
    pub computed: Dimension,
    /// The dimension that was required.
    pub expected: Dimension,
}

impl DimensionMismatchError {
    /// Create a new mismatch between two dimensions.
    pub fn new(message: impl Into<String>, computed: Dimension, expected: Dimension) -> Self {
        Self {
            message: message.into(),
            computed,
            expected,
        }
    }

    /// A value that had to be dimensionless was not.
    pub fn not_dimensionless(message: impl Into<String>, computed: Dimension) -> Self {
        Self::new(message, computed, Dimension::DIMENSIONLESS)
    }
}

// ============================================================================
// Evaluation Errors
// ============================================================================

/// Errors raised while evaluating code over bound values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Physical dimensions of operands disagree.
    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatchError),

    /// A name has no binding in either the namespace or the variables.
    #[error("undefined name '{name}'")]
    Undefined { name: String },

    /// A non-function value was called.
    #[error("'{name}' is not callable")]
    NotCallable { name: String },

    /// A function received the wrong number of arguments.
    #[error("{name}() takes {expected} argument(s) but {found} were given")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    /// An operation was applied to values of the wrong kind.
    #[error("unsupported operand(s) for {op}: {detail}")]
    Type { op: String, detail: String },

    /// Element-wise operation on arrays of different lengths.
    #[error("array length mismatch: {left} vs {right}")]
    Shape { left: usize, right: usize },
}

impl EvalError {
    /// Create a type error for an operator.
    pub fn type_error(op: impl Into<String>, detail: impl Into<String>) -> Self {
        EvalError::Type {
            op: op.into(),
            detail: detail.into(),
        }
    }
}
