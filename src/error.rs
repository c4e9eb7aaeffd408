//! Errors raised by annotated code.
//!
//! Every variant that concerns a particular code string carries that string,
//! so a message can be reported to the modeller without further context.

use modelcode_core::{DimensionMismatchError, EvalError, ParseErrors};
use modelcode_symbolic::SymbolicError;
use thiserror::Error;

/// Result alias for annotated-code operations.
pub type CodeResult<T> = Result<T, CodeError>;

/// Errors raised by [`AnnotatedCode`](crate::AnnotatedCode) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodeError {
    /// The code string is empty or whitespace only.
    #[error("code string is empty")]
    EmptyCode,

    /// `resolve` was called on already resolved code.
    #[error("variables of \"{code}\" have already been resolved")]
    AlreadyResolved { code: String },

    /// An operation needs a resolved namespace.
    #[error("\"{code}\" must be resolved first")]
    NotResolved { code: String },

    /// An external identifier has no binding in any namespace.
    #[error("the identifier \"{identifier}\" in the code string \"{code}\" could not be resolved")]
    UnresolvedIdentifier { identifier: String, code: String },

    /// The code does not parse.
    #[error("cannot parse \"{code}\": {errors}")]
    Parse { code: String, errors: ParseErrors },

    /// Evaluation failed for a reason other than dimensions.
    #[error("error evaluating \"{code}\": {source}")]
    Eval {
        code: String,
        #[source]
        source: EvalError,
    },

    /// Physical dimensions are inconsistent.
    #[error("dimension mismatch in \"{code}\": {source}")]
    DimensionMismatch {
        code: String,
        #[source]
        source: DimensionMismatchError,
    },

    /// The code cannot be interpreted symbolically.
    #[error("\"{code}\" cannot be analysed symbolically: {source}")]
    Symbolic {
        code: String,
        #[source]
        source: SymbolicError,
    },

    /// The code is not of the form `f + g*xi`.
    #[error("expression \"{code}\" cannot be separated into stochastic and non-stochastic term")]
    NonSeparable { code: String },

    /// A statement assigns to a name that is not a known variable.
    #[error("cannot assign to \"{variable}\" in \"{code}\": not a variable")]
    UnknownVariable { variable: String, code: String },
}

impl CodeError {
    /// Attach `code` to an evaluation error, splitting off dimension
    /// mismatches.
    pub(crate) fn eval(code: &str, error: EvalError) -> Self {
        match error {
            EvalError::DimensionMismatch(source) => CodeError::DimensionMismatch {
                code: code.to_string(),
                source,
            },
            source => CodeError::Eval {
                code: code.to_string(),
                source,
            },
        }
    }

    /// Attach `code` to a symbolic error.
    pub(crate) fn symbolic(code: &str, error: SymbolicError) -> Self {
        match error {
            SymbolicError::Parse(errors) => CodeError::Parse {
                code: code.to_string(),
                errors,
            },
            SymbolicError::NotSeparable { .. } => CodeError::NonSeparable {
                code: code.to_string(),
            },
            source => CodeError::Symbolic {
                code: code.to_string(),
                source,
            },
        }
    }

    /// Render the error, with a caret diagnostic for parse errors.
    pub fn display_with_source(&self) -> String {
        match self {
            CodeError::Parse { code, errors } => errors
                .iter()
                .map(|e| e.display_with_source(code))
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }
    }

    /// The dimension mismatch behind this error, if that is what it is.
    pub fn as_dimension_mismatch(&self) -> Option<&DimensionMismatchError> {
        match self {
            CodeError::DimensionMismatch { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelcode_core::Dimension;

    #[test]
    fn eval_errors_split_dimension_mismatch() {
        let mismatch = DimensionMismatchError::new("Addition", Dimension::LENGTH, Dimension::TIME);
        let error = CodeError::eval("x + t", mismatch.clone().into());
        assert_eq!(error.as_dimension_mismatch(), Some(&mismatch));

        let error = CodeError::eval("f(1)", EvalError::NotCallable { name: "f".into() });
        assert!(matches!(error, CodeError::Eval { .. }));
        assert_eq!(error.as_dimension_mismatch(), None);
    }

    #[test]
    fn symbolic_errors_map_to_variants() {
        let error = CodeError::symbolic(
            "xi**2",
            SymbolicError::NotSeparable {
                symbol: "xi".into(),
            },
        );
        assert_eq!(
            error,
            CodeError::NonSeparable {
                code: "xi**2".into()
            }
        );
    }

    #[test]
    fn messages_name_identifier_and_code() {
        let error = CodeError::UnresolvedIdentifier {
            identifier: "tau".into(),
            code: "-v/tau".into(),
        };
        let message = error.to_string();
        assert!(message.contains("\"tau\""));
        assert!(message.contains("\"-v/tau\""));
    }
}
