//! Code strings that must hold a single expression.

use std::fmt;

use bumpalo::Bump;
use modelcode_parser::Parser;

use crate::builder::CodeBuilder;
use crate::code::CodeCore;
use crate::{AnnotatedCode, CodeError, CodeResult};

/// A single expression with an attached namespace, such as the right-hand
/// side of a differential equation.
///
/// The code is parsed when the expression is built, so syntax errors and
/// statement blocks are rejected up front. Freezing and splitting produce
/// expressions again.
#[derive(Clone)]
pub struct Expression {
    core: CodeCore,
}

impl Expression {
    /// Start building an expression.
    pub fn builder(code: impl Into<String>) -> CodeBuilder<Self> {
        CodeBuilder::new(code)
    }

    /// Build an expression with an empty, exhaustive namespace.
    pub fn new(code: impl Into<String>) -> CodeResult<Self> {
        Self::builder(code).build()
    }
}

impl AnnotatedCode for Expression {
    fn core(&self) -> &CodeCore {
        &self.core
    }

    fn from_core(core: CodeCore) -> CodeResult<Self> {
        let arena = Bump::new();
        Parser::expression(core.code(), &arena).map_err(|errors| CodeError::Parse {
            code: core.code().to_string(),
            errors,
        })?;
        Ok(Self { core })
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expression").field(&self.code()).finish()
    }
}
