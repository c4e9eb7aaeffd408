//! Plain code strings: expressions or statement blocks.

use std::fmt;

use crate::builder::CodeBuilder;
use crate::code::CodeCore;
use crate::{AnnotatedCode, CodeResult};

/// A string of model code with an attached namespace.
///
/// The code may be a single expression, such as a threshold condition
/// `v > v_th`, or a block of statements, such as a reset
/// `v = v_reset; w += b`. Expressions support every [`AnnotatedCode`]
/// operation; blocks are run with [`AnnotatedCode::execute`].
#[derive(Clone)]
pub struct CodeString {
    core: CodeCore,
}

impl CodeString {
    /// Start building a code string.
    pub fn builder(code: impl Into<String>) -> CodeBuilder<Self> {
        CodeBuilder::new(code)
    }

    /// Build a code string with an empty, exhaustive namespace.
    pub fn new(code: impl Into<String>) -> CodeResult<Self> {
        Self::builder(code).build()
    }
}

impl AnnotatedCode for CodeString {
    fn core(&self) -> &CodeCore {
        &self.core
    }

    fn from_core(core: CodeCore) -> CodeResult<Self> {
        Ok(Self { core })
    }
}

impl fmt::Display for CodeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Debug for CodeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CodeString").field(&self.code()).finish()
    }
}
