//! Construction of annotated code.

use std::marker::PhantomData;

use crate::code::CodeCore;
use crate::{AnnotatedCode, CodeOptions, CodeResult, Namespace};

/// Builder for [`CodeString`](crate::CodeString) and
/// [`Expression`](crate::Expression).
///
/// By default the given namespace is exhaustive: together with the units it
/// has to bind every external identifier. [`CodeBuilder::scope`] adds
/// caller-built snapshots of local and global bindings as lower-precedence
/// fallbacks.
///
/// ```
/// use modelcode::{AnnotatedCode, CodeString, Namespace};
///
/// let code = CodeString::builder("-(v - v_rest)/tau")
///     .namespace(Namespace::new().with("tau", 0.01))
///     .scope(Namespace::new().with("v_rest", -0.07), Namespace::new())
///     .build()
///     .unwrap();
/// assert!(!code.exhaustive());
/// code.resolve(["v"]).unwrap();
/// assert_eq!(code.namespace().unwrap().len(), 2);
/// ```
#[must_use]
pub struct CodeBuilder<T> {
    code: String,
    namespace: Namespace,
    scope: Option<(Namespace, Namespace)>,
    options: CodeOptions,
    _kind: PhantomData<fn() -> T>,
}

impl<T: AnnotatedCode> CodeBuilder<T> {
    pub(crate) fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            namespace: Namespace::new(),
            scope: None,
            options: CodeOptions::default(),
            _kind: PhantomData,
        }
    }

    /// The explicitly given namespace, highest in precedence.
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Snapshots of the caller's local and global bindings.
    ///
    /// Makes the code non-exhaustive.
    pub fn scope(mut self, locals: Namespace, globals: Namespace) -> Self {
        self.scope = Some((locals, globals));
        self
    }

    /// Drop any scope snapshots: the given namespace must be exhaustive.
    pub fn exhaustive(mut self) -> Self {
        self.scope = None;
        self
    }

    /// Options for the code and everything derived from it.
    pub fn options(mut self, options: CodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the code. Its identifiers are extracted immediately.
    ///
    /// # Errors
    ///
    /// [`CodeError::EmptyCode`](crate::CodeError::EmptyCode) for blank code,
    /// plus whatever validation the concrete type performs.
    pub fn build(self) -> CodeResult<T> {
        let core = CodeCore::new(self.code, self.namespace, self.scope, self.options)?;
        T::from_core(core)
    }
}
