//! The annotated-code abstraction.
//!
//! An [`AnnotatedCode`] pairs a string of model code with the namespaces its
//! identifiers are resolved from. Its life cycle has two states:
//!
//! ```text
//! built ──resolve(internal variables)──▶ resolved
//!                                          │
//!                                          ├─ eval / execute
//!                                          ├─ get_expr_dimensions / check_unit_against
//!                                          └─ frozen / split_stochastic ──▶ new resolved code
//! ```
//!
//! Resolution happens once. Freezing and splitting never touch the original:
//! they build new, already-resolved values of the same concrete type through
//! [`AnnotatedCode::with_resolved`].

use std::collections::BTreeSet;
use std::sync::{Mutex, OnceLock, PoisonError};

use bumpalo::Bump;
use modelcode_core::{Dimension, DimensionMismatchError, ParseErrors, Value};
use modelcode_parser::{Parser, get_identifiers, word_substitute};
use modelcode_symbolic::{Term, is_linear_in, split_affine};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::eval::{Evaluator, Mode, StatementCheck, check_statement};
use crate::resolve::{Sources, resolve_identifiers};
use crate::{CodeError, CodeOptions, CodeResult, Diagnostics, Namespace, VariableUnits};

// ============================================================================
// Shared state
// ============================================================================

/// State shared by every kind of annotated code.
pub struct CodeCore {
    code: String,
    identifiers: BTreeSet<String>,
    exhaustive: bool,
    given: Namespace,
    locals: Namespace,
    globals: Namespace,
    options: CodeOptions,
    resolved: OnceLock<Namespace>,
    resolve_lock: Mutex<()>,
}

impl CodeCore {
    /// Create unresolved state. `scope` holds the locals and globals
    /// snapshots; without one the given namespace is exhaustive.
    pub(crate) fn new(
        code: String,
        given: Namespace,
        scope: Option<(Namespace, Namespace)>,
        options: CodeOptions,
    ) -> CodeResult<Self> {
        if code.trim().is_empty() {
            return Err(CodeError::EmptyCode);
        }
        let identifiers = get_identifiers(&code);
        let exhaustive = scope.is_none();
        let (locals, globals) = scope.unwrap_or_default();
        Ok(Self {
            code,
            identifiers,
            exhaustive,
            given,
            locals,
            globals,
            options,
            resolved: OnceLock::new(),
            resolve_lock: Mutex::new(()),
        })
    }

    /// Create state that is already resolved to `namespace`.
    pub(crate) fn resolved(
        code: String,
        namespace: Namespace,
        options: CodeOptions,
    ) -> CodeResult<Self> {
        let core = Self::new(code, namespace.clone(), None, options)?;
        // Freshly built, so the cell is empty.
        let _ = core.resolved.set(namespace);
        Ok(core)
    }

    /// The code text.
    pub fn code(&self) -> &str {
        &self.code
    }

    fn require_resolved(&self) -> CodeResult<&Namespace> {
        self.resolved.get().ok_or_else(|| CodeError::NotResolved {
            code: self.code.clone(),
        })
    }

    fn parse_error(&self, errors: ParseErrors) -> CodeError {
        CodeError::Parse {
            code: self.code.clone(),
            errors,
        }
    }

    /// Evaluate the code as one expression over the resolved namespace.
    fn evaluate(&self, variables: &Namespace, mode: Mode) -> CodeResult<Value> {
        let namespace = self.require_resolved()?;
        let arena = Bump::new();
        let expr = Parser::expression(&self.code, &arena).map_err(|e| self.parse_error(e))?;
        Evaluator::new(namespace, variables, mode)
            .evaluate(expr)
            .map_err(|e| CodeError::eval(&self.code, e))
    }

    fn term(&self) -> CodeResult<Term> {
        Term::parse(&self.code).map_err(|e| CodeError::symbolic(&self.code, e))
    }

    fn resolve(&self, internal_variables: &FxHashSet<String>) -> CodeResult<Diagnostics> {
        // Check and set under one lock so concurrent callers cannot both
        // observe the unresolved state.
        let _guard = self
            .resolve_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.resolved.get().is_some() {
            return Err(CodeError::AlreadyResolved {
                code: self.code.clone(),
            });
        }
        let sources = Sources {
            given: &self.given,
            locals: &self.locals,
            globals: &self.globals,
            units: &self.options.units,
        };
        let (namespace, diagnostics) =
            resolve_identifiers(&self.code, &self.identifiers, &sources, internal_variables)?;
        if self.resolved.set(namespace).is_err() {
            return Err(CodeError::AlreadyResolved {
                code: self.code.clone(),
            });
        }
        Ok(diagnostics)
    }
}

impl Clone for CodeCore {
    fn clone(&self) -> Self {
        let resolved = OnceLock::new();
        if let Some(namespace) = self.resolved.get() {
            let _ = resolved.set(namespace.clone());
        }
        Self {
            code: self.code.clone(),
            identifiers: self.identifiers.clone(),
            exhaustive: self.exhaustive,
            given: self.given.clone(),
            locals: self.locals.clone(),
            globals: self.globals.clone(),
            options: self.options.clone(),
            resolved,
            resolve_lock: Mutex::new(()),
        }
    }
}

// ============================================================================
// AnnotatedCode
// ============================================================================

/// Code with a namespace: resolution, evaluation, unit checking and
/// symbolic analysis.
///
/// Implementors provide access to their [`CodeCore`] and a factory that
/// wraps a core in the concrete type; every operation is provided on top.
pub trait AnnotatedCode: Sized {
    /// The shared state.
    fn core(&self) -> &CodeCore;

    /// Wrap `core` in the concrete type, validating it as the type requires.
    fn from_core(core: CodeCore) -> CodeResult<Self>;

    /// Build an already-resolved value of the same type.
    ///
    /// The result is exhaustive, inherits the options of `self`, and uses
    /// `namespace` both as its given and its resolved namespace.
    fn with_resolved(&self, code: String, namespace: Namespace) -> CodeResult<Self> {
        let core = CodeCore::resolved(code, namespace, self.options().clone())?;
        Self::from_core(core)
    }

    /// The code text.
    fn code(&self) -> &str {
        &self.core().code
    }

    /// Every identifier in the code, sorted.
    fn identifiers(&self) -> &BTreeSet<String> {
        &self.core().identifiers
    }

    /// Whether the given namespace alone (plus units) must cover every
    /// external identifier.
    fn exhaustive(&self) -> bool {
        self.core().exhaustive
    }

    /// Whether the identifiers have been resolved.
    fn is_resolved(&self) -> bool {
        self.core().resolved.get().is_some()
    }

    /// The resolved namespace, `None` before resolution.
    fn namespace(&self) -> Option<&Namespace> {
        self.core().resolved.get()
    }

    /// The options the code was built with.
    fn options(&self) -> &CodeOptions {
        &self.core().options
    }

    /// Resolve every identifier that is not an internal variable.
    ///
    /// Internal variables stay unbound, to be supplied at evaluation time.
    /// Ambiguities are reported in the returned [`Diagnostics`] and logged.
    ///
    /// # Errors
    ///
    /// - [`CodeError::AlreadyResolved`] on a second call
    /// - [`CodeError::UnresolvedIdentifier`] when an external name has no binding
    fn resolve<I, S>(&self, internal_variables: I) -> CodeResult<Diagnostics>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let internal = internal_variables
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        self.core().resolve(&internal)
    }

    /// A copy with every scalar external value substituted into the code.
    ///
    /// Names bound to finite quantities are replaced by their SI magnitude
    /// and dropped from the namespace; functions, arrays and booleans stay
    /// bound. `self` is not modified.
    fn frozen(&self) -> CodeResult<Self> {
        let core = self.core();
        let namespace = core.require_resolved()?;
        let mut new_namespace = namespace.clone();
        let mut substitutions = FxHashMap::default();
        for identifier in &core.identifiers {
            let Some(value) = namespace.get(identifier).and_then(|v| v.as_scalar()) else {
                continue;
            };
            substitutions.insert(identifier.clone(), float_literal(value));
            new_namespace.remove(identifier);
        }
        let new_code = word_substitute(&core.code, &substitutions);
        debug!(
            code = %core.code,
            frozen = %new_code,
            substituted = substitutions.len(),
            "froze"
        );
        self.with_resolved(new_code, new_namespace)
    }

    /// Evaluate the expression numerically.
    ///
    /// `variables` override the resolved namespace. Dimensions are dropped,
    /// so the result is a plain SI magnitude.
    fn eval(&self, variables: &Namespace) -> CodeResult<Value> {
        self.core().evaluate(variables, Mode::Numeric)
    }

    /// The physical dimension of the expression, given the dimensions of
    /// the internal variables.
    ///
    /// # Errors
    ///
    /// [`CodeError::DimensionMismatch`] when the expression is inconsistent.
    fn get_expr_dimensions(&self, variable_units: &VariableUnits) -> CodeResult<Dimension> {
        let stand_ins = Namespace::from_units(variable_units);
        let value = self.core().evaluate(&stand_ins, Mode::Checked)?;
        Ok(value.dimension().unwrap_or(Dimension::DIMENSIONLESS))
    }

    /// Check that the expression has dimension `expected`.
    fn check_unit_against(
        &self,
        expected: Dimension,
        variable_units: &VariableUnits,
    ) -> CodeResult<()> {
        let computed = self.get_expr_dimensions(variable_units)?;
        if computed != expected {
            return Err(CodeError::DimensionMismatch {
                code: self.code().to_string(),
                source: DimensionMismatchError::new(
                    "Dimensions of expression does not match its definition",
                    computed,
                    expected,
                ),
            });
        }
        Ok(())
    }

    /// Whether the expression is linear in `variable`, treating every other
    /// identifier as a constant.
    fn check_linearity(&self, variable: &str) -> CodeResult<bool> {
        let term = self.core().term()?;
        Ok(is_linear_in(&term, variable))
    }

    /// Split the expression into a drift and a diffusion term around the
    /// noise symbol: `f + g*xi` becomes `(f, Some(g*xi))`.
    ///
    /// Without the noise symbol the result is `(self.clone(), None)`, even
    /// for code the symbolic backend cannot represent (comparisons). When
    /// the noise cancels out, the diffusion term is `None`. Both parts carry
    /// a copy of the resolved namespace.
    ///
    /// # Errors
    ///
    /// - [`CodeError::NonSeparable`] when the code is not affine in the noise
    /// - [`CodeError::NotResolved`] when a split is needed before resolution
    fn split_stochastic(&self) -> CodeResult<(Self, Option<Self>)>
    where
        Self: Clone,
    {
        let symbol = &self.options().noise_symbol;
        if !self.identifiers().contains(symbol) {
            return Ok((self.clone(), None));
        }
        let term = self.core().term()?;
        let split =
            split_affine(&term, symbol).map_err(|e| CodeError::symbolic(self.code(), e))?;
        let Some((drift, diffusion)) = split else {
            return Ok((self.clone(), None));
        };
        let namespace = self.core().require_resolved()?;
        debug!(code = self.code(), %drift, %diffusion, "split stochastic");

        let drift = self.with_resolved(drift.to_string(), namespace.clone())?;
        if diffusion.is_zero() {
            return Ok((drift, None));
        }
        let diffusion = self.with_resolved(diffusion.to_string(), namespace.clone())?;
        Ok((drift, Some(diffusion)))
    }

    /// Run the code as a block of statements.
    ///
    /// Statements run in order on a copy of `variables`; the updated copy
    /// is returned. Assignments always bind into the returned namespace.
    fn execute(&self, variables: &Namespace) -> CodeResult<Namespace> {
        let code = self.code();
        let namespace = self.core().require_resolved()?;
        let arena = Bump::new();
        let stmts =
            Parser::statements(code, &arena).map_err(|e| self.core().parse_error(e))?;
        let mut state = variables.clone();
        for stmt in stmts {
            let assignment = Evaluator::new(namespace, &state, Mode::Numeric)
                .execute(stmt)
                .map_err(|e| CodeError::eval(code, e))?;
            if let Some((name, value)) = assignment {
                state.insert(name, value);
            }
        }
        Ok(state)
    }

    /// Check the dimensions of every statement in a block.
    ///
    /// # Errors
    ///
    /// - [`CodeError::UnknownVariable`] when a statement assigns to a name
    ///   missing from `variable_units`
    /// - [`CodeError::DimensionMismatch`] when a right-hand side has the
    ///   wrong dimension
    fn check_statement_units(&self, variable_units: &VariableUnits) -> CodeResult<()> {
        let code = self.code();
        let namespace = self.core().require_resolved()?;
        let arena = Bump::new();
        let stmts =
            Parser::statements(code, &arena).map_err(|e| self.core().parse_error(e))?;
        let stand_ins = Namespace::from_units(variable_units);
        for stmt in stmts {
            check_statement(namespace, &stand_ins, variable_units, stmt).map_err(|e| match e {
                StatementCheck::Eval(e) => CodeError::eval(code, e),
                StatementCheck::UnknownTarget(variable) => CodeError::UnknownVariable {
                    variable,
                    code: code.to_string(),
                },
            })?;
        }
        Ok(())
    }
}

/// Render a frozen value so that it reads back as the same number.
fn float_literal(value: f64) -> String {
    let text = format!("{value:?}");
    if value.is_sign_negative() {
        format!("({text})")
    } else {
        text
    }
}
