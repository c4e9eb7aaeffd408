//! Runtime values bound to identifiers in model code.
//!
//! [`Value`] is the tagged union every namespace maps names to: a
//! dimension-tagged scalar, a boolean, a dimension-tagged array, or a
//! native function. Arithmetic on values propagates dimensions and fails
//! with a [`DimensionMismatchError`] when operands disagree, so the same
//! operations serve numeric evaluation (dimensions stripped up front) and
//! unit checking (dimensions kept).

use std::fmt;
use std::sync::Arc;

use crate::{Dimension, DimensionMismatchError, EvalError};

/// A scalar magnitude in SI base units with its physical dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    /// Magnitude in SI base units.
    pub value: f64,
    /// Physical dimension.
    pub dim: Dimension,
}

impl Quantity {
    /// Create a quantity.
    pub const fn new(value: f64, dim: Dimension) -> Self {
        Self { value, dim }
    }

    /// Create a dimensionless quantity.
    pub const fn dimensionless(value: f64) -> Self {
        Self::new(value, Dimension::DIMENSIONLESS)
    }
}

impl From<Quantity> for Dimension {
    fn from(quantity: Quantity) -> Self {
        quantity.dim
    }
}

impl From<&Quantity> for Dimension {
    fn from(quantity: &Quantity) -> Self {
        quantity.dim
    }
}

/// A dimension-tagged array of magnitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    /// Element magnitudes in SI base units.
    pub values: Vec<f64>,
    /// Dimension shared by every element.
    pub dim: Dimension,
}

/// Signature of a native function bound in a namespace.
pub type NativeFn = Arc<dyn Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync>;

/// A named native function with a fixed arity.
#[derive(Clone)]
pub struct Function {
    name: String,
    arity: usize,
    call: NativeFn,
}

impl Function {
    /// Wrap a closure as a function value.
    pub fn new<F>(name: impl Into<String>, arity: usize, call: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            call: Arc::new(call),
        }
    }

    /// The function's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of arguments the function takes.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Call the function after checking the argument count.
    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        if args.len() != self.arity {
            return Err(EvalError::Arity {
                name: self.name.clone(),
                expected: self.arity,
                found: args.len(),
            });
        }
        (self.call)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}/{}>", self.name, self.arity)
    }
}

/// Comparison operators understood by [`Value::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl Comparison {
    fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Less => lhs < rhs,
            Comparison::LessEqual => lhs <= rhs,
            Comparison::Greater => lhs > rhs,
            Comparison::GreaterEqual => lhs >= rhs,
            Comparison::Equal => lhs == rhs,
            Comparison::NotEqual => lhs != rhs,
        }
    }
}

/// A value bound to an identifier.
#[derive(Debug, Clone)]
pub enum Value {
    /// Dimension-tagged scalar.
    Quantity(Quantity),
    /// Boolean (result of comparisons and logical operators).
    Bool(bool),
    /// Dimension-tagged array.
    Array(Array),
    /// Native function.
    Function(Function),
}

/// Borrowed numeric view of a value, used for broadcasting.
enum Numbers<'a> {
    Scalar(f64),
    Array(&'a [f64]),
}

impl Value {
    /// A dimensionless scalar.
    pub fn scalar(value: f64) -> Self {
        Value::Quantity(Quantity::dimensionless(value))
    }

    /// A scalar with a dimension.
    pub fn quantity(value: f64, dim: Dimension) -> Self {
        Value::Quantity(Quantity::new(value, dim))
    }

    /// An array with a dimension.
    pub fn array(values: Vec<f64>, dim: Dimension) -> Self {
        Value::Array(Array { values, dim })
    }

    /// A native function.
    pub fn function<F>(name: impl Into<String>, arity: usize, call: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Value::Function(Function::new(name, arity, call))
    }

    /// Name of the value's kind, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Quantity(_) => "quantity",
            Value::Bool(_) => "bool",
            Value::Array(_) => "array",
            Value::Function(_) => "function",
        }
    }

    /// The value as a finite floating-point scalar, if it is one.
    ///
    /// Quantities of any dimension coerce to their SI magnitude. Booleans,
    /// arrays, functions and non-finite magnitudes do not coerce.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Quantity(q) if q.value.is_finite() => Some(q.value),
            _ => None,
        }
    }

    /// The physical dimension of the value; `None` for functions.
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            Value::Quantity(q) => Some(q.dim),
            Value::Array(a) => Some(a.dim),
            Value::Bool(_) => Some(Dimension::DIMENSIONLESS),
            Value::Function(_) => None,
        }
    }

    /// A copy of the value with its dimension dropped.
    pub fn without_dimension(&self) -> Value {
        match self {
            Value::Quantity(q) => Value::scalar(q.value),
            Value::Array(a) => Value::array(a.values.clone(), Dimension::DIMENSIONLESS),
            other => other.clone(),
        }
    }

    /// Truth value for logical operators.
    pub fn is_truthy(&self) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Quantity(q) => Ok(q.value != 0.0),
            other => Err(EvalError::type_error(
                "truth test",
                format!("{} has no truth value", other.type_name()),
            )),
        }
    }

    fn numbers(&self, op: &str) -> Result<(Numbers<'_>, Dimension), EvalError> {
        match self {
            Value::Quantity(q) => Ok((Numbers::Scalar(q.value), q.dim)),
            Value::Bool(b) => Ok((
                Numbers::Scalar(if *b { 1.0 } else { 0.0 }),
                Dimension::DIMENSIONLESS,
            )),
            Value::Array(a) => Ok((Numbers::Array(&a.values), a.dim)),
            Value::Function(f) => Err(EvalError::type_error(
                op,
                format!("function '{}' used as a number", f.name()),
            )),
        }
    }

    fn zip_with(
        &self,
        rhs: &Value,
        op: &str,
        dim: impl Fn(Dimension, Dimension) -> Result<Dimension, EvalError>,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Value, EvalError> {
        let (lhs, lhs_dim) = self.numbers(op)?;
        let (rhs, rhs_dim) = rhs.numbers(op)?;
        let dim = dim(lhs_dim, rhs_dim)?;
        let result = match (lhs, rhs) {
            (Numbers::Scalar(a), Numbers::Scalar(b)) => Value::quantity(f(a, b), dim),
            (Numbers::Scalar(a), Numbers::Array(b)) => {
                Value::array(b.iter().map(|b| f(a, *b)).collect(), dim)
            }
            (Numbers::Array(a), Numbers::Scalar(b)) => {
                Value::array(a.iter().map(|a| f(*a, b)).collect(), dim)
            }
            (Numbers::Array(a), Numbers::Array(b)) => {
                if a.len() != b.len() {
                    return Err(EvalError::Shape {
                        left: a.len(),
                        right: b.len(),
                    });
                }
                Value::array(a.iter().zip(b).map(|(a, b)| f(*a, *b)).collect(), dim)
            }
        };
        Ok(result)
    }

    fn same_dimension(
        message: &'static str,
    ) -> impl Fn(Dimension, Dimension) -> Result<Dimension, EvalError> {
        move |lhs, rhs| {
            if lhs == rhs {
                Ok(lhs)
            } else {
                Err(DimensionMismatchError::new(message, lhs, rhs).into())
            }
        }
    }

    /// `self + rhs`; dimensions must agree.
    pub fn add(&self, rhs: &Value) -> Result<Value, EvalError> {
        self.zip_with(rhs, "+", Self::same_dimension("Addition"), |a, b| a + b)
    }

    /// `self - rhs`; dimensions must agree.
    pub fn sub(&self, rhs: &Value) -> Result<Value, EvalError> {
        self.zip_with(rhs, "-", Self::same_dimension("Subtraction"), |a, b| a - b)
    }

    /// `self * rhs`; dimensions multiply.
    pub fn mul(&self, rhs: &Value) -> Result<Value, EvalError> {
        self.zip_with(rhs, "*", |a, b| Ok(a * b), |a, b| a * b)
    }

    /// `self / rhs`; dimensions divide.
    pub fn div(&self, rhs: &Value) -> Result<Value, EvalError> {
        self.zip_with(rhs, "/", |a, b| Ok(a / b), |a, b| a / b)
    }

    /// `self % rhs` with the sign of the divisor; dimensions must agree.
    pub fn rem(&self, rhs: &Value) -> Result<Value, EvalError> {
        self.zip_with(rhs, "%", Self::same_dimension("Modulo"), |a, b| {
            a - b * (a / b).floor()
        })
    }

    /// `self ** rhs`.
    ///
    /// The exponent must be dimensionless. A dimensional base needs a
    /// scalar exponent, since every element of the result has to carry
    /// the same dimension.
    pub fn pow(&self, rhs: &Value) -> Result<Value, EvalError> {
        let (exponent, exponent_dim) = rhs.numbers("**")?;
        if !exponent_dim.is_dimensionless() {
            return Err(DimensionMismatchError::not_dimensionless(
                "Exponent must be dimensionless",
                exponent_dim,
            )
            .into());
        }
        let base_dim = self.numbers("**")?.1;
        let result_dim = match exponent {
            Numbers::Scalar(e) => base_dim.powf(e),
            Numbers::Array(_) if base_dim.is_dimensionless() => Dimension::DIMENSIONLESS,
            Numbers::Array(_) => {
                return Err(EvalError::type_error(
                    "**",
                    "array exponent on a dimensional base",
                ));
            }
        };
        self.zip_with(rhs, "**", |_, _| Ok(result_dim), f64::powf)
    }

    /// `-self`.
    pub fn neg(&self) -> Result<Value, EvalError> {
        match self.numbers("unary -")? {
            (Numbers::Scalar(v), dim) => Ok(Value::quantity(-v, dim)),
            (Numbers::Array(values), dim) => {
                Ok(Value::array(values.iter().map(|v| -v).collect(), dim))
            }
        }
    }

    /// Apply `f` to every magnitude, tagging the result with `dim`.
    ///
    /// Booleans are treated as 0 or 1. Used by element-wise native functions.
    pub fn map_elements(
        &self,
        op: &str,
        dim: Dimension,
        f: impl Fn(f64) -> f64,
    ) -> Result<Value, EvalError> {
        match self.numbers(op)?.0 {
            Numbers::Scalar(v) => Ok(Value::quantity(f(v), dim)),
            Numbers::Array(values) => Ok(Value::array(values.iter().map(|v| f(*v)).collect(), dim)),
        }
    }

    /// Compare two scalars; dimensions must agree.
    pub fn compare(&self, op: Comparison, rhs: &Value) -> Result<Value, EvalError> {
        if let (Value::Bool(a), Value::Bool(b)) = (self, rhs) {
            return match op {
                Comparison::Equal => Ok(Value::Bool(a == b)),
                Comparison::NotEqual => Ok(Value::Bool(a != b)),
                _ => Err(EvalError::type_error("comparison", "ordering of booleans")),
            };
        }
        let (lhs, lhs_dim) = self.numbers("comparison")?;
        let (rhs, rhs_dim) = rhs.numbers("comparison")?;
        if lhs_dim != rhs_dim {
            return Err(DimensionMismatchError::new("Comparison", lhs_dim, rhs_dim).into());
        }
        match (lhs, rhs) {
            (Numbers::Scalar(a), Numbers::Scalar(b)) => Ok(Value::Bool(op.apply(a, b))),
            _ => Err(EvalError::type_error("comparison", "arrays cannot be compared")),
        }
    }
}

impl From<Quantity> for Value {
    fn from(quantity: Quantity) -> Self {
        Value::Quantity(quantity)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::scalar(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Quantity(q) if q.dim.is_dimensionless() => write!(f, "{}", q.value),
            Value::Quantity(q) => write!(f, "{} {}", q.value, q.dim),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Array(a) if a.dim.is_dimensionless() => write!(f, "{:?}", a.values),
            Value::Array(a) => write!(f, "{:?} {}", a.values, a.dim),
            Value::Function(func) => write!(f, "{func:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millivolts(value: f64) -> Value {
        Value::quantity(value * 1e-3, Dimension::VOLTAGE)
    }

    #[test]
    fn addition_requires_matching_dimensions() {
        let sum = millivolts(10.0).add(&millivolts(5.0)).unwrap();
        assert_eq!(sum.dimension(), Some(Dimension::VOLTAGE));

        let err = millivolts(10.0)
            .add(&Value::quantity(1.0, Dimension::TIME))
            .unwrap_err();
        match err {
            EvalError::DimensionMismatch(mismatch) => {
                assert_eq!(mismatch.computed, Dimension::VOLTAGE);
                assert_eq!(mismatch.expected, Dimension::TIME);
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
    }

    #[test]
    fn products_combine_dimensions() {
        let current = Value::quantity(2.0, Dimension::CURRENT);
        let resistance = Value::quantity(3.0, Dimension::RESISTANCE);
        let voltage = current.mul(&resistance).unwrap();
        assert_eq!(voltage.as_scalar(), Some(6.0));
        assert_eq!(voltage.dimension(), Some(Dimension::VOLTAGE));

        let rate = Value::scalar(1.0).div(&Value::quantity(0.01, Dimension::TIME)).unwrap();
        assert_eq!(rate.dimension(), Some(Dimension::FREQUENCY));
    }

    #[test]
    fn power_scales_dimension() {
        let length = Value::quantity(4.0, Dimension::LENGTH);
        let area = length.pow(&Value::scalar(2.0)).unwrap();
        assert_eq!(area.as_scalar(), Some(16.0));
        assert_eq!(area.dimension(), Some(Dimension::LENGTH.powf(2.0)));

        let err = length.pow(&Value::quantity(2.0, Dimension::TIME)).unwrap_err();
        assert!(matches!(err, EvalError::DimensionMismatch(_)));
    }

    #[test]
    fn arrays_broadcast_against_scalars() {
        let weights = Value::array(vec![1.0, 2.0, 3.0], Dimension::CONDUCTANCE);
        let scaled = weights.mul(&Value::scalar(2.0)).unwrap();
        match scaled {
            Value::Array(a) => {
                assert_eq!(a.values, vec![2.0, 4.0, 6.0]);
                assert_eq!(a.dim, Dimension::CONDUCTANCE);
            }
            other => panic!("expected array, got {other:?}"),
        }

        let short = Value::array(vec![1.0], Dimension::CONDUCTANCE);
        assert!(matches!(
            weights.add(&short),
            Err(EvalError::Shape { left: 3, right: 1 })
        ));
    }

    #[test]
    fn comparisons_check_dimensions() {
        let result = millivolts(-50.0)
            .compare(Comparison::Greater, &millivolts(-55.0))
            .unwrap();
        assert!(matches!(result, Value::Bool(true)));

        let err = millivolts(1.0)
            .compare(Comparison::Less, &Value::scalar(1.0))
            .unwrap_err();
        assert!(matches!(err, EvalError::DimensionMismatch(_)));
    }

    #[test]
    fn scalar_coercion() {
        assert_eq!(Value::quantity(0.003, Dimension::VOLTAGE).as_scalar(), Some(0.003));
        assert_eq!(Value::scalar(f64::INFINITY).as_scalar(), None);
        assert_eq!(Value::Bool(true).as_scalar(), None);
        assert_eq!(Value::array(vec![1.0], Dimension::DIMENSIONLESS).as_scalar(), None);
    }

    #[test]
    fn function_checks_arity() {
        let double = Function::new("double", 1, |args| args[0].mul(&Value::scalar(2.0)));
        assert_eq!(double.call(&[Value::scalar(2.0)]).unwrap().as_scalar(), Some(4.0));
        assert!(matches!(
            double.call(&[]),
            Err(EvalError::Arity { expected: 1, found: 0, .. })
        ));
    }

    #[test]
    fn remainder_follows_divisor_sign() {
        let r = Value::scalar(-7.0).rem(&Value::scalar(3.0)).unwrap();
        assert_eq!(r.as_scalar(), Some(2.0));
    }
}
