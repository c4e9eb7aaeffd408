//! Mathematical constants and functions of the units namespace.
//!
//! Functions check dimensions the way physical code needs: transcendental
//! functions accept only dimensionless arguments, `sqrt` halves exponents,
//! and `abs`/`floor`/`ceil` keep the argument's dimension. All of them work
//! element-wise on arrays.

use modelcode_core::{Dimension, DimensionMismatchError, EvalError, Value};

use crate::registry::UnitRegistry;

// =============================================================================
// CONSTANTS
// =============================================================================

const CONSTANTS: [(&str, f64); 3] = [
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("inf", f64::INFINITY),
];

// =============================================================================
// FUNCTIONS
// =============================================================================

/// Functions whose argument must be dimensionless.
const DIMENSIONLESS_FUNCTIONS: [(&str, fn(f64) -> f64); 12] = [
    ("sin", f64::sin),
    ("cos", f64::cos),
    ("tan", f64::tan),
    ("arcsin", f64::asin),
    ("arccos", f64::acos),
    ("arctan", f64::atan),
    ("sinh", f64::sinh),
    ("cosh", f64::cosh),
    ("tanh", f64::tanh),
    ("exp", f64::exp),
    ("log", f64::ln),
    ("log10", f64::log10),
];

/// Functions that keep the dimension of their argument.
const DIMENSION_PRESERVING_FUNCTIONS: [(&str, fn(f64) -> f64); 3] =
    [("abs", f64::abs), ("floor", f64::floor), ("ceil", f64::ceil)];

fn single_arg<'a>(name: &str, args: &'a [Value]) -> Result<&'a Value, EvalError> {
    match args {
        [arg] => Ok(arg),
        _ => Err(EvalError::Arity {
            name: name.to_string(),
            expected: 1,
            found: args.len(),
        }),
    }
}

fn dimensionless_function(name: &'static str, f: fn(f64) -> f64) -> Value {
    Value::function(name, 1, move |args| {
        let arg = single_arg(name, args)?;
        let dim = arg.dimension().unwrap_or(Dimension::DIMENSIONLESS);
        if !dim.is_dimensionless() {
            return Err(DimensionMismatchError::not_dimensionless(
                format!("Argument of {name} must be dimensionless"),
                dim,
            )
            .into());
        }
        arg.map_elements(name, Dimension::DIMENSIONLESS, f)
    })
}

fn dimension_preserving_function(name: &'static str, f: fn(f64) -> f64) -> Value {
    Value::function(name, 1, move |args| {
        let arg = single_arg(name, args)?;
        let dim = arg.dimension().unwrap_or(Dimension::DIMENSIONLESS);
        arg.map_elements(name, dim, f)
    })
}

fn sqrt_function() -> Value {
    Value::function("sqrt", 1, |args| {
        let arg = single_arg("sqrt", args)?;
        let dim = arg.dimension().unwrap_or(Dimension::DIMENSIONLESS);
        arg.map_elements("sqrt", dim.powf(0.5), f64::sqrt)
    })
}

/// Register constants and functions, replacing any unit of the same name.
pub(crate) fn register(registry: &mut UnitRegistry) {
    for (name, value) in CONSTANTS {
        registry.insert(name, Value::scalar(value));
    }
    for (name, f) in DIMENSIONLESS_FUNCTIONS {
        registry.insert(name, dimensionless_function(name, f));
    }
    for (name, f) in DIMENSION_PRESERVING_FUNCTIONS {
        registry.insert(name, dimension_preserving_function(name, f));
    }
    registry.insert("sqrt", sqrt_function());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, arg: Value) -> Result<Value, EvalError> {
        let mut registry = UnitRegistry::new();
        register(&mut registry);
        match registry.get(name).map(|v| v.as_ref()) {
            Some(Value::Function(f)) => f.call(&[arg]),
            other => panic!("{name}: expected a function, got {other:?}"),
        }
    }

    #[test]
    fn exp_of_dimensionless() {
        let result = call("exp", Value::scalar(0.0)).unwrap();
        assert_eq!(result.as_scalar(), Some(1.0));
    }

    #[test]
    fn exp_rejects_dimensions() {
        let err = call("exp", Value::quantity(1.0, Dimension::VOLTAGE)).unwrap_err();
        match err {
            EvalError::DimensionMismatch(mismatch) => {
                assert_eq!(mismatch.computed, Dimension::VOLTAGE);
                assert_eq!(mismatch.expected, Dimension::DIMENSIONLESS);
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
    }

    #[test]
    fn sqrt_halves_dimension() {
        let area = Value::quantity(4.0, Dimension::LENGTH.powf(2.0));
        let result = call("sqrt", area).unwrap();
        assert_eq!(result.as_scalar(), Some(2.0));
        assert_eq!(result.dimension(), Some(Dimension::LENGTH));
    }

    #[test]
    fn abs_keeps_dimension_elementwise() {
        let values = Value::array(vec![-1.0, 2.0], Dimension::VOLTAGE);
        match call("abs", values).unwrap() {
            Value::Array(array) => {
                assert_eq!(array.values, vec![1.0, 2.0]);
                assert_eq!(array.dim, Dimension::VOLTAGE);
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn wrong_arity() {
        let mut registry = UnitRegistry::new();
        register(&mut registry);
        let Some(Value::Function(sin)) = registry.get("sin").map(|v| v.as_ref()) else {
            panic!("sin missing");
        };
        assert!(matches!(
            sin.call(&[]),
            Err(EvalError::Arity { expected: 1, found: 0, .. })
        ));
    }

    #[test]
    fn constants_are_dimensionless() {
        let mut registry = UnitRegistry::new();
        register(&mut registry);
        let pi = registry.get("pi").map(|v| v.as_scalar());
        assert_eq!(pi, Some(Some(std::f64::consts::PI)));
        let inf = registry.get("inf").map(|v| v.dimension());
        assert_eq!(inf, Some(Some(Dimension::DIMENSIONLESS)));
    }
}
