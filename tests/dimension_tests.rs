//! Dimension checking of expressions and statements.

use modelcode::{
    AnnotatedCode, CodeError, CodeString, Dimension, Expression, Namespace, Value, VariableUnits,
    default_unit_namespace, get_dimensions,
};

fn units(entries: &[(&str, Dimension)]) -> VariableUnits {
    entries
        .iter()
        .map(|(name, dim)| (name.to_string(), *dim))
        .collect()
}

fn leaky_integrator() -> Expression {
    let expr = Expression::builder("(E_L - v)/tau")
        .namespace(
            Namespace::new()
                .with("E_L", Value::quantity(-0.07, Dimension::VOLTAGE))
                .with("tau", Value::quantity(0.01, Dimension::TIME)),
        )
        .build()
        .unwrap();
    expr.resolve(["v"]).unwrap();
    expr
}

#[test]
fn expression_dimensions() {
    let expr = leaky_integrator();
    let dim = expr
        .get_expr_dimensions(&units(&[("v", Dimension::VOLTAGE)]))
        .unwrap();
    assert_eq!(dim, Dimension::VOLTAGE / Dimension::TIME);
}

#[test]
fn check_unit_against_matching_dimension() {
    let expr = leaky_integrator();
    let volt_per_second = get_dimensions(default_unit_namespace().get("V").unwrap()).unwrap()
        / Dimension::TIME;
    expr.check_unit_against(volt_per_second, &units(&[("v", Dimension::VOLTAGE)]))
        .unwrap();
}

#[test]
fn check_unit_against_reports_both_dimensions() {
    let code = CodeString::builder("x * 2")
        .namespace(Namespace::new().with("x", Value::quantity(1.0, Dimension::LENGTH)))
        .build()
        .unwrap();
    code.resolve(Vec::<&str>::new()).unwrap();
    let err = code
        .check_unit_against(Dimension::TIME, &VariableUnits::default())
        .unwrap_err();
    let mismatch = err.as_dimension_mismatch().unwrap();
    assert_eq!(mismatch.computed, Dimension::LENGTH);
    assert_eq!(mismatch.expected, Dimension::TIME);
    assert!(matches!(&err, CodeError::DimensionMismatch { code, .. } if code == "x * 2"));
}

#[test]
fn inconsistent_sum_is_a_mismatch() {
    let expr = leaky_integrator();
    let err = expr
        .get_expr_dimensions(&units(&[("v", Dimension::TIME)]))
        .unwrap_err();
    assert!(err.as_dimension_mismatch().is_some());
}

#[test]
fn variable_units_override_the_namespace() {
    let expr = Expression::builder("x / ms")
        .namespace(Namespace::new().with("x", Value::quantity(1.0, Dimension::VOLTAGE)))
        .build()
        .unwrap();
    expr.resolve(Vec::<&str>::new()).unwrap();
    let dim = expr
        .get_expr_dimensions(&units(&[("x", Dimension::LENGTH)]))
        .unwrap();
    assert_eq!(dim, Dimension::LENGTH / Dimension::TIME);
}

#[test]
fn white_noise_dimensions() {
    let expr = Expression::builder("sigma*xi*tau**-0.5")
        .namespace(
            Namespace::new()
                .with("sigma", Value::quantity(0.001, Dimension::VOLTAGE))
                .with("tau", Value::quantity(0.01, Dimension::TIME)),
        )
        .build()
        .unwrap();
    expr.resolve(["xi"]).unwrap();
    let noise = units(&[("xi", Dimension::TIME.powf(-0.5))]);
    expr.check_unit_against(Dimension::VOLTAGE / Dimension::TIME, &noise)
        .unwrap();
}

#[test]
fn transcendental_functions_need_dimensionless_arguments() {
    let expr = Expression::new("exp(-t/ms) + exp(t)").unwrap();
    expr.resolve(["t"]).unwrap();
    let err = expr
        .get_expr_dimensions(&units(&[("t", Dimension::TIME)]))
        .unwrap_err();
    let mismatch = err.as_dimension_mismatch().unwrap();
    assert_eq!(mismatch.computed, Dimension::TIME);
}

#[test]
fn dimension_check_requires_resolution() {
    let expr = Expression::new("v").unwrap();
    assert!(matches!(
        expr.get_expr_dimensions(&VariableUnits::default()),
        Err(CodeError::NotResolved { .. })
    ));
}

// ============================================================================
// Statements
// ============================================================================

fn reset() -> CodeString {
    let code = CodeString::builder("v = v_reset; w += b")
        .namespace(
            Namespace::new()
                .with("v_reset", Value::quantity(-0.06, Dimension::VOLTAGE))
                .with("b", Value::quantity(1e-11, Dimension::CURRENT)),
        )
        .build()
        .unwrap();
    code.resolve(["v", "w"]).unwrap();
    code
}

#[test]
fn statement_units_consistent() {
    let code = reset();
    code.check_statement_units(&units(&[
        ("v", Dimension::VOLTAGE),
        ("w", Dimension::CURRENT),
    ]))
    .unwrap();
}

#[test]
fn statement_units_mismatch() {
    let code = reset();
    let err = code
        .check_statement_units(&units(&[
            ("v", Dimension::VOLTAGE),
            ("w", Dimension::VOLTAGE),
        ]))
        .unwrap_err();
    let mismatch = err.as_dimension_mismatch().unwrap();
    assert_eq!(mismatch.computed, Dimension::CURRENT);
    assert_eq!(mismatch.expected, Dimension::VOLTAGE);
}

#[test]
fn statement_assigning_an_unknown_variable() {
    let code = reset();
    let err = code
        .check_statement_units(&units(&[("v", Dimension::VOLTAGE)]))
        .unwrap_err();
    assert_eq!(
        err,
        CodeError::UnknownVariable {
            variable: "w".into(),
            code: "v = v_reset; w += b".into(),
        }
    );
}

#[test]
fn scaling_statements_need_dimensionless_factors() {
    let code = CodeString::builder("w *= 1 - decay\ng /= 2*mV")
        .namespace(Namespace::new().with("decay", 0.1))
        .build()
        .unwrap();
    code.resolve(["w", "g"]).unwrap();
    let err = code
        .check_statement_units(&units(&[
            ("w", Dimension::CURRENT),
            ("g", Dimension::CONDUCTANCE),
        ]))
        .unwrap_err();
    let mismatch = err.as_dimension_mismatch().unwrap();
    assert_eq!(mismatch.computed, Dimension::VOLTAGE);
    assert!(mismatch.expected.is_dimensionless());
}
