//! Numeric evaluation of expressions and statement blocks.

use modelcode::{AnnotatedCode, CodeError, CodeString, Dimension, Namespace, Value};

fn resolved(code: &str, namespace: Namespace, internal: &[&str]) -> CodeString {
    let code = CodeString::builder(code).namespace(namespace).build().unwrap();
    code.resolve(internal).unwrap();
    code
}

#[test]
fn threshold_condition() {
    let threshold = resolved(
        "v > v_th",
        Namespace::new().with("v_th", Value::quantity(-0.05, Dimension::VOLTAGE)),
        &["v"],
    );
    let below = Namespace::new().with("v", -0.06);
    let above = Namespace::new().with("v", -0.04);
    assert!(matches!(threshold.eval(&below).unwrap(), Value::Bool(false)));
    assert!(matches!(threshold.eval(&above).unwrap(), Value::Bool(true)));
}

#[test]
fn arrays_broadcast() {
    let code = resolved("w * scale", Namespace::new().with("scale", 2.0), &["w"]);
    let vars = Namespace::new().with("w", Value::array(vec![1.0, 2.0, 3.0], Dimension::DIMENSIONLESS));
    match code.eval(&vars).unwrap() {
        Value::Array(a) => assert_eq!(a.values, vec![2.0, 4.0, 6.0]),
        other => panic!("expected an array, got {other:?}"),
    }
}

#[test]
fn evaluation_errors_carry_the_code() {
    let code = resolved("f(1)", Namespace::new().with("f", 3.0), &[]);
    let err = code.eval(&Namespace::new()).unwrap_err();
    assert!(matches!(&err, CodeError::Eval { code, .. } if code == "f(1)"));

    let code = resolved("v + 1", Namespace::new(), &["v"]);
    assert!(matches!(
        code.eval(&Namespace::new()),
        Err(CodeError::Eval { .. })
    ));
}

#[test]
fn eval_of_a_statement_block_is_a_parse_error() {
    let code = resolved("v = 0", Namespace::new(), &["v"]);
    let err = code.eval(&Namespace::new()).unwrap_err();
    assert!(matches!(err, CodeError::Parse { .. }));
    assert!(err.display_with_source().contains("1 | v = 0"));
}

#[test]
fn statements_run_in_order() {
    let code = resolved(
        "# adaptation reset\nv = v_reset\nw += b * (1 + v)  # uses new v\ncount += 1",
        Namespace::new().with("v_reset", -1.0).with("b", 0.5),
        &["v", "w", "count"],
    );
    let state = Namespace::new().with("v", 3.0).with("w", 1.0).with("count", 0.0);
    let state = code.execute(&state).unwrap();
    assert_eq!(state.get("v").unwrap().as_scalar(), Some(-1.0));
    assert_eq!(state.get("w").unwrap().as_scalar(), Some(1.0));
    assert_eq!(state.get("count").unwrap().as_scalar(), Some(1.0));
}

#[test]
fn execute_leaves_input_untouched() {
    let code = resolved("v = 0; x = v + 1", Namespace::new(), &["v", "x"]);
    let input = Namespace::new().with("v", 5.0);
    let output = code.execute(&input).unwrap();
    assert_eq!(input.get("v").unwrap().as_scalar(), Some(5.0));
    assert!(!input.contains("x"));
    assert_eq!(output.get("x").unwrap().as_scalar(), Some(1.0));
}

#[test]
fn augmented_assignment_needs_a_current_value() {
    let code = resolved("w += 1", Namespace::new(), &["w"]);
    let err = code.execute(&Namespace::new()).unwrap_err();
    assert!(matches!(err, CodeError::Eval { .. }));
}

#[test]
fn statement_syntax_errors() {
    let code = CodeString::new("v = = 1").unwrap();
    code.resolve(["v"]).unwrap();
    assert!(matches!(
        code.execute(&Namespace::new()),
        Err(CodeError::Parse { .. })
    ));
}
