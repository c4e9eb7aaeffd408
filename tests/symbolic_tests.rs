//! Linearity checks and the stochastic split.

use modelcode::{AnnotatedCode, CodeError, CodeOptions, CodeString, Expression, Namespace};

fn resolved(code: &str, constants: &[(&str, f64)], internal: &[&str]) -> Expression {
    let namespace = constants
        .iter()
        .fold(Namespace::new(), |ns, (name, value)| ns.with(*name, *value));
    let expr = Expression::builder(code).namespace(namespace).build().unwrap();
    expr.resolve(internal).unwrap();
    expr
}

// ============================================================================
// Linearity
// ============================================================================

#[test]
fn linear_and_nonlinear() {
    let linear = resolved("a*x + b", &[("a", 2.0), ("b", 1.0)], &["x"]);
    assert!(linear.check_linearity("x").unwrap());

    let quadratic = resolved("x*x", &[], &["x"]);
    assert!(!quadratic.check_linearity("x").unwrap());
}

#[test]
fn absent_variable_is_linear() {
    let expr = Expression::new("w**2 + exp(w)").unwrap();
    assert!(expr.check_linearity("v").unwrap());
}

#[test]
fn linearity_after_simplification() {
    for code in ["v*v/v", "(v + 1)**2 - v**2", "-(v - E_L)/tau", "v/tau*sqrt(tau)**2"] {
        let expr = CodeString::new(code).unwrap();
        assert!(expr.check_linearity("v").unwrap(), "{code}");
    }
    for code in ["v**2", "exp(v)", "1/v", "v*w + sin(v)", "v % 2", "abs(v)"] {
        let expr = CodeString::new(code).unwrap();
        assert!(!expr.check_linearity("v").unwrap(), "{code}");
    }
}

#[test]
fn linearity_of_unparsable_code() {
    let code = CodeString::new("v = 1").unwrap();
    assert!(matches!(
        code.check_linearity("v"),
        Err(CodeError::Parse { .. })
    ));
    let code = CodeString::new("v > 1").unwrap();
    assert!(matches!(
        code.check_linearity("v"),
        Err(CodeError::Symbolic { .. })
    ));
}

// ============================================================================
// Stochastic split
// ============================================================================

#[test]
fn no_noise_returns_self() {
    let expr = resolved("-v/tau", &[("tau", 0.01)], &["v"]);
    let (drift, diffusion) = expr.split_stochastic().unwrap();
    assert!(diffusion.is_none());
    assert_eq!(drift.code(), expr.code());
    assert!(drift.is_resolved());
}

#[test]
fn split_recombines_numerically() {
    let constants = [("tau", 0.02), ("sigma", 0.003), ("E_L", -0.07)];
    let expr = resolved(
        "(E_L - v)/tau + sigma*xi*sqrt(2/tau)",
        &constants,
        &["v", "xi"],
    );
    let (drift, diffusion) = expr.split_stochastic().unwrap();
    let diffusion = diffusion.unwrap();

    assert!(!drift.identifiers().contains("xi"));
    assert!(diffusion.identifiers().contains("xi"));
    assert!(drift.exhaustive() && diffusion.exhaustive());
    assert!(drift.is_resolved() && diffusion.is_resolved());

    for (v, xi) in [(-0.065, 0.3), (0.01, -1.7), (-0.08, 0.0)] {
        let vars = Namespace::new().with("v", v).with("xi", xi);
        let whole = expr.eval(&vars).unwrap().as_scalar().unwrap();
        let f = drift.eval(&vars).unwrap().as_scalar().unwrap();
        let g = diffusion.eval(&vars).unwrap().as_scalar().unwrap();
        assert!((whole - (f + g)).abs() <= 1e-9 * whole.abs().max(1.0));
    }
}

#[test]
fn noise_free_condition_is_returned_unchanged() {
    let code = CodeString::builder("v > v_th and not refractory")
        .namespace(Namespace::new().with("v_th", 1.0).with("refractory", false))
        .build()
        .unwrap();
    code.resolve(["v"]).unwrap();
    let (drift, diffusion) = code.split_stochastic().unwrap();
    assert!(diffusion.is_none());
    assert_eq!(drift.code(), "v > v_th and not refractory");

    let unresolved = CodeString::new("v > 1").unwrap();
    let (same, diffusion) = unresolved.split_stochastic().unwrap();
    assert!(diffusion.is_none());
    assert!(!same.is_resolved());
}

#[test]
fn noisy_condition_is_unsupported() {
    let code = resolved("v + xi > 1", &[], &["v", "xi"]);
    assert!(matches!(
        code.split_stochastic(),
        Err(CodeError::Symbolic { .. })
    ));
}

#[test]
fn split_parts_carry_the_namespace() {
    let expr = resolved("-v/tau + sigma*xi", &[("tau", 0.01), ("sigma", 0.5)], &["v", "xi"]);
    let (drift, diffusion) = expr.split_stochastic().unwrap();
    let diffusion = diffusion.unwrap();
    assert_eq!(drift.code(), "-v/tau");
    assert_eq!(diffusion.code(), "sigma*xi");
    assert_eq!(drift.namespace().unwrap().names(), vec!["sigma", "tau"]);
    assert_eq!(diffusion.namespace().unwrap().names(), vec!["sigma", "tau"]);
}

#[test]
fn pure_noise_has_zero_drift() {
    let expr = resolved("sigma*xi", &[("sigma", 0.5)], &["xi"]);
    let (drift, diffusion) = expr.split_stochastic().unwrap();
    assert_eq!(drift.code(), "0");
    assert_eq!(diffusion.unwrap().code(), "sigma*xi");
}

#[test]
fn cancelling_noise_has_no_diffusion() {
    let expr = resolved("-v + xi - xi", &[], &["v", "xi"]);
    let (drift, diffusion) = expr.split_stochastic().unwrap();
    assert_eq!(drift.code(), "-v");
    assert!(diffusion.is_none());
}

#[test]
fn non_separable_noise() {
    for code in ["xi**2", "exp(xi)", "v*xi + xi*xi", "sin(xi)"] {
        let expr = resolved(code, &[], &["v", "xi"]);
        assert!(
            matches!(expr.split_stochastic(), Err(CodeError::NonSeparable { .. })),
            "{code}"
        );
    }
}

#[test]
fn split_requires_resolution_when_noise_present() {
    let expr = Expression::new("-v + xi").unwrap();
    assert!(matches!(
        expr.split_stochastic(),
        Err(CodeError::NotResolved { .. })
    ));
}

#[test]
fn custom_noise_symbol() {
    let expr = Expression::builder("-v + eta")
        .options(CodeOptions::default().with_noise_symbol("eta"))
        .build()
        .unwrap();
    expr.resolve(["v", "eta"]).unwrap();
    let (drift, diffusion) = expr.split_stochastic().unwrap();
    assert_eq!(drift.code(), "-v");
    let diffusion = diffusion.unwrap();
    assert_eq!(diffusion.code(), "eta");
    assert_eq!(diffusion.options().noise_symbol, "eta");
}

#[test]
fn split_of_code_string_stays_code_string() {
    let code = CodeString::new("-v + xi").unwrap();
    code.resolve(["v", "xi"]).unwrap();
    let (drift, diffusion): (CodeString, Option<CodeString>) = code.split_stochastic().unwrap();
    assert_eq!(format!("{drift:?}"), "CodeString(\"-v\")");
    assert!(diffusion.is_some());
}
