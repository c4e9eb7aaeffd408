//! Symbolic differentiation.

use std::rc::Rc;

use crate::{Term, simplify};

/// Differentiate `term` with respect to `var` and simplify the result.
///
/// Functions without a known derivative are differentiated into opaque
/// partial-derivative applications (`_d0_floor(x)`), which keep mentioning
/// `var` wherever the original did. Such terms only serve dependency tests
/// and are not meant to be evaluated.
pub fn differentiate(term: &Term, var: &str) -> Term {
    simplify(&derive(term, var))
}

fn derive(term: &Term, var: &str) -> Term {
    if !term.contains_var(var) {
        return Term::zero();
    }
    match term {
        Term::Const(_) => Term::zero(),

        Term::Symbol(s) => {
            if s == var {
                Term::one()
            } else {
                Term::zero()
            }
        }

        Term::Add(a, b) => derive(a, var) + derive(b, var),

        Term::Sub(a, b) => derive(a, var) - derive(b, var),

        Term::Neg(a) => -derive(a, var),

        // Product rule: (a * b)' = a' * b + a * b'
        Term::Mul(a, b) => {
            derive(a, var) * (**b).clone() + (**a).clone() * derive(b, var)
        }

        // Quotient rule: (a / b)' = (a' * b - a * b') / b²
        Term::Div(a, b) => {
            let numerator = derive(a, var) * (**b).clone() - (**a).clone() * derive(b, var);
            numerator / (**b).clone().pow(Term::Const(2.0))
        }

        Term::Pow(base, exp) => {
            let base_has_var = base.contains_var(var);
            let exp_has_var = exp.contains_var(var);
            let log_base = || Term::call("log", vec![(**base).clone()]);

            match (base_has_var, exp_has_var) {
                (false, false) => Term::zero(),

                // (u^n)' = n * u^(n-1) * u'
                (true, false) => {
                    let n = (**exp).clone();
                    n.clone() * (**base).clone().pow(n - Term::one()) * derive(base, var)
                }

                // (a^u)' = a^u * log(a) * u'
                (false, true) => term.clone() * log_base() * derive(exp, var),

                // (f^g)' = f^g * (g' * log(f) + g * f' / f)
                (true, true) => {
                    term.clone()
                        * (derive(exp, var) * log_base()
                            + (**exp).clone() * derive(base, var) / (**base).clone())
                }
            }
        }

        // Piecewise, so never linear in an operand that varies.
        Term::Rem(a, b) => opaque_chain("mod", &[a.clone(), b.clone()], var),

        Term::Fn(name, args) => {
            if let [arg] = args.as_slice()
                && let Some(outer) = known_derivative(name, arg)
            {
                return outer * derive(arg, var);
            }
            opaque_chain(name, args, var)
        }
    }
}

/// Chain rule over every argument, with opaque partials.
fn opaque_chain(name: &str, args: &[Rc<Term>], var: &str) -> Term {
    args.iter()
        .enumerate()
        .filter(|(_, arg)| arg.contains_var(var))
        .map(|(i, arg)| {
            let partial = Term::Fn(format!("_d{i}_{name}"), args.to_vec());
            partial * derive(arg, var)
        })
        .reduce(|a, b| a + b)
        .unwrap_or_else(Term::zero)
}

/// Derivative of a known one-argument function, evaluated at `u`.
fn known_derivative(name: &str, u: &Rc<Term>) -> Option<Term> {
    let u = || (**u).clone();
    let call = |f: &str| Term::call(f, vec![u()]);
    let two = || Term::Const(2.0);
    Some(match name {
        "sin" => call("cos"),
        "cos" => -call("sin"),
        "tan" => Term::one() / call("cos").pow(two()),
        "arcsin" => (Term::one() - u().pow(two())).pow(Term::Const(-0.5)),
        "arccos" => -(Term::one() - u().pow(two())).pow(Term::Const(-0.5)),
        "arctan" => Term::one() / (Term::one() + u().pow(two())),
        "sinh" => call("cosh"),
        "cosh" => call("sinh"),
        "tanh" => Term::one() - call("tanh").pow(two()),
        "exp" => call("exp"),
        "log" => Term::one() / u(),
        "log10" => Term::one() / (u() * Term::call("log", vec![Term::Const(10.0)])),
        "sqrt" => Term::Const(0.5) * u().pow(Term::Const(-0.5)),
        "abs" => call("sign"),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(code: &str, var: &str) -> String {
        differentiate(&Term::parse(code).unwrap(), var).to_string()
    }

    #[test]
    fn polynomial_rules() {
        assert_eq!(d("3*x**2 + 2*x + 1", "x"), "6*x + 2");
        assert_eq!(d("a*x", "x"), "a");
        assert_eq!(d("a*y", "x"), "0");
    }

    #[test]
    fn quotient_rule() {
        assert_eq!(d("(-v + I)/tau", "v"), "-1/tau");
        assert_eq!(d("1/x", "x"), "-1/x**2");
    }

    #[test]
    fn chain_rule_for_functions() {
        assert_eq!(d("exp(2*t)", "t"), "2*exp(2*t)");
        assert_eq!(d("sin(x)", "x"), "cos(x)");
        assert_eq!(d("log(x)", "x"), "1/x");
        assert_eq!(d("sqrt(x)", "x"), "0.5/x**0.5");
    }

    #[test]
    fn cancelling_derivative() {
        assert_eq!(d("v*v/v", "v"), "1");
    }

    #[test]
    fn unknown_function_keeps_dependency() {
        let result = differentiate(&Term::parse("f(x, y)").unwrap(), "x");
        assert!(result.contains_var("x"));
        let result = differentiate(&Term::parse("f(y)").unwrap(), "x");
        assert!(result.is_zero());
    }

    #[test]
    fn remainder_is_not_linear() {
        let result = differentiate(&Term::parse("x % 2").unwrap(), "x");
        assert!(result.contains_var("x"));
        let result = differentiate(&Term::parse("y % x").unwrap(), "y");
        assert!(result.contains_var("y"));
    }

    #[test]
    fn exponent_with_variable() {
        let result = differentiate(&Term::parse("2**x").unwrap(), "x");
        assert!(result.contains_var("x"));
    }
}
