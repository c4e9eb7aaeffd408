//! Structural questions about terms: linearity and affine splitting.

use crate::{SymbolicError, Term, differentiate, simplify};

/// Check whether `term` is linear in `var`.
///
/// A term that does not mention `var` is trivially linear. Otherwise the
/// term is linear when its simplified derivative no longer mentions `var`.
pub fn is_linear_in(term: &Term, var: &str) -> bool {
    if !term.contains_var(var) {
        return true;
    }
    !differentiate(term, var).contains_var(var)
}

/// Split `term` into `f + g*symbol` with neither `f` nor `g` mentioning
/// `symbol`.
///
/// Returns `Ok(None)` when `symbol` does not occur at all, and the pair
/// `(f, g*symbol)` otherwise, both simplified.
///
/// # Errors
///
/// Returns [`SymbolicError::NotSeparable`] when `term` is not affine in
/// `symbol`, for example `xi**2` or `exp(xi)`.
pub fn split_affine(term: &Term, symbol: &str) -> Result<Option<(Term, Term)>, SymbolicError> {
    if !term.contains_var(symbol) {
        return Ok(None);
    }
    let g = differentiate(term, symbol);
    if g.contains_var(symbol) {
        return Err(SymbolicError::NotSeparable {
            symbol: symbol.to_string(),
        });
    }
    let f = simplify(&term.substitute(symbol, &Term::zero()));
    let stochastic = simplify(&(g * Term::symbol(symbol)));
    Ok(Some((f, stochastic)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equivalent;

    fn term(code: &str) -> Term {
        Term::parse(code).unwrap()
    }

    #[test]
    fn linearity() {
        assert!(is_linear_in(&term("-v/tau + I"), "v"));
        assert!(is_linear_in(&term("w**2"), "v"));
        assert!(is_linear_in(&term("v*v/v"), "v"));
        assert!(!is_linear_in(&term("v**2"), "v"));
        assert!(!is_linear_in(&term("exp(v)"), "v"));
    }

    #[test]
    fn linear_in_one_variable_not_another() {
        let t = term("a*v + v*w**2");
        assert!(is_linear_in(&t, "v"));
        assert!(!is_linear_in(&t, "w"));
    }

    #[test]
    fn split_recombines() {
        let t = term("-v/tau + sigma*xi/sqrt(tau)");
        let (f, g) = split_affine(&t, "xi").unwrap().unwrap();
        assert!(!f.contains_var("xi"));
        assert!(g.contains_var("xi"));
        assert!(equivalent(&(f.clone() + g), &t));
        assert_eq!(f.to_string(), "-v/tau");
    }

    #[test]
    fn split_without_symbol() {
        assert_eq!(split_affine(&term("-v/tau"), "xi").unwrap(), None);
    }

    #[test]
    fn split_pure_noise() {
        let (f, g) = split_affine(&term("sigma*xi"), "xi").unwrap().unwrap();
        assert!(f.is_zero());
        assert_eq!(g.to_string(), "sigma*xi");
    }

    #[test]
    fn split_rejects_nonlinear_noise() {
        assert!(matches!(
            split_affine(&term("xi**2"), "xi"),
            Err(SymbolicError::NotSeparable { .. })
        ));
        assert!(matches!(
            split_affine(&term("exp(xi)"), "xi"),
            Err(SymbolicError::NotSeparable { .. })
        ));
    }
}
