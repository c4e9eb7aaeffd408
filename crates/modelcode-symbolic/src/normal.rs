//! Normal form: sums of monomials over opaque atoms.
//!
//! A term is normalised into a map from monomials (atom → real exponent)
//! to coefficients. Atoms are symbols, function applications, remainders,
//! and anything that cannot be expanded further, such as a sum raised to
//! a fractional power. Products merge exponents of equal atoms and sums
//! merge equal monomials, so `v*v/v` normalises to `v` and
//! `(a + b)*c - a*c` to `b*c`.
//!
//! Atoms are identified by their printed form.

use std::collections::BTreeMap;
use std::rc::Rc;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use crate::Term;

/// Atom key → exponent. Zero exponents are never stored.
type Monomial = BTreeMap<String, OrderedFloat<f64>>;

/// Relative size under which a sum of coefficients counts as cancelled.
const CANCEL_TOLERANCE: f64 = 1e-12;

/// Largest integer power of a sum that is expanded.
const MAX_EXPANDED_POWER: f64 = 8.0;

#[derive(Clone, Default)]
struct Poly {
    terms: BTreeMap<Monomial, f64>,
    atoms: FxHashMap<String, Term>,
}

impl Poly {
    fn constant(c: f64) -> Self {
        let mut poly = Poly::default();
        if c != 0.0 {
            poly.terms.insert(Monomial::new(), c);
        }
        poly
    }

    fn atom_pow(atom: Term, exponent: f64) -> Self {
        if exponent == 0.0 {
            return Poly::constant(1.0);
        }
        let key = atom.to_string();
        let mut poly = Poly::default();
        poly.terms
            .insert(Monomial::from([(key.clone(), OrderedFloat(exponent))]), 1.0);
        poly.atoms.insert(key, atom);
        poly
    }

    fn atom(atom: Term) -> Self {
        Poly::atom_pow(atom, 1.0)
    }

    fn as_constant(&self) -> Option<f64> {
        match self.terms.len() {
            0 => Some(0.0),
            1 => self
                .terms
                .iter()
                .next()
                .filter(|(m, _)| m.is_empty())
                .map(|(_, c)| *c),
            _ => None,
        }
    }

    fn single_monomial(&self) -> Option<(&Monomial, f64)> {
        if self.terms.len() == 1 {
            self.terms.iter().next().map(|(m, c)| (m, *c))
        } else {
            None
        }
    }

    fn add_term(&mut self, monomial: Monomial, c: f64) {
        let existing = self.terms.get(&monomial).copied();
        match existing {
            None if c != 0.0 => {
                self.terms.insert(monomial, c);
            }
            None => {}
            Some(e) => {
                let sum = e + c;
                if sum.abs() <= CANCEL_TOLERANCE * e.abs().max(c.abs()) {
                    self.terms.remove(&monomial);
                } else {
                    self.terms.insert(monomial, sum);
                }
            }
        }
    }

    fn add(mut self, other: Poly) -> Poly {
        self.atoms.extend(other.atoms);
        for (m, c) in other.terms {
            self.add_term(m, c);
        }
        self
    }

    fn scale(mut self, k: f64) -> Poly {
        if k == 0.0 {
            return Poly::default();
        }
        for c in self.terms.values_mut() {
            *c *= k;
        }
        self
    }

    fn mul(&self, other: &Poly) -> Poly {
        let mut result = Poly::default();
        result.atoms = self.atoms.clone();
        result
            .atoms
            .extend(other.atoms.iter().map(|(k, v)| (k.clone(), v.clone())));
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                let mut monomial = m1.clone();
                for (atom, exp) in m2 {
                    let entry = monomial.entry(atom.clone()).or_insert(OrderedFloat(0.0));
                    entry.0 += exp.0;
                    if entry.0 == 0.0 {
                        monomial.remove(atom);
                    }
                }
                result.add_term(monomial, c1 * c2);
            }
        }
        result
    }

    /// Raise a single monomial to a real power, if that is well defined.
    fn monomial_pow(&self, monomial: &Monomial, c: f64, exponent: f64) -> Option<Poly> {
        if c < 0.0 && exponent.fract() != 0.0 {
            return None;
        }
        let powered: Monomial = monomial
            .iter()
            .map(|(atom, exp)| (atom.clone(), OrderedFloat(exp.0 * exponent)))
            .collect();
        let mut poly = Poly::default();
        poly.atoms = self.atoms.clone();
        poly.add_term(powered, c.powf(exponent));
        Some(poly)
    }

    fn powi(&self, n: u32) -> Poly {
        let mut result = Poly::constant(1.0);
        for _ in 0..n {
            result = result.mul(self);
        }
        result
    }

    fn atom_term(&self, key: &str) -> Term {
        self.atoms
            .get(key)
            .cloned()
            .unwrap_or_else(|| Term::symbol(key))
    }

    fn monomial_term(&self, monomial: &Monomial, magnitude: f64) -> Term {
        let factor = |key: &str, exp: f64| {
            let atom = self.atom_term(key);
            if exp == 1.0 {
                atom
            } else {
                atom.pow(Term::Const(exp))
            }
        };
        let numerator = monomial
            .iter()
            .filter(|(_, e)| e.0 > 0.0)
            .map(|(k, e)| factor(k, e.0))
            .reduce(|a, b| a * b);
        let denominator = monomial
            .iter()
            .filter(|(_, e)| e.0 < 0.0)
            .map(|(k, e)| factor(k, -e.0))
            .reduce(|a, b| a * b);

        let numerator = match (magnitude == 1.0, numerator) {
            (true, Some(n)) => n,
            (false, Some(n)) => Term::Const(magnitude) * n,
            (_, None) => Term::Const(magnitude),
        };
        match denominator {
            Some(d) => numerator / d,
            None => numerator,
        }
    }

    fn to_term(&self) -> Term {
        // Constant last: `v/tau + 1` rather than `1 + v/tau`.
        let ordered = self
            .terms
            .iter()
            .filter(|(m, _)| !m.is_empty())
            .chain(self.terms.iter().filter(|(m, _)| m.is_empty()));

        let mut sum: Option<Term> = None;
        for (monomial, c) in ordered {
            let body = self.monomial_term(monomial, c.abs());
            let negative = *c < 0.0;
            sum = Some(match (sum, negative) {
                (None, false) => body,
                (None, true) => match body {
                    Term::Const(x) => Term::Const(-x),
                    body => -body,
                },
                (Some(acc), false) => acc + body,
                (Some(acc), true) => acc - body,
            });
        }
        sum.unwrap_or_else(Term::zero)
    }
}

/// Fold a known function of constant arguments.
fn fold_function(name: &str, args: &[f64]) -> Option<f64> {
    let [x] = args else {
        return None;
    };
    let x = *x;
    Some(match name {
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        "arcsin" => x.asin(),
        "arccos" => x.acos(),
        "arctan" => x.atan(),
        "sinh" => x.sinh(),
        "cosh" => x.cosh(),
        "tanh" => x.tanh(),
        "exp" => x.exp(),
        "log" => x.ln(),
        "log10" => x.log10(),
        "abs" => x.abs(),
        "floor" => x.floor(),
        "ceil" => x.ceil(),
        _ => return None,
    })
}

fn normalize(term: &Term) -> Poly {
    match term {
        Term::Const(c) => Poly::constant(*c),
        Term::Symbol(_) => Poly::atom(term.clone()),
        Term::Add(a, b) => normalize(a).add(normalize(b)),
        Term::Sub(a, b) => normalize(a).add(normalize(b).scale(-1.0)),
        Term::Neg(a) => normalize(a).scale(-1.0),
        Term::Mul(a, b) => normalize(a).mul(&normalize(b)),
        Term::Div(a, b) => {
            let numerator = normalize(a);
            let denominator = normalize(b);
            match denominator.single_monomial() {
                Some((m, c)) => match denominator.monomial_pow(m, c, -1.0) {
                    Some(inverse) => numerator.mul(&inverse),
                    None => numerator.mul(&Poly::atom_pow(denominator.to_term(), -1.0)),
                },
                None => numerator.mul(&Poly::atom_pow(denominator.to_term(), -1.0)),
            }
        }
        Term::Pow(a, b) => {
            let base = normalize(a);
            let exponent = normalize(b);
            let Some(e) = exponent.as_constant() else {
                return Poly::atom(base.to_term().pow(exponent.to_term()));
            };
            if e == 0.0 {
                return Poly::constant(1.0);
            }
            if let Some(c) = base.as_constant() {
                return Poly::constant(c.powf(e));
            }
            if let Some((m, c)) = base.single_monomial()
                && let Some(powered) = base.monomial_pow(m, c, e)
            {
                return powered;
            }
            if e.fract() == 0.0 && e > 0.0 && e <= MAX_EXPANDED_POWER {
                return base.powi(e as u32);
            }
            Poly::atom_pow(base.to_term(), e)
        }
        Term::Rem(a, b) => {
            let a = normalize(a);
            let b = normalize(b);
            match (a.as_constant(), b.as_constant()) {
                (Some(x), Some(y)) => Poly::constant(x - y * (x / y).floor()),
                _ => Poly::atom(Term::Rem(Rc::new(a.to_term()), Rc::new(b.to_term()))),
            }
        }
        Term::Fn(name, args) => {
            if name == "sqrt"
                && let [arg] = args.as_slice()
            {
                return normalize(&(**arg).clone().pow(Term::Const(0.5)));
            }
            let args: Vec<Poly> = args.iter().map(|a| normalize(a)).collect();
            let constants: Option<Vec<f64>> = args.iter().map(Poly::as_constant).collect();
            if let Some(value) = constants.and_then(|c| fold_function(name, &c)) {
                return Poly::constant(value);
            }
            Poly::atom(Term::Fn(
                name.clone(),
                args.iter().map(|a| Rc::new(a.to_term())).collect(),
            ))
        }
    }
}

/// Simplify a term by bringing it into normal form.
///
/// The result is mathematically equal to the input wherever the input is
/// defined. Denominators are assumed non-zero (`x/x` is `1`).
pub fn simplify(term: &Term) -> Term {
    normalize(term).to_term()
}

/// Check whether two terms normalise to the same form.
pub fn equivalent(a: &Term, b: &Term) -> bool {
    simplify(&(a.clone() - b.clone())).is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simplified(code: &str) -> String {
        simplify(&Term::parse(code).unwrap()).to_string()
    }

    #[test]
    fn collects_like_terms() {
        assert_eq!(simplified("v + v"), "2*v");
        assert_eq!(simplified("v - v"), "0");
        assert_eq!(simplified("(a + b)*c - a*c"), "b*c");
    }

    #[test]
    fn merges_exponents() {
        assert_eq!(simplified("v*v/v"), "v");
        assert_eq!(simplified("x**2*x**-3"), "1/x");
        assert_eq!(simplified("sqrt(tau)**2"), "tau");
    }

    #[test]
    fn quotient_by_monomial() {
        assert_eq!(simplified("-(v - E_L)/tau"), "E_L/tau - v/tau");
        assert_eq!(simplified("(2*v)/(4*tau)"), "0.5*v/tau");
    }

    #[test]
    fn quotient_by_sum_is_atom() {
        assert_eq!(simplified("1/(a + b)"), "1/(a + b)");
        assert_eq!(simplified("sqrt(a + b)*sqrt(a + b)/(a + b)"), "1");
    }

    #[test]
    fn folds_constant_functions() {
        assert_eq!(simplified("exp(0) + 2**3"), "9");
        assert_eq!(simplified("exp(v - v)"), "1");
        assert_eq!(simplified("exp(-v)"), "exp(-v)");
    }

    #[test]
    fn expands_small_integer_powers() {
        assert_eq!(simplified("(a + b)**2 - a**2 - b**2"), "2*a*b");
    }

    #[test]
    fn equivalence() {
        let a = Term::parse("(x + 1)*(x - 1)").unwrap();
        let b = Term::parse("x**2 - 1").unwrap();
        assert!(equivalent(&a, &b));
        let c = Term::parse("x**2 + 1").unwrap();
        assert!(!equivalent(&a, &c));
    }

    #[test]
    fn simplified_code_reparses_to_same_form() {
        for code in ["-v/tau + sigma*xi/sqrt(tau)", "exp(-t/tau)*(a + b)**0.5", "x % 3 - 1"] {
            let once = simplified(code);
            assert_eq!(simplified(&once), once, "{code}");
        }
    }
}
