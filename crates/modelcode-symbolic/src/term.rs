//! Owned symbolic expression trees.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;

use rustc_hash::FxHashSet;

/// A symbolic expression.
///
/// Unlike the arena AST, a `Term` owns its children and can be freely
/// rebuilt by simplification, differentiation, and substitution.
#[derive(Clone, PartialEq)]
pub enum Term {
    /// Numeric constant
    Const(f64),
    /// Named symbol
    Symbol(String),
    /// Addition
    Add(Rc<Term>, Rc<Term>),
    /// Subtraction
    Sub(Rc<Term>, Rc<Term>),
    /// Multiplication
    Mul(Rc<Term>, Rc<Term>),
    /// Division
    Div(Rc<Term>, Rc<Term>),
    /// Power
    Pow(Rc<Term>, Rc<Term>),
    /// Remainder (`%`)
    Rem(Rc<Term>, Rc<Term>),
    /// Negation
    Neg(Rc<Term>),
    /// Function application
    Fn(String, Vec<Rc<Term>>),
}

impl Term {
    /// Create a constant.
    pub fn constant(value: f64) -> Self {
        Term::Const(value)
    }

    /// Create a symbol.
    pub fn symbol(name: &str) -> Self {
        Term::Symbol(name.to_string())
    }

    /// Zero.
    pub fn zero() -> Self {
        Term::Const(0.0)
    }

    /// One.
    pub fn one() -> Self {
        Term::Const(1.0)
    }

    /// Check if the term is the constant zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Term::Const(x) if *x == 0.0)
    }

    /// Get the constant value if this is a constant.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Term::Const(x) => Some(*x),
            _ => None,
        }
    }

    /// Apply a named function.
    pub fn call(name: &str, args: Vec<Term>) -> Self {
        Term::Fn(name.to_string(), args.into_iter().map(Rc::new).collect())
    }

    /// Power operation.
    pub fn pow(self, exp: Term) -> Term {
        Term::Pow(Rc::new(self), Rc::new(exp))
    }

    /// Check if the term mentions a symbol.
    pub fn contains_var(&self, var: &str) -> bool {
        match self {
            Term::Const(_) => false,
            Term::Symbol(s) => s == var,
            Term::Add(a, b)
            | Term::Sub(a, b)
            | Term::Mul(a, b)
            | Term::Div(a, b)
            | Term::Pow(a, b)
            | Term::Rem(a, b) => a.contains_var(var) || b.contains_var(var),
            Term::Neg(a) => a.contains_var(var),
            Term::Fn(_, args) => args.iter().any(|a| a.contains_var(var)),
        }
    }

    /// All symbols the term mentions. Function names are not symbols.
    pub fn free_symbols(&self) -> FxHashSet<String> {
        let mut vars = FxHashSet::default();
        self.collect_symbols(&mut vars);
        vars
    }

    fn collect_symbols(&self, vars: &mut FxHashSet<String>) {
        match self {
            Term::Const(_) => {}
            Term::Symbol(s) => {
                vars.insert(s.clone());
            }
            Term::Add(a, b)
            | Term::Sub(a, b)
            | Term::Mul(a, b)
            | Term::Div(a, b)
            | Term::Pow(a, b)
            | Term::Rem(a, b) => {
                a.collect_symbols(vars);
                b.collect_symbols(vars);
            }
            Term::Neg(a) => a.collect_symbols(vars),
            Term::Fn(_, args) => {
                for arg in args {
                    arg.collect_symbols(vars);
                }
            }
        }
    }

    /// Replace every occurrence of `var` with `replacement`.
    pub fn substitute(&self, var: &str, replacement: &Term) -> Term {
        let sub = |t: &Rc<Term>| Rc::new(t.substitute(var, replacement));
        match self {
            Term::Const(_) => self.clone(),
            Term::Symbol(s) if s == var => replacement.clone(),
            Term::Symbol(_) => self.clone(),
            Term::Add(a, b) => Term::Add(sub(a), sub(b)),
            Term::Sub(a, b) => Term::Sub(sub(a), sub(b)),
            Term::Mul(a, b) => Term::Mul(sub(a), sub(b)),
            Term::Div(a, b) => Term::Div(sub(a), sub(b)),
            Term::Pow(a, b) => Term::Pow(sub(a), sub(b)),
            Term::Rem(a, b) => Term::Rem(sub(a), sub(b)),
            Term::Neg(a) => Term::Neg(sub(a)),
            Term::Fn(name, args) => Term::Fn(name.clone(), args.iter().map(sub).collect()),
        }
    }

    /// Binding strength when printed, higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Term::Add(..) | Term::Sub(..) => 1,
            Term::Mul(..) | Term::Div(..) | Term::Rem(..) => 2,
            Term::Neg(_) => 3,
            Term::Const(x) if x.is_sign_negative() && *x != 0.0 => 3,
            Term::Pow(..) => 4,
            Term::Const(_) | Term::Symbol(_) | Term::Fn(..) => 5,
        }
    }

    fn is_negative(&self) -> bool {
        self.precedence() == 3
    }
}

impl Add for Term {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Term::Add(Rc::new(self), Rc::new(rhs))
    }
}

impl Sub for Term {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Term::Sub(Rc::new(self), Rc::new(rhs))
    }
}

impl Mul for Term {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Term::Mul(Rc::new(self), Rc::new(rhs))
    }
}

impl Div for Term {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Term::Div(Rc::new(self), Rc::new(rhs))
    }
}

impl Neg for Term {
    type Output = Self;
    fn neg(self) -> Self {
        Term::Neg(Rc::new(self))
    }
}

/// Format a constant so that it reads back as the same number.
pub(crate) fn format_number(x: f64) -> String {
    if x.is_infinite() {
        if x > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{x}")
    }
}

/// Write `term`, parenthesised when `needs_parens` says so.
fn write_operand(
    f: &mut fmt::Formatter<'_>,
    term: &Term,
    needs_parens: bool,
) -> fmt::Result {
    if needs_parens {
        write!(f, "({term})")
    } else {
        write!(f, "{term}")
    }
}

impl fmt::Display for Term {
    /// Prints valid model code, with `**` for powers and only the
    /// parentheses the grammar needs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Const(x) => f.write_str(&format_number(*x)),
            Term::Symbol(s) => f.write_str(s),
            Term::Add(a, b) => {
                write_operand(f, a, a.precedence() < 1)?;
                f.write_str(" + ")?;
                write_operand(f, b, b.precedence() < 1)
            }
            Term::Sub(a, b) => {
                write_operand(f, a, a.precedence() < 1)?;
                f.write_str(" - ")?;
                write_operand(f, b, b.precedence() <= 1 || b.is_negative())
            }
            Term::Mul(a, b) => {
                write_operand(f, a, a.precedence() < 2)?;
                f.write_str("*")?;
                write_operand(
                    f,
                    b,
                    b.precedence() < 2 || b.is_negative() || matches!(**b, Term::Rem(..)),
                )
            }
            Term::Div(a, b) | Term::Rem(a, b) => {
                write_operand(f, a, a.precedence() < 2)?;
                f.write_str(if matches!(self, Term::Div(..)) { "/" } else { " % " })?;
                write_operand(f, b, b.precedence() <= 2 || b.is_negative())
            }
            Term::Pow(a, b) => {
                write_operand(f, a, a.precedence() <= 4)?;
                f.write_str("**")?;
                write_operand(f, b, b.precedence() < 4 || b.is_negative())
            }
            Term::Neg(a) => {
                f.write_str("-")?;
                write_operand(f, a, a.precedence() < 2 || a.is_negative())
            }
            Term::Fn(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
