//! Symbolic backend for model code.
//!
//! Code strings are lowered into owned [`Term`] trees, which can be
//! simplified into a canonical sum-of-monomials form, differentiated, and
//! queried for linearity or split into a deterministic and a stochastic
//! part.
//!
//! ```
//! use modelcode_symbolic::{Term, is_linear_in, split_affine};
//!
//! let term = Term::parse("-v/tau + sigma*xi").unwrap();
//! assert!(is_linear_in(&term, "v"));
//!
//! let (f, g) = split_affine(&term, "xi").unwrap().unwrap();
//! assert_eq!(f.to_string(), "-v/tau");
//! assert_eq!(g.to_string(), "sigma*xi");
//! ```

mod analysis;
mod diff;
mod error;
mod lower;
mod normal;
mod term;

pub use analysis::{is_linear_in, split_affine};
pub use diff::differentiate;
pub use error::SymbolicError;
pub use lower::lower;
pub use normal::{equivalent, simplify};
pub use term::Term;
