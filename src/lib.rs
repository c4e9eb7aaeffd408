//! Model code strings with namespaces.
//!
//! A [`CodeString`] or [`Expression`] pairs a piece of model code with the
//! namespaces its identifiers come from. Once resolved against the set of
//! internal (state) variables, the code can be evaluated, unit checked,
//! frozen into constant-folded code, tested for linearity, and split into a
//! deterministic and a stochastic part.
//!
//! ```
//! use modelcode::{AnnotatedCode, Dimension, Expression, Namespace, Value, VariableUnits};
//!
//! let expr = Expression::builder("(v_rest - v)/tau + sigma*xi*tau**-0.5")
//!     .namespace(
//!         Namespace::new()
//!             .with("tau", Value::quantity(0.01, Dimension::TIME))
//!             .with("v_rest", Value::quantity(-0.07, Dimension::VOLTAGE))
//!             .with("sigma", Value::quantity(0.001, Dimension::VOLTAGE)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let diagnostics = expr.resolve(["v", "xi"]).unwrap();
//! assert!(diagnostics.is_empty());
//! assert!(expr.check_linearity("v").unwrap());
//!
//! let mut units = VariableUnits::default();
//! units.insert("v".into(), Dimension::VOLTAGE);
//! units.insert("xi".into(), Dimension::TIME.powf(-0.5));
//! expr.check_unit_against(Dimension::VOLTAGE / Dimension::TIME, &units).unwrap();
//!
//! let (drift, diffusion) = expr.split_stochastic().unwrap();
//! assert!(!drift.identifiers().contains("xi"));
//! assert!(diffusion.unwrap().identifiers().contains("xi"));
//! ```
//!
//! # Logging
//!
//! Resolution warnings are returned as [`Diagnostics`] and also emitted via
//! `tracing`. The crate never installs a subscriber.

mod builder;
mod code;
mod code_string;
mod config;
mod diagnostics;
mod error;
mod eval;
mod expression;
mod namespace;
mod resolve;

pub use builder::CodeBuilder;
pub use code::{AnnotatedCode, CodeCore};
pub use code_string::CodeString;
pub use config::{CodeOptions, DEFAULT_NOISE_SYMBOL};
pub use diagnostics::{Diagnostics, ResolutionWarning, WarningCode};
pub use error::{CodeError, CodeResult};
pub use expression::Expression;
pub use namespace::{Namespace, NamespaceSource, VariableUnits};

pub use modelcode_core::{Dimension, DimensionMismatchError, Value};
pub use modelcode_units::{UnitRegistry, default_unit_namespace, get_dimensions};
