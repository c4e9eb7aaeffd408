//! The reserved units namespace.
//!
//! Model code may use physical units (`mV`, `ms`, `nS`), mathematical
//! constants (`pi`, `e`, `inf`) and functions (`exp`, `sqrt`, ...) without
//! binding them. They are looked up last during resolution, from a
//! [`UnitRegistry`]; [`default_unit_namespace`] returns the shared standard
//! one.

mod functions;
mod registry;
mod units;

pub use registry::{UnitRegistry, default_unit_namespace, get_dimensions};
pub use units::PREFIXES;
