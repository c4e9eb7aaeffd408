//! Options shared by a code string and everything derived from it.

use std::sync::Arc;

use modelcode_units::{UnitRegistry, default_unit_namespace};

/// Name of the white-noise symbol unless configured otherwise.
pub const DEFAULT_NOISE_SYMBOL: &str = "xi";

/// Options attached to annotated code at construction.
///
/// Children created by `frozen()` and `split_stochastic()` inherit the
/// options of their parent.
#[derive(Debug, Clone)]
pub struct CodeOptions {
    /// Symbol of the noise process recognised by `split_stochastic`.
    pub noise_symbol: String,
    /// The reserved units namespace, consulted last during resolution.
    pub units: Arc<UnitRegistry>,
}

impl Default for CodeOptions {
    fn default() -> Self {
        Self {
            noise_symbol: DEFAULT_NOISE_SYMBOL.to_string(),
            units: default_unit_namespace(),
        }
    }
}

impl CodeOptions {
    /// Use a different noise symbol.
    pub fn with_noise_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.noise_symbol = symbol.into();
        self
    }

    /// Use a different units namespace.
    pub fn with_units(mut self, units: Arc<UnitRegistry>) -> Self {
        self.units = units;
        self
    }
}
