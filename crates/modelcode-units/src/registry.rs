//! The units namespace: a name → value registry.

use std::sync::{Arc, OnceLock};

use modelcode_core::{Dimension, Value};
use rustc_hash::FxHashMap;

/// A registry of reserved names: units, constants, and functions.
///
/// Values are stored behind [`Arc`] so that every namespace resolving a
/// name from the same registry shares one object; identity comparisons
/// (`Arc::ptr_eq`) can then tell "the same unit" from "an equal value".
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    entries: FxHashMap<String, Arc<Value>>,
}

impl UnitRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the standard registry: SI units with prefixes, squared and
    /// cubed lengths, `pi`, `e`, `inf`, and the mathematical functions.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        crate::units::register(&mut registry);
        crate::functions::register(&mut registry);
        registry
    }

    /// Insert or replace an entry, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Arc<Value>> {
        self.entries.insert(name.into(), Arc::new(value))
    }

    /// Insert an entry unless the name is taken.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: Value) {
        self.entries
            .entry(name.into())
            .or_insert_with(|| Arc::new(value));
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<&Arc<Value>> {
        self.entries.get(name)
    }

    /// Whether the name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Value>)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// The process-wide standard registry, built on first use.
pub fn default_unit_namespace() -> Arc<UnitRegistry> {
    static DEFAULT: OnceLock<Arc<UnitRegistry>> = OnceLock::new();
    Arc::clone(DEFAULT.get_or_init(|| Arc::new(UnitRegistry::standard())))
}

/// The physical dimension of a value.
///
/// Booleans are dimensionless; functions have no dimension.
pub fn get_dimensions(value: &Value) -> Option<Dimension> {
    value.dimension()
}
