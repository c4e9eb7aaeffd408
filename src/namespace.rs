//! Namespaces and their precedence.

use std::fmt;
use std::sync::Arc;

use modelcode_core::{Dimension, Value};
use rustc_hash::FxHashMap;

/// A mapping from identifiers to shared values.
///
/// Values are held behind [`Arc`]: inserting the same `Arc` under a name in
/// two namespaces makes both refer to one object, which resolution treats
/// differently from two equal but distinct values.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    entries: FxHashMap<String, Arc<Value>>,
}

impl Namespace {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(name.into(), Arc::new(value.into()));
        self
    }

    /// Bind `name` to an existing shared value.
    pub fn insert_shared(&mut self, name: impl Into<String>, value: Arc<Value>) -> &mut Self {
        self.entries.insert(name.into(), value);
        self
    }

    /// Chaining form of [`Namespace::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<&Arc<Value>> {
        self.entries.get(name)
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove a binding.
    pub fn remove(&mut self, name: &str) -> Option<Arc<Value>> {
        self.entries.remove(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the bindings in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Value>)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Bound names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Copy every binding of `other` into `self`, replacing existing ones.
    pub fn extend_from(&mut self, other: &Namespace) {
        self.entries
            .extend(other.entries.iter().map(|(k, v)| (k.clone(), Arc::clone(v))));
    }

    /// Stand-in values for dimension checking: a unit quantity per variable.
    pub fn from_units(units: &VariableUnits) -> Self {
        units
            .iter()
            .map(|(name, dim)| (name.clone(), Value::quantity(1.0, *dim)))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| (name.into(), Arc::new(value)))
                .collect(),
        }
    }
}

impl<S: Into<String>> Extend<(S, Value)> for Namespace {
    fn extend<I: IntoIterator<Item = (S, Value)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

/// Physical dimensions of internal variables, by name.
pub type VariableUnits = FxHashMap<String, Dimension>;

/// Where a candidate binding for an identifier came from.
///
/// The ordering is the resolution precedence: when several sources bind a
/// name, the smallest one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NamespaceSource {
    /// The namespace given explicitly at construction.
    UserDefined,
    /// The caller's local scope snapshot.
    Locals,
    /// The caller's global scope snapshot.
    Globals,
    /// The reserved units namespace.
    Units,
}

impl NamespaceSource {
    /// All sources, highest precedence first.
    pub const ALL: [NamespaceSource; 4] = [
        NamespaceSource::UserDefined,
        NamespaceSource::Locals,
        NamespaceSource::Globals,
        NamespaceSource::Units,
    ];

    /// The name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            NamespaceSource::UserDefined => "user-defined",
            NamespaceSource::Locals => "locals",
            NamespaceSource::Globals => "globals",
            NamespaceSource::Units => "units",
        }
    }
}

impl fmt::Display for NamespaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
