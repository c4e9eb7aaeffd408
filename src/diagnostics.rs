//! Non-fatal resolution diagnostics.
//!
//! Resolution never stops on an ambiguous binding. Instead it records a
//! [`ResolutionWarning`] in the [`Diagnostics`] it returns, and logs the same
//! warning through `tracing` so it is visible without inspecting the result.
//!
//! # Warning Codes
//!
//! - `InternalShadowed`: an internal variable also has an external binding
//! - `ConflictingDefinition`: several namespaces bind a name to different objects

use std::fmt;

use tracing::warn;

use crate::NamespaceSource;

/// Kinds of resolution warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// An internal variable shares its name with an external binding.
    ///
    /// The internal variable wins: the external binding is ignored.
    InternalShadowed,

    /// Several namespaces bind a name to different objects.
    ///
    /// The binding from the highest-precedence namespace is used.
    ConflictingDefinition,
}

impl WarningCode {
    /// Short name for filtering and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::InternalShadowed => "internal-shadowed",
            WarningCode::ConflictingDefinition => "conflicting-definition",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A warning raised while resolving one identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionWarning {
    /// Warning kind.
    pub kind: WarningCode,
    /// The identifier concerned.
    pub identifier: String,
    /// The code string the identifier appears in.
    pub code: String,
    /// Namespaces that bound the identifier, in precedence order.
    pub sources: Vec<NamespaceSource>,
    /// Human-readable message.
    pub message: String,
}

impl ResolutionWarning {
    /// The namespace whose binding was used, for conflicting definitions.
    pub fn chosen(&self) -> Option<NamespaceSource> {
        match self.kind {
            WarningCode::ConflictingDefinition => self.sources.first().copied(),
            WarningCode::InternalShadowed => None,
        }
    }
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Warnings collected during one resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    warnings: Vec<ResolutionWarning>,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn push(&mut self, warning: ResolutionWarning) {
        warn!(
            code = %warning.code,
            identifier = %warning.identifier,
            kind = %warning.kind,
            "{}",
            warning.message
        );
        self.warnings.push(warning);
    }

    /// Whether no warnings were raised.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of warnings.
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Iterate over the warnings.
    pub fn iter(&self) -> impl Iterator<Item = &ResolutionWarning> {
        self.warnings.iter()
    }

    /// Warnings of one kind.
    pub fn of_kind(&self, kind: WarningCode) -> impl Iterator<Item = &ResolutionWarning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }

    /// Convert to a Vec of warnings.
    pub fn into_vec(self) -> Vec<ResolutionWarning> {
        self.warnings
    }
}

impl IntoIterator for Diagnostics {
    type Item = ResolutionWarning;
    type IntoIter = std::vec::IntoIter<ResolutionWarning>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.into_iter()
    }
}
