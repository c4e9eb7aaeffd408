//! Namespace resolution.
//!
//! Every identifier of a code string is looked up in the candidate
//! namespaces in [`NamespaceSource`] order. Internal variables stay unbound;
//! everything else must bind to exactly one value, the first candidate.

use std::collections::BTreeSet;
use std::sync::Arc;

use modelcode_core::Value;
use modelcode_units::UnitRegistry;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::{CodeError, Diagnostics, Namespace, NamespaceSource, ResolutionWarning, WarningCode};

/// The namespaces an identifier can be resolved from.
pub(crate) struct Sources<'a> {
    pub given: &'a Namespace,
    pub locals: &'a Namespace,
    pub globals: &'a Namespace,
    pub units: &'a UnitRegistry,
}

impl Sources<'_> {
    /// All bindings of `identifier`, highest precedence first.
    fn candidates(&self, identifier: &str) -> Vec<(NamespaceSource, &Arc<Value>)> {
        NamespaceSource::ALL
            .into_iter()
            .filter_map(|source| {
                let value = match source {
                    NamespaceSource::UserDefined => self.given.get(identifier),
                    NamespaceSource::Locals => self.locals.get(identifier),
                    NamespaceSource::Globals => self.globals.get(identifier),
                    NamespaceSource::Units => self.units.get(identifier),
                };
                value.map(|value| (source, value))
            })
            .collect()
    }
}

/// Resolve the identifiers of `code` against `sources`.
///
/// Returns the namespace of external identifiers together with the
/// warnings raised on the way.
///
/// # Errors
///
/// Returns [`CodeError::UnresolvedIdentifier`] for the first (in sorted
/// order) non-internal identifier without any binding.
#[cfg_attr(feature = "profiling", profiling::function)]
pub(crate) fn resolve_identifiers(
    code: &str,
    identifiers: &BTreeSet<String>,
    sources: &Sources<'_>,
    internal_variables: &FxHashSet<String>,
) -> Result<(Namespace, Diagnostics), CodeError> {
    let mut namespace = Namespace::new();
    let mut diagnostics = Diagnostics::new();

    for identifier in identifiers {
        let matches = sources.candidates(identifier);
        trace!(
            identifier = %identifier,
            candidates = ?matches.iter().map(|(s, _)| s.as_str()).collect::<Vec<_>>(),
            "resolving"
        );

        if internal_variables.contains(identifier) {
            if !matches.is_empty() {
                diagnostics.push(shadowed_internal(code, identifier, &matches));
            }
            continue;
        }

        let Some((source, first)) = matches.first() else {
            return Err(CodeError::UnresolvedIdentifier {
                identifier: identifier.clone(),
                code: code.to_string(),
            });
        };
        if matches.iter().any(|(_, value)| !Arc::ptr_eq(value, first)) {
            diagnostics.push(conflicting_definition(code, identifier, &matches));
        }
        trace!(identifier = %identifier, source = %source, "bound");
        namespace.insert_shared(identifier.clone(), Arc::clone(first));
    }

    debug!(
        code,
        bound = namespace.len(),
        warnings = diagnostics.len(),
        "resolved"
    );
    Ok((namespace, diagnostics))
}

fn shadowed_internal(
    code: &str,
    identifier: &str,
    matches: &[(NamespaceSource, &Arc<Value>)],
) -> ResolutionWarning {
    let message = match matches {
        [(source, value)] => format!(
            "The name \"{identifier}\" in the code string \"{code}\" refers to an internal \
             variable but also to a variable in the {source} namespace: {value}"
        ),
        _ => format!(
            "The name \"{identifier}\" in the code string \"{code}\" refers to an internal \
             variable but also to variables in the following namespaces: {}",
            source_list(matches)
        ),
    };
    ResolutionWarning {
        kind: WarningCode::InternalShadowed,
        identifier: identifier.to_string(),
        code: code.to_string(),
        sources: matches.iter().map(|(s, _)| *s).collect(),
        message,
    }
}

fn conflicting_definition(
    code: &str,
    identifier: &str,
    matches: &[(NamespaceSource, &Arc<Value>)],
) -> ResolutionWarning {
    let (chosen, value) = &matches[0];
    let alternates = matches[1..]
        .iter()
        .map(|(source, value)| format!("{source}: {value}"))
        .collect::<Vec<_>>()
        .join(", ");
    ResolutionWarning {
        kind: WarningCode::ConflictingDefinition,
        identifier: identifier.to_string(),
        code: code.to_string(),
        sources: matches.iter().map(|(s, _)| *s).collect(),
        message: format!(
            "The name \"{identifier}\" in the code string \"{code}\" refers to different \
             objects in different namespaces used for resolving. Will use the object from \
             the {chosen} namespace: {value} (alternatives: {alternates})"
        ),
    }
}

fn source_list(matches: &[(NamespaceSource, &Arc<Value>)]) -> String {
    matches
        .iter()
        .map(|(s, _)| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelcode_parser::get_identifiers;

    fn internal(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn units_resolve_last() {
        let given = Namespace::new().with("tau", 0.01);
        let empty = Namespace::new();
        let units = UnitRegistry::standard();
        let sources = Sources {
            given: &given,
            locals: &empty,
            globals: &empty,
            units: &units,
        };
        let code = "-v/tau + mV/ms";
        let (ns, diagnostics) =
            resolve_identifiers(code, &get_identifiers(code), &sources, &internal(&["v"]))
                .unwrap();
        assert_eq!(ns.names(), vec!["mV", "ms", "tau"]);
        assert!(Arc::ptr_eq(ns.get("mV").unwrap(), units.get("mV").unwrap()));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unresolved_identifier() {
        let empty = Namespace::new();
        let units = UnitRegistry::new();
        let sources = Sources {
            given: &empty,
            locals: &empty,
            globals: &empty,
            units: &units,
        };
        let code = "a + b";
        let err = resolve_identifiers(code, &get_identifiers(code), &sources, &internal(&["a"]))
            .unwrap_err();
        assert_eq!(
            err,
            CodeError::UnresolvedIdentifier {
                identifier: "b".into(),
                code: code.into(),
            }
        );
    }

    #[test]
    fn shadowing_lists_every_source() {
        let given = Namespace::new().with("v", 1.0);
        let globals = Namespace::new().with("v", 2.0);
        let empty = Namespace::new();
        let units = UnitRegistry::new();
        let sources = Sources {
            given: &given,
            locals: &empty,
            globals: &globals,
            units: &units,
        };
        let code = "v + 1";
        let (ns, diagnostics) =
            resolve_identifiers(code, &get_identifiers(code), &sources, &internal(&["v"]))
                .unwrap();
        assert!(ns.is_empty());
        let warnings = diagnostics.into_vec();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].sources,
            vec![NamespaceSource::UserDefined, NamespaceSource::Globals]
        );
        assert!(warnings[0].message.contains("user-defined, globals"));
    }
}
