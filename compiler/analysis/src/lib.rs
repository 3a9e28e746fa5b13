#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Post-pass analysis over finished provider signatures.
//!
//! The type reducer never checks whether a reference's target exists; it is
//! a pure function of one type expression. This crate supplies the optional
//! validation pass that runs over a complete [`ProviderSignature`] instead,
//! so reduction stays simple and testable in isolation.

use signature::{ref_target, ProviderSignature, TypeMap, TypeSignature};

/// A reference whose target struct is absent from the type catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Where the reference was found, e.g. `component 'reader', input 'card'`.
    pub context: String,
    /// The unresolved reference path, e.g. `#/types/Card`.
    pub reference: String,
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} references undefined type {}", self.context, self.reference)
    }
}

/// Check every reference reachable from the catalog and report the ones
/// whose `#/types/<name>` target does not exist.
///
/// Diagnostics are advisory: a dangling reference may be resolved by a
/// sibling provider at composition time, so callers decide whether to treat
/// them as fatal.
pub fn check_references(provider: &ProviderSignature) -> Vec<DanglingReference> {
    let mut diagnostics = Vec::new();

    for (name, component) in &provider.components {
        let input_context = format!("component '{}', input", name);
        check_ports(provider, &component.inputs, &input_context, &mut diagnostics);
        let output_context = format!("component '{}', output", name);
        check_ports(provider, &component.outputs, &output_context, &mut diagnostics);
    }
    for (name, ty) in &provider.types {
        let field_context = format!("type '{}', field", name);
        check_ports(provider, &ty.fields, &field_context, &mut diagnostics);
    }

    diagnostics
}

fn check_ports(
    provider: &ProviderSignature,
    ports: &TypeMap,
    context: &str,
    diagnostics: &mut Vec<DanglingReference>,
) {
    for (port, signature) in ports.iter() {
        check_signature(provider, signature, &format!("{} '{}'", context, port), diagnostics);
    }
}

fn check_signature(
    provider: &ProviderSignature,
    ty: &TypeSignature,
    context: &str,
    diagnostics: &mut Vec<DanglingReference>,
) {
    match ty {
        TypeSignature::Ref { reference } => {
            let resolves = ref_target(reference)
                .map(|target| provider.types.contains_key(target))
                .unwrap_or(false);
            if !resolves {
                diagnostics.push(DanglingReference {
                    context: context.to_string(),
                    reference: reference.clone(),
                });
            }
        }
        TypeSignature::Map { key, value } => {
            check_signature(provider, key, context, diagnostics);
            check_signature(provider, value, context, diagnostics);
        }
        TypeSignature::List { element } => check_signature(provider, element, context, diagnostics),
        TypeSignature::Optional { option } => {
            check_signature(provider, option, context, diagnostics)
        }
        _ => {}
    }
}
