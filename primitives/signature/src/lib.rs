#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Weft type-signature model.
//!
//! This crate defines the canonical, serializable representation of component
//! contracts: type signatures, struct definitions, component port lists, and
//! the provider signature that bundles a whole schema directory into one flat
//! catalog. The provider signature is the bridge between schema interpretation
//! and backend code generation.

pub mod provider_signature;
pub mod type_map;

// Re-export the main signature types for convenience
pub use provider_signature::*;
pub use type_map::TypeMap;
