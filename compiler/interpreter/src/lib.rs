#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Schema interpreter: from parsed schema documents to provider signatures.
//!
//! This crate is the core of the compiler. It reduces parsed type
//! expressions to canonical [`signature::TypeSignature`]s, interprets whole
//! documents into component contracts, and walks a schema directory tree to
//! fold every component and struct type into one [`signature::ProviderSignature`].
//!
//! Interpretation is synchronous and runs to completion or fails outright:
//! one malformed schema file aborts the whole walk and no partial signature
//! is ever returned.

pub mod document;
pub mod reducer;
pub mod walker;

pub use document::interpret;
pub use reducer::reduce_type;
pub use walker::{process_dir, SCHEMA_EXTENSION};

/// The reserved type name whose fields define a component's input ports.
pub const INPUTS_TYPE: &str = "Inputs";

/// The reserved type name whose fields define a component's output ports.
pub const OUTPUTS_TYPE: &str = "Outputs";

/// Errors raised while interpreting schema documents.
///
/// All of these are fatal: none are retried and none are recovered from.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    /// A schema document declared no namespace.
    #[error("component schemas must declare a namespace to use as the component name")]
    MissingNamespace,
    /// A schema document had no type definition named `Inputs`.
    #[error("component schemas must include a type definition named \"Inputs\"")]
    MissingInputs,
    /// A schema document had no type definition named `Outputs`.
    #[error("component schemas must include a type definition named \"Outputs\"")]
    MissingOutputs,
    /// The reducer met a type-expression kind it has not been extended to
    /// cover. This signals an extension gap, not a user data error.
    #[error("unhandled type expression kind: {0}")]
    UnhandledTypeKind(String),
    /// The parser rejected a schema file.
    #[error(transparent)]
    Parse(#[from] parser::ParseError),
    /// A filesystem read failed; propagated untranslated.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias for interpreter operations.
pub type Result<T> = std::result::Result<T, InterpreterError>;
