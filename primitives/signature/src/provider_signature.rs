//! Canonical type signatures and the provider catalog.
//!
//! A provider signature is the root artifact of schema interpretation: every
//! component contract and every named struct type discovered under a schema
//! directory, flattened into one self-contained catalog that is independent
//! of the originating filesystem layout.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::type_map::TypeMap;

/// Prefix used by [`TypeSignature::Ref`] paths into the shared type catalog.
pub const REF_PREFIX: &str = "#/types/";

/// The canonical representation of one type expression.
///
/// Signatures are structurally closed under recursion: a single expression
/// never cycles, while cycles between named structs are expressed by
/// [`TypeSignature::Ref`] paths rather than by embedding.
///
/// Serialized form always carries a `"type"` discriminant plus kind-specific
/// fields, e.g. `{"type":"map","key":...,"value":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeSignature {
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 64-bit integer.
    U64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    String,
    /// Date/time value.
    Datetime,
    /// Arbitrary byte buffer.
    Bytes,
    /// Raw, unvalidated payload.
    Raw,
    /// Opaque "any" value.
    Value,
    /// Externally-defined structured blob; distinct from a named reference.
    Struct,
    /// Reference to a named struct type elsewhere in the same catalog.
    Ref {
        /// Path into the catalog, of the form `#/types/<name>`.
        #[serde(rename = "ref")]
        reference: String,
    },
    /// Map from key signatures to value signatures.
    Map {
        /// Key signature.
        key: Box<TypeSignature>,
        /// Value signature.
        value: Box<TypeSignature>,
    },
    /// Homogeneous list.
    List {
        /// Element signature.
        element: Box<TypeSignature>,
    },
    /// Optional wrapper around any signature, including another optional.
    Optional {
        /// The wrapped signature.
        option: Box<TypeSignature>,
    },
    /// A port that is itself a connection to another provider.
    Link {
        /// Provider name captured from a `@provider` annotation, if present.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider: Option<String>,
    },
}

impl TypeSignature {
    /// Resolve a primitive scalar name to its signature.
    ///
    /// Returns `None` for any name outside the fixed closed set, including
    /// the `link` and `struct` markers.
    pub fn primitive(name: &str) -> Option<Self> {
        let signature = match name {
            "i8" => Self::I8,
            "u8" => Self::U8,
            "i16" => Self::I16,
            "u16" => Self::U16,
            "i32" => Self::I32,
            "u32" => Self::U32,
            "i64" => Self::I64,
            "u64" => Self::U64,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "bool" => Self::Bool,
            "string" => Self::String,
            "datetime" => Self::Datetime,
            "bytes" => Self::Bytes,
            "raw" => Self::Raw,
            "value" => Self::Value,
            _ => return None,
        };
        Some(signature)
    }

    /// Build a reference to the named struct type, e.g. `reference("Pair")`
    /// yields the path `#/types/Pair`.
    pub fn reference(name: &str) -> Self {
        Self::Ref { reference: format!("{}{}", REF_PREFIX, name) }
    }
}

/// Extract the struct name a reference path points at.
///
/// Returns `None` when the path does not start with [`REF_PREFIX`].
pub fn ref_target(reference: &str) -> Option<&str> { reference.strip_prefix(REF_PREFIX) }

/// A named struct type: a unique set of named, typed fields.
///
/// Built once per struct definition found in a schema file (the reserved
/// `Inputs`/`Outputs` definitions excepted) and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructSignature {
    /// Struct name, the key under which it is stored in the catalog.
    pub name: String,
    /// Field name to signature, in declaration order.
    pub fields: TypeMap,
}

/// One component contract: its catalog name plus input and output ports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSignature {
    /// Component name. Taken from the schema's namespace declaration; for
    /// schemas found under subdirectories the directory walker rewrites this
    /// to the `::`-joined prefix path, e.g. `sub::dir::name`.
    pub name: String,
    /// Input ports, in declaration order.
    pub inputs: TypeMap,
    /// Output ports, in declaration order.
    pub outputs: TypeMap,
}

/// The root artifact: all components and named struct types discovered under
/// a schema directory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSignature {
    /// Provider name, supplied by the caller.
    pub name: String,
    /// Shared struct type catalog, keyed by struct name.
    pub types: BTreeMap<String, StructSignature>,
    /// Component catalog, keyed by component name.
    pub components: BTreeMap<String, ComponentSignature>,
}

impl ProviderSignature {
    /// Load a provider signature from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let signature: Self = serde_json::from_str(&content)?;
        Ok(signature)
    }

    /// Save the provider signature to a JSON file with pretty formatting.
    pub fn to_file(&self, path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        // Ensure file ends with a newline (POSIX standard)
        use std::io::Write;
        writeln!(file)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const PRIMITIVE_NAMES: [&str; 16] = [
        "i8", "u8", "i16", "u16", "i32", "u32", "i64", "u64", "f32", "f64", "bool", "string",
        "datetime", "bytes", "raw", "value",
    ];

    #[test]
    fn test_primitive_lookup() {
        for name in PRIMITIVE_NAMES {
            let signature = TypeSignature::primitive(name)
                .unwrap_or_else(|| panic!("'{}' should be a primitive", name));
            let serialized = serde_json::to_value(&signature).expect("serialize");
            assert_eq!(serialized, json!({ "type": name }));
        }
        assert_eq!(TypeSignature::primitive("link"), None);
        assert_eq!(TypeSignature::primitive("struct"), None);
        assert_eq!(TypeSignature::primitive("Pair"), None);
    }

    #[test]
    fn test_primitive_json_roundtrip() {
        for name in PRIMITIVE_NAMES {
            let signature = TypeSignature::primitive(name).expect("primitive");
            let json = serde_json::to_string(&signature).expect("serialize");
            let parsed: TypeSignature = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(parsed, signature);
        }
    }

    #[test]
    fn test_nested_signature_shape_and_roundtrip() {
        let signature = TypeSignature::Optional {
            option: Box::new(TypeSignature::Map {
                key: Box::new(TypeSignature::String),
                value: Box::new(TypeSignature::List {
                    element: Box::new(TypeSignature::reference("Entry")),
                }),
            }),
        };

        let serialized = serde_json::to_value(&signature).expect("serialize");
        assert_eq!(
            serialized,
            json!({
                "type": "optional",
                "option": {
                    "type": "map",
                    "key": { "type": "string" },
                    "value": {
                        "type": "list",
                        "element": { "type": "ref", "ref": "#/types/Entry" }
                    }
                }
            })
        );

        let parsed: TypeSignature = serde_json::from_value(serialized).expect("deserialize");
        assert_eq!(parsed, signature);
    }

    #[test]
    fn test_link_provider_serialization() {
        let bare = TypeSignature::Link { provider: None };
        assert_eq!(serde_json::to_value(&bare).expect("serialize"), json!({ "type": "link" }));

        let named = TypeSignature::Link { provider: Some("kv-store".into()) };
        assert_eq!(
            serde_json::to_value(&named).expect("serialize"),
            json!({ "type": "link", "provider": "kv-store" })
        );

        let parsed: TypeSignature =
            serde_json::from_value(json!({ "type": "link" })).expect("deserialize");
        assert_eq!(parsed, bare);
    }

    #[test]
    fn test_ref_target() {
        assert_eq!(ref_target("#/types/Entry"), Some("Entry"));
        assert_eq!(ref_target("Entry"), None);
        match TypeSignature::reference("Entry") {
            TypeSignature::Ref { reference } => assert_eq!(reference, "#/types/Entry"),
            other => panic!("expected a ref, got {:?}", other),
        }
    }

    #[test]
    fn test_provider_signature_json_shape() {
        let mut inputs = TypeMap::new();
        inputs.insert("name", TypeSignature::String);
        let mut outputs = TypeMap::new();
        outputs.insert("greeting", TypeSignature::String);

        let mut signature = ProviderSignature { name: "".into(), ..Default::default() };
        signature.components.insert(
            "Greeter".into(),
            ComponentSignature { name: "Greeter".into(), inputs, outputs },
        );

        let serialized = serde_json::to_value(&signature).expect("serialize");
        assert_eq!(
            serialized,
            json!({
                "name": "",
                "types": {},
                "components": {
                    "Greeter": {
                        "name": "Greeter",
                        "inputs": { "name": { "type": "string" } },
                        "outputs": { "greeting": { "type": "string" } }
                    }
                }
            })
        );
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("provider.json");

        let mut fields = TypeMap::new();
        fields.insert("left", TypeSignature::I32);
        fields.insert("right", TypeSignature::Optional { option: Box::new(TypeSignature::I32) });

        let mut signature = ProviderSignature { name: "example".into(), ..Default::default() };
        signature
            .types
            .insert("Pair".into(), StructSignature { name: "Pair".into(), fields });

        signature.to_file(&path).expect("write signature");
        let loaded = ProviderSignature::from_file(&path).expect("read signature");
        assert_eq!(loaded, signature);

        let raw = std::fs::read_to_string(&path).expect("raw contents");
        assert!(raw.ends_with('\n'), "file should end with a newline");
    }
}
