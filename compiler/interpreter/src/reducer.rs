//! Type reducer: canonicalizes parsed type expressions.
//!
//! The reducer is a pure function of one type expression and its field
//! annotations. It is deliberately blind to the surrounding catalog: a name
//! outside the primitive set becomes a reference whether or not a struct of
//! that name exists anywhere. Reference validation is a separate post-pass.

use parser::ast::{Annotation, TypeExpression};
use signature::TypeSignature;

use crate::{InterpreterError, Result};

/// The marker type naming a port that links to another provider.
const LINK_TYPE: &str = "link";

/// The marker type for untyped, externally-defined structured data.
const STRUCT_TYPE: &str = "struct";

/// The annotation carrying a link's provider name.
const PROVIDER_ANNOTATION: &str = "provider";

/// Reduce one type expression to its canonical signature.
///
/// Annotations are field-level metadata, so the same slice is propagated to
/// every recursive call regardless of nesting depth.
pub fn reduce_type(ty: &TypeExpression, annotations: &[Annotation]) -> Result<TypeSignature> {
    match ty {
        TypeExpression::Named(name) => Ok(reduce_named(name, annotations)),
        TypeExpression::List(element) => Ok(TypeSignature::List {
            element: Box::new(reduce_type(element, annotations)?),
        }),
        TypeExpression::Map { key, value } => Ok(TypeSignature::Map {
            key: Box::new(reduce_type(key, annotations)?),
            value: Box::new(reduce_type(value, annotations)?),
        }),
        TypeExpression::Optional(inner) => Ok(TypeSignature::Optional {
            option: Box::new(reduce_type(inner, annotations)?),
        }),
        other => Err(InterpreterError::UnhandledTypeKind(other.kind_name().to_string())),
    }
}

fn reduce_named(name: &str, annotations: &[Annotation]) -> TypeSignature {
    if let Some(simple) = TypeSignature::primitive(name) {
        return simple;
    }
    match name {
        LINK_TYPE => {
            let provider = find_annotation(PROVIDER_ANNOTATION, annotations)
                .and_then(|annotation| annotation.arguments.first())
                .map(|argument| argument.value_string());
            TypeSignature::Link { provider }
        }
        STRUCT_TYPE => TypeSignature::Struct,
        _ => TypeSignature::reference(name),
    }
}

fn find_annotation<'a>(name: &str, annotations: &'a [Annotation]) -> Option<&'a Annotation> {
    annotations.iter().find(|annotation| annotation.name == name)
}

#[cfg(test)]
mod tests {
    use parser::ast::Literal;

    use super::*;

    fn named(name: &str) -> TypeExpression { TypeExpression::Named(name.into()) }

    #[test]
    fn test_primitives_reduce_to_themselves() {
        let cases = [
            ("i8", TypeSignature::I8),
            ("u64", TypeSignature::U64),
            ("f32", TypeSignature::F32),
            ("bool", TypeSignature::Bool),
            ("string", TypeSignature::String),
            ("datetime", TypeSignature::Datetime),
            ("bytes", TypeSignature::Bytes),
            ("raw", TypeSignature::Raw),
            ("value", TypeSignature::Value),
        ];
        for (name, expected) in cases {
            assert_eq!(reduce_type(&named(name), &[]).expect("reduce"), expected);
        }
    }

    #[test]
    fn test_unknown_name_reduces_to_ref_without_existence_check() {
        assert_eq!(
            reduce_type(&named("Nonexistent"), &[]).expect("reduce"),
            TypeSignature::Ref { reference: "#/types/Nonexistent".into() }
        );
    }

    #[test]
    fn test_struct_marker() {
        assert_eq!(reduce_type(&named("struct"), &[]).expect("reduce"), TypeSignature::Struct);
    }

    #[test]
    fn test_link_with_provider_annotation() {
        let annotations = vec![Annotation {
            name: "provider".into(),
            arguments: vec![Literal::String("foo".into())],
        }];
        assert_eq!(
            reduce_type(&named("link"), &annotations).expect("reduce"),
            TypeSignature::Link { provider: Some("foo".into()) }
        );
    }

    #[test]
    fn test_link_without_annotation() {
        assert_eq!(
            reduce_type(&named("link"), &[]).expect("reduce"),
            TypeSignature::Link { provider: None }
        );

        // An unrelated annotation does not populate the provider.
        let annotations = vec![Annotation { name: "deprecated".into(), arguments: vec![] }];
        assert_eq!(
            reduce_type(&named("link"), &annotations).expect("reduce"),
            TypeSignature::Link { provider: None }
        );
    }

    #[test]
    fn test_nesting_preserves_structural_depth() {
        // {string: [Entry?]}? reduces depth-for-depth.
        let expression = TypeExpression::Optional(Box::new(TypeExpression::Map {
            key: Box::new(named("string")),
            value: Box::new(TypeExpression::List(Box::new(TypeExpression::Optional(Box::new(
                named("Entry"),
            ))))),
        }));
        let reduced = reduce_type(&expression, &[]).expect("reduce");
        assert_eq!(
            reduced,
            TypeSignature::Optional {
                option: Box::new(TypeSignature::Map {
                    key: Box::new(TypeSignature::String),
                    value: Box::new(TypeSignature::List {
                        element: Box::new(TypeSignature::Optional {
                            option: Box::new(TypeSignature::reference("Entry")),
                        }),
                    }),
                }),
            }
        );
    }

    #[test]
    fn test_annotations_propagate_through_nesting() {
        let annotations = vec![Annotation {
            name: "provider".into(),
            arguments: vec![Literal::String("registry".into())],
        }];
        let expression = TypeExpression::List(Box::new(named("link")));
        assert_eq!(
            reduce_type(&expression, &annotations).expect("reduce"),
            TypeSignature::List {
                element: Box::new(TypeSignature::Link { provider: Some("registry".into()) }),
            }
        );
    }

    #[test]
    fn test_reduction_json_roundtrip() {
        let expression = TypeExpression::Map {
            key: Box::new(named("string")),
            value: Box::new(TypeExpression::Optional(Box::new(named("link")))),
        };
        let reduced = reduce_type(&expression, &[]).expect("reduce");
        let json = serde_json::to_string(&reduced).expect("serialize");
        let parsed: TypeSignature = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, reduced);
    }
}
