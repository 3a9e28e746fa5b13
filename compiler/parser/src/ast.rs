//! Abstract syntax tree for component schema files.
//!
//! The tree is deliberately flat: a document is a list of top-level
//! definitions, and consumers filter for the kinds they understand. The
//! definition and type-expression enums are non-exhaustive so that future
//! schema-language extensions force downstream crates to fail loudly in
//! their catch-all arms instead of silently mis-handling new kinds.

/// One parsed schema file, after import splicing.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Top-level definitions in source order. Type definitions spliced in
    /// from imports appear before the import marker that produced them.
    pub definitions: Vec<Definition>,
}

/// A top-level definition in a schema document.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// A `namespace "<name>"` declaration.
    Namespace(NamespaceDefinition),
    /// A `type <Name> { ... }` definition.
    Type(TypeDefinition),
    /// An `import ... from "<path>"` marker, kept for provenance.
    Import(ImportDefinition),
}

/// The namespace declaration naming a schema's component.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDefinition {
    /// Declared namespace name.
    pub name: String,
}

/// A named struct type with an ordered field list.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    /// Type name.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

/// Record of an import statement after its definitions were spliced.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDefinition {
    /// Imported type names, or `None` for a `*` import.
    pub names: Option<Vec<String>>,
    /// The import path as written in the schema.
    pub location: String,
}

/// One field of a type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// The field's type expression.
    pub ty: TypeExpression,
    /// Annotations attached to the field, in source order.
    pub annotations: Vec<Annotation>,
}

/// A named, argument-bearing metadata tag attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Annotation name, without the leading `@`.
    pub name: String,
    /// Literal arguments in source order; empty for bare annotations.
    pub arguments: Vec<Literal>,
}

/// A literal annotation argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A quoted string.
    String(String),
    /// An integer.
    Integer(i64),
    /// `true` or `false`.
    Bool(bool),
}

impl Literal {
    /// The literal's value rendered as a string.
    pub fn value_string(&self) -> String {
        match self {
            Literal::String(value) => value.clone(),
            Literal::Integer(value) => value.to_string(),
            Literal::Bool(value) => value.to_string(),
        }
    }

    /// The string value, if this literal is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(value) => Some(value),
            _ => None,
        }
    }
}

/// A type expression as written in a schema field.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpression {
    /// A bare type name: a primitive, a marker, or a struct reference.
    Named(String),
    /// `[T]`.
    List(Box<TypeExpression>),
    /// `{K: V}`.
    Map {
        /// Key expression.
        key: Box<TypeExpression>,
        /// Value expression.
        value: Box<TypeExpression>,
    },
    /// `T?`; may wrap any expression, including another optional.
    Optional(Box<TypeExpression>),
}

impl TypeExpression {
    /// Stable name of this expression kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeExpression::Named(_) => "named",
            TypeExpression::List(_) => "list",
            TypeExpression::Map { .. } => "map",
            TypeExpression::Optional(_) => "optional",
        }
    }
}
