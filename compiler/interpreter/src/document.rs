//! Document interpreter: one parsed schema file to one component contract.

use parser::ast::{Definition, Document, TypeDefinition};
use signature::{ComponentSignature, StructSignature, TypeMap};

use crate::reducer::reduce_type;
use crate::{InterpreterError, Result, INPUTS_TYPE, OUTPUTS_TYPE};

/// Interpret a schema document into its component signature plus the struct
/// signatures of every auxiliary type it defines.
///
/// The document must declare a namespace and type definitions named
/// `Inputs` and `Outputs`; each absence is a fatal error. Every other type
/// definition is surfaced as a struct signature whether or not the ports
/// reference it; the caller folds them into the shared type catalog.
pub fn interpret(document: &Document) -> Result<(ComponentSignature, Vec<StructSignature>)> {
    let types: Vec<&TypeDefinition> = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            Definition::Type(ty) => Some(ty),
            // Namespace handled below; imports and future kinds are ignored.
            _ => None,
        })
        .collect();

    let namespace = document
        .definitions
        .iter()
        .find_map(|definition| match definition {
            Definition::Namespace(ns) => Some(ns),
            _ => None,
        })
        .ok_or(InterpreterError::MissingNamespace)?;
    let inputs_def =
        find_by_name(&types, INPUTS_TYPE).ok_or(InterpreterError::MissingInputs)?;
    let outputs_def =
        find_by_name(&types, OUTPUTS_TYPE).ok_or(InterpreterError::MissingOutputs)?;

    let component = ComponentSignature {
        name: namespace.name.clone(),
        inputs: reduce_fields(inputs_def)?,
        outputs: reduce_fields(outputs_def)?,
    };

    let structs = types
        .iter()
        .filter(|ty| ty.name != INPUTS_TYPE && ty.name != OUTPUTS_TYPE)
        .map(|ty| reduce_type_definition(ty))
        .collect::<Result<Vec<_>>>()?;

    Ok((component, structs))
}

fn find_by_name<'a>(types: &[&'a TypeDefinition], name: &str) -> Option<&'a TypeDefinition> {
    types.iter().find(|ty| ty.name == name).copied()
}

/// Reduce a type definition's fields in declaration order.
fn reduce_fields(definition: &TypeDefinition) -> Result<TypeMap> {
    let mut fields = TypeMap::new();
    for field in &definition.fields {
        fields.insert(field.name.clone(), reduce_type(&field.ty, &field.annotations)?);
    }
    Ok(fields)
}

fn reduce_type_definition(definition: &TypeDefinition) -> Result<StructSignature> {
    Ok(StructSignature { name: definition.name.clone(), fields: reduce_fields(definition)? })
}
