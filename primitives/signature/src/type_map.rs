//! Insertion-ordered port and field maps.
//!
//! Component ports are logically ordered, not merely keyed: the order fields
//! appear in a schema is the order downstream generators must see them. A
//! `TypeMap` therefore preserves insertion order while still serializing as a
//! plain JSON object.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::provider_signature::TypeSignature;

/// An ordered mapping from member name to [`TypeSignature`].
///
/// Keys are unique; inserting an existing key replaces its value in place
/// without moving the entry. Iteration yields entries in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMap {
    entries: Vec<(String, TypeSignature)>,
}

impl TypeMap {
    /// Create a new empty map.
    pub fn new() -> Self { Self::default() }

    /// Insert a signature under `name`.
    ///
    /// Returns the previous signature if `name` was already present; the
    /// entry keeps its original position in that case.
    pub fn insert(&mut self, name: impl Into<String>, signature: TypeSignature) -> Option<TypeSignature> {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, signature)),
            None => {
                self.entries.push((name, signature));
                None
            }
        }
    }

    /// Get the signature stored under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&TypeSignature> {
        self.entries.iter().find(|(existing, _)| existing == name).map(|(_, sig)| sig)
    }

    /// Whether `name` is present in the map.
    pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }

    /// Number of entries in the map.
    pub fn len(&self) -> usize { self.entries.len() }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Iterate over `(name, signature)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeSignature)> {
        self.entries.iter().map(|(name, sig)| (name.as_str(), sig))
    }
}

impl FromIterator<(String, TypeSignature)> for TypeMap {
    fn from_iter<I: IntoIterator<Item = (String, TypeSignature)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, signature) in iter {
            map.insert(name, signature);
        }
        map
    }
}

impl Serialize for TypeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, signature) in &self.entries {
            map.serialize_entry(name, signature)?;
        }
        map.end()
    }
}

struct TypeMapVisitor;

impl<'de> Visitor<'de> for TypeMapVisitor {
    type Value = TypeMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of member names to type signatures")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = TypeMap::new();
        while let Some((name, signature)) = access.next_entry::<String, TypeSignature>()? {
            map.insert(name, signature);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for TypeMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TypeMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut map = TypeMap::new();
        map.insert("zebra", TypeSignature::String);
        map.insert("apple", TypeSignature::Bool);
        map.insert("middle", TypeSignature::I32);

        let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zebra", "apple", "middle"]);

        let json = serde_json::to_string(&map).expect("serialize");
        let zebra = json.find("zebra").expect("zebra present");
        let apple = json.find("apple").expect("apple present");
        assert!(zebra < apple, "serialized order must match insertion order");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = TypeMap::new();
        map.insert("first", TypeSignature::String);
        map.insert("second", TypeSignature::Bool);

        let previous = map.insert("first", TypeSignature::I64);
        assert_eq!(previous, Some(TypeSignature::String));
        assert_eq!(map.get("first"), Some(&TypeSignature::I64));
        assert_eq!(map.len(), 2);

        let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["first", "second"], "replaced entry keeps its position");
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let json = r#"{"b":{"type":"string"},"a":{"type":"bool"}}"#;
        let map: TypeMap = serde_json::from_str(json).expect("deserialize");
        let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
