//! Structural type descriptions used for schema deduction.
//!
//! Instead of runtime reflection, each describable type states its own shape
//! up front: a generic key-value container, a scalar, or a structured record
//! with named fields. The deducer classifies payloads by this shape alone.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Structural classification of a parameter or payload type.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeShape {
    /// A generic key-value container (maps, untyped JSON objects).
    Map,
    /// A primitive or built-in scalar, carrying its declared type name.
    Scalar {
        /// Declared type name, e.g. `"i64"` or `"String"`.
        name: String,
    },
    /// A structured record with named fields.
    Structured {
        /// Declared type name of the record.
        name: String,
        /// The record's fields, in declaration order.
        fields: Vec<FieldShape>,
    },
}

impl TypeShape {
    /// Creates a scalar shape with the given declared type name.
    #[must_use]
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar { name: name.into() }
    }

    /// Creates a structured shape with the given type name and fields.
    #[must_use]
    pub fn structured(name: impl Into<String>, fields: Vec<FieldShape>) -> Self {
        Self::Structured {
            name: name.into(),
            fields,
        }
    }
}

/// A single named field within a structured shape.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FieldShape {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

impl FieldShape {
    /// Creates a field shape from a name and a declared type name.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type name of the field.
    #[must_use]
    pub fn ty(&self) -> &str {
        &self.ty
    }
}

/// Types that can describe their own structural shape.
pub trait Describe {
    /// Returns the structural shape of the implementing type.
    fn type_shape() -> TypeShape;
}

macro_rules! scalar_describe {
    ($($ty:ty => $name:literal),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn type_shape() -> TypeShape {
                    TypeShape::scalar($name)
                }
            }
        )+
    };
}

scalar_describe! {
    bool => "bool",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    f32 => "f32",
    f64 => "f64",
    char => "char",
    String => "String",
    &str => "String",
}

impl<K, V> Describe for HashMap<K, V> {
    fn type_shape() -> TypeShape {
        TypeShape::Map
    }
}

impl<K, V> Describe for BTreeMap<K, V> {
    fn type_shape() -> TypeShape {
        TypeShape::Map
    }
}

impl Describe for serde_json::Value {
    fn type_shape() -> TypeShape {
        TypeShape::Map
    }
}

impl Describe for serde_json::Map<String, serde_json::Value> {
    fn type_shape() -> TypeShape {
        TypeShape::Map
    }
}
