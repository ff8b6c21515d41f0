//! Core type definitions for the Java-- type system

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name of the 32-bit integer type
pub const INT: &str = "int";
/// Name of the boolean type
pub const BOOLEAN: &str = "boolean";
/// Name of the void type
pub const VOID: &str = "void";
/// Name of the built-in string class
pub const STRING: &str = "String";

/// Orthogonal flags attached to a type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAttributes {
    /// Trailing array parameter accepting a variable argument count
    #[serde(default)]
    pub varargs: bool,
}

/// A Java-- type: a primitive tag, `String`, or a class/import identifier,
/// optionally one-dimensional array.
///
/// Equality and hashing consider only `name` and `is_array`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Type {
    /// Primitive tag or class name
    pub name: String,
    /// Whether this is a one-dimensional array of `name`
    pub is_array: bool,
    /// Flags that do not take part in equality
    #[serde(default)]
    pub attributes: TypeAttributes,
}

impl Type {
    /// Create a scalar type with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_array: false,
            attributes: TypeAttributes::default(),
        }
    }

    /// Create an array type with the given element name
    pub fn array(name: impl Into<String>) -> Self {
        Self {
            is_array: true,
            ..Self::new(name)
        }
    }

    /// `int`
    pub fn int() -> Self {
        Self::new(INT)
    }

    /// `int[]`
    pub fn int_array() -> Self {
        Self::array(INT)
    }

    /// `boolean`
    pub fn boolean() -> Self {
        Self::new(BOOLEAN)
    }

    /// `void`
    pub fn void() -> Self {
        Self::new(VOID)
    }

    /// `String`
    pub fn string() -> Self {
        Self::new(STRING)
    }

    /// Mark this type as a varargs parameter (implies array)
    pub fn with_varargs(mut self) -> Self {
        self.is_array = true;
        self.attributes.varargs = true;
        self
    }

    /// Whether the varargs flag is set
    pub fn is_varargs(&self) -> bool {
        self.attributes.varargs
    }

    /// Scalar `int`
    pub fn is_int(&self) -> bool {
        !self.is_array && self.name == INT
    }

    /// Scalar `boolean`
    pub fn is_boolean(&self) -> bool {
        !self.is_array && self.name == BOOLEAN
    }

    /// `void` (never an array)
    pub fn is_void(&self) -> bool {
        self.name == VOID
    }

    /// Whether the name is one of the primitive tags
    pub fn is_primitive_name(&self) -> bool {
        matches!(self.name.as_str(), INT | BOOLEAN | VOID)
    }

    /// Values of this type are held as references on the target machine
    pub fn is_reference(&self) -> bool {
        self.is_array || !self.is_primitive_name()
    }

    /// The element type of an array, `None` for scalars
    pub fn element(&self) -> Option<Type> {
        self.is_array.then(|| Type::new(self.name.clone()))
    }

    /// Drop attribute flags, keeping only the identity of the type
    pub fn without_attributes(&self) -> Type {
        Self {
            name: self.name.clone(),
            is_array: self.is_array,
            attributes: TypeAttributes::default(),
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.is_array == other.is_array
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.is_array.hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_array, self.is_varargs()) {
            (true, true) => write!(f, "{}...", self.name),
            (true, false) => write!(f, "{}[]", self.name),
            _ => write!(f, "{}", self.name),
        }
    }
}
