//! Named, typed symbols

use crate::ty::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A field, parameter or local variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Identifier, unique within its owning scope
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Symbol {
    /// Create a new symbol
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}
