//! Explicit per-method resolution context
//!
//! A [`MethodScope`] is built once per method and passed down every
//! inference and lowering call, so name resolution never depends on the order
//! nodes are visited in.

use crate::policy::CheckerPolicy;
use jmm_types::{MethodSignature, Symbol, SymbolTable, Type};

/// Where a resolved variable lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarOrigin {
    /// Method local
    Local,
    /// Formal parameter
    Parameter,
    /// Class field
    Field,
}

/// A variable found by [`MethodScope::resolve`]
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// The declaring symbol
    pub symbol: &'a Symbol,
    /// Which scope it came from
    pub origin: VarOrigin,
}

impl Resolved<'_> {
    /// Whether the variable is a field of the class
    pub fn is_field(&self) -> bool {
        self.origin == VarOrigin::Field
    }
}

/// Resolution context of the method being checked or lowered
#[derive(Debug, Clone, Copy)]
pub struct MethodScope<'a> {
    table: &'a SymbolTable,
    method: &'a MethodSignature,
    policy: CheckerPolicy,
}

impl<'a> MethodScope<'a> {
    /// Scope of `method` within `table`
    pub fn new(table: &'a SymbolTable, method: &'a MethodSignature, policy: CheckerPolicy) -> Self {
        Self {
            table,
            method,
            policy,
        }
    }

    /// The class symbol table
    pub fn table(&self) -> &'a SymbolTable {
        self.table
    }

    /// Signature of the current method
    pub fn method(&self) -> &'a MethodSignature {
        self.method
    }

    /// Active policy flags
    pub fn policy(&self) -> CheckerPolicy {
        self.policy
    }

    /// Whether the current method is static
    pub fn is_static(&self) -> bool {
        self.method.is_static
    }

    /// Declared return type of the current method
    pub fn return_type(&self) -> Type {
        self.method.return_type.without_attributes()
    }

    /// Resolve `name` with precedence locals, then parameters, then fields
    pub fn resolve(&self, name: &str) -> Option<Resolved<'a>> {
        if let Some(symbol) = self.method.local(name) {
            return Some(Resolved {
                symbol,
                origin: VarOrigin::Local,
            });
        }
        if let Some(symbol) = self.method.parameter(name) {
            return Some(Resolved {
                symbol,
                origin: VarOrigin::Parameter,
            });
        }
        self.table.field(name).map(|symbol| Resolved {
            symbol,
            origin: VarOrigin::Field,
        })
    }

    /// Whether a class name is known: the class itself, its superclass or
    /// an import
    pub fn is_known_class(&self, name: &str) -> bool {
        name == self.table.class_name || self.table.is_super(name) || self.table.is_imported(name)
    }

    /// Whether a value of type `value` may be stored where `target` is
    /// expected.
    ///
    /// Accepts equal types, an upcast from the declared class to its
    /// superclass, and (with `lenient_imports`) any pair of imported names.
    pub fn is_assignable(&self, target: &Type, value: &Type) -> bool {
        if target == value {
            return true;
        }
        if target.is_array != value.is_array {
            return false;
        }
        if value.name == self.table.class_name && self.table.is_super(&target.name) {
            return true;
        }
        self.policy.lenient_imports
            && self.table.is_imported(&target.name)
            && self.table.is_imported(&value.name)
    }
}
