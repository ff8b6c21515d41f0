//! The symbol table read contract
//!
//! A [`SymbolTable`] describes one compilation unit: the class, its optional
//! superclass, the imported (opaque) classes, fields and methods. It is built
//! once before checking and never mutated afterwards.

use crate::symbol::Symbol;
use crate::ty::Type;
use serde::{Deserialize, Serialize};

/// Name of the static entry point
pub const ENTRY_POINT: &str = "main";

/// Signature of one declared method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    /// Method name
    pub name: String,
    /// Declared return type
    pub return_type: Type,
    /// Formal parameters in declaration order
    pub parameters: Vec<Symbol>,
    /// Local variables in declaration order
    pub locals: Vec<Symbol>,
    /// Declared `static`
    #[serde(default)]
    pub is_static: bool,
    /// Declared `public`
    #[serde(default)]
    pub is_public: bool,
}

impl MethodSignature {
    /// Create a signature without parameters or locals
    pub fn new(name: impl Into<String>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters: Vec::new(),
            locals: Vec::new(),
            is_static: false,
            is_public: false,
        }
    }

    /// Append a parameter
    pub fn with_parameter(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.parameters.push(Symbol::new(name, ty));
        self
    }

    /// Append a local variable
    pub fn with_local(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.locals.push(Symbol::new(name, ty));
        self
    }

    /// Mark the method `public`
    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    /// Mark the method `static`
    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Whether this is the static entry point
    pub fn is_entry_point(&self) -> bool {
        self.name == ENTRY_POINT && self.is_static
    }

    /// The trailing varargs parameter, if any
    pub fn varargs_parameter(&self) -> Option<&Symbol> {
        self.parameters.last().filter(|p| p.ty.is_varargs())
    }

    /// Look up a local variable by name
    pub fn local(&self, name: &str) -> Option<&Symbol> {
        self.locals.iter().find(|s| s.name == name)
    }

    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&Symbol> {
        self.parameters.iter().find(|s| s.name == name)
    }
}

/// Symbol table of one class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    /// Name of the declared class
    pub class_name: String,
    /// Declared superclass, if any
    #[serde(default)]
    pub super_class: Option<String>,
    /// Dotted import names in source order
    #[serde(default)]
    pub imports: Vec<String>,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<Symbol>,
    /// Methods in declaration order
    #[serde(default)]
    pub methods: Vec<MethodSignature>,
}

impl SymbolTable {
    /// Create an empty table for `class_name`
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    /// Set the superclass
    pub fn with_super(mut self, super_class: impl Into<String>) -> Self {
        self.super_class = Some(super_class.into());
        self
    }

    /// Append a dotted import
    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }

    /// Append a field
    pub fn with_field(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.fields.push(Symbol::new(name, ty));
        self
    }

    /// Append a method
    pub fn with_method(mut self, method: MethodSignature) -> Self {
        self.methods.push(method);
        self
    }

    /// The declared class as a type
    pub fn class_type(&self) -> Type {
        Type::new(self.class_name.clone())
    }

    /// Method names in declaration order
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|m| m.name.as_str())
    }

    /// First method declared with `name`
    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Signature of the method declared at `index` in source order, falling
    /// back to lookup by name when the table is not index-aligned
    pub fn method_at(&self, index: usize, name: &str) -> Option<&MethodSignature> {
        self.methods
            .get(index)
            .filter(|m| m.name == name)
            .or_else(|| self.method(name))
    }

    /// Declared return type of `name`
    pub fn return_type(&self, name: &str) -> Option<&Type> {
        self.method(name).map(|m| &m.return_type)
    }

    /// Parameters of `name`
    pub fn parameters(&self, name: &str) -> Option<&[Symbol]> {
        self.method(name).map(|m| m.parameters.as_slice())
    }

    /// Locals of `name`
    pub fn local_variables(&self, name: &str) -> Option<&[Symbol]> {
        self.method(name).map(|m| m.locals.as_slice())
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Symbol> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` is the declared superclass
    pub fn is_super(&self, name: &str) -> bool {
        self.super_class.as_deref() == Some(name)
    }

    /// Whether `name` is imported, compared against the last dotted segment
    /// of each import
    pub fn is_imported(&self, name: &str) -> bool {
        self.imports.iter().any(|i| simple_name(i) == name)
    }
}

/// Last dotted segment of an import (`java.util.List` -> `List`)
pub fn simple_name(import: &str) -> &str {
    import.rsplit('.').next().unwrap_or(import)
}
