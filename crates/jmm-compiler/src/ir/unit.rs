//! IR compilation unit

use super::method::IrMethod;
use jmm_types::Type;

/// Field declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrField {
    pub name: String,
    pub ty: Type,
}

/// One lowered class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassUnit {
    pub name: String,
    /// Declared superclass; the configured root class when absent
    pub super_class: Option<String>,
    /// Dotted import names
    pub imports: Vec<String>,
    pub fields: Vec<IrField>,
    /// Methods, the implicit constructor first
    pub methods: Vec<IrMethod>,
}

impl ClassUnit {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            methods: vec![IrMethod::constructor(Type::new(name.clone()))],
            name,
            super_class: None,
            imports: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn add_method(&mut self, method: IrMethod) {
        self.methods.push(method);
    }

    pub fn method(&self, name: &str) -> Option<&IrMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Total number of instructions across all methods
    pub fn instruction_count(&self) -> usize {
        self.methods.iter().map(|m| m.instrs.len()).sum()
    }
}
