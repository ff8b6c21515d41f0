//! Declarations: imports, the class, fields, methods and type annotations

use crate::span::Span;
use crate::stmt::Statement;
use jmm_types::table::ENTRY_POINT;
use jmm_types::Type;
use serde::{Deserialize, Serialize};

/// Root of a compilation unit: imports followed by exactly one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub imports: Vec<ImportDecl>,
    pub class: ClassDecl,
}

/// Import declaration: import a.b.C;
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub path: Vec<String>,
    #[serde(default)]
    pub span: Span,
}

impl ImportDecl {
    /// Dotted name (`java.util.List`)
    pub fn qualified_name(&self) -> String {
        self.path.join(".")
    }

    /// Last segment (`List`)
    pub fn simple_name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub fields: Vec<VarDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub span: Span,
}

/// Field, parameter or local variable declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeAnnotation,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_static: bool,
    pub return_type: TypeAnnotation,
    #[serde(default)]
    pub params: Vec<VarDecl>,
    #[serde(default)]
    pub locals: Vec<VarDecl>,
    #[serde(default)]
    pub body: Vec<Statement>,
    #[serde(default)]
    pub span: Span,
}

impl MethodDecl {
    /// The static entry point `main`
    pub fn is_entry_point(&self) -> bool {
        self.name == ENTRY_POINT && self.is_static
    }
}

// ============================================================================
// Type annotations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Int,
    Boolean,
    Void,
    String,
    Class(String),
}

/// A written type: `int`, `int[]`, `int...`, `Foo`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAnnotation {
    pub kind: TypeKind,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub is_varargs: bool,
    #[serde(default)]
    pub span: Span,
}

impl TypeAnnotation {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            is_array: false,
            is_varargs: false,
            span: Span::default(),
        }
    }

    pub fn array(kind: TypeKind) -> Self {
        Self {
            is_array: true,
            ..Self::new(kind)
        }
    }

    pub fn varargs(kind: TypeKind) -> Self {
        Self {
            is_array: true,
            is_varargs: true,
            ..Self::new(kind)
        }
    }

    /// Convert to the checker's type representation
    pub fn to_type(&self) -> Type {
        let name = match &self.kind {
            TypeKind::Int => jmm_types::ty::INT,
            TypeKind::Boolean => jmm_types::ty::BOOLEAN,
            TypeKind::Void => jmm_types::ty::VOID,
            TypeKind::String => jmm_types::ty::STRING,
            TypeKind::Class(name) => name.as_str(),
        };
        let ty = if self.is_array {
            Type::array(name)
        } else {
            Type::new(name)
        };
        if self.is_varargs {
            ty.with_varargs()
        } else {
            ty
        }
    }
}
