//! IR Operands
//!
//! Defines the typed values instructions read and write.

use jmm_types::Type;
use std::fmt;

/// Temporary identifier, unique within one compilation unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TempId(pub u32);

impl TempId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tmp{}", self.0)
    }
}

/// What an operand names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandKind {
    /// Compiler temporary
    Temp(TempId),
    /// Declared local or parameter
    Variable(String),
    /// The receiver of an instance method
    This,
    /// A class used as static call receiver
    ClassRef(String),
    /// Integer constant
    IntLiteral(i32),
    /// Boolean constant
    BoolLiteral(bool),
    /// Indexed array element: array[index]
    Element {
        array: Box<Operand>,
        index: Box<Operand>,
    },
}

/// Operand with type information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub kind: OperandKind,
    pub ty: Type,
}

impl Operand {
    pub fn new(kind: OperandKind, ty: Type) -> Self {
        Self { kind, ty }
    }

    pub fn temp(id: TempId, ty: Type) -> Self {
        Self::new(OperandKind::Temp(id), ty)
    }

    pub fn variable(name: impl Into<String>, ty: Type) -> Self {
        Self::new(OperandKind::Variable(name.into()), ty)
    }

    /// `this`, typed as the class being compiled
    pub fn this(class: Type) -> Self {
        Self::new(OperandKind::This, class)
    }

    pub fn class_ref(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(OperandKind::ClassRef(name.clone()), Type::new(name))
    }

    pub fn int(value: i32) -> Self {
        Self::new(OperandKind::IntLiteral(value), Type::int())
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(OperandKind::BoolLiteral(value), Type::boolean())
    }

    pub fn element(array: Operand, index: Operand, ty: Type) -> Self {
        Self::new(
            OperandKind::Element {
                array: Box::new(array),
                index: Box::new(index),
            },
            ty,
        )
    }

    /// The temporary this operand names, if any
    pub fn as_temp(&self) -> Option<TempId> {
        match self.kind {
            OperandKind::Temp(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, OperandKind::Element { .. })
    }

    /// Whether the operand can be assigned to
    pub fn is_storage(&self) -> bool {
        matches!(self.kind, OperandKind::Temp(_) | OperandKind::Variable(_))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            OperandKind::Temp(id) => write!(f, "{}:{}", id, self.ty),
            OperandKind::Variable(name) => write!(f, "{}:{}", name, self.ty),
            OperandKind::This => write!(f, "this:{}", self.ty),
            OperandKind::ClassRef(name) => write!(f, "class {}", name),
            OperandKind::IntLiteral(v) => write!(f, "{}:{}", v, self.ty),
            OperandKind::BoolLiteral(v) => write!(f, "{}:{}", v, self.ty),
            OperandKind::Element { array, index } => {
                write!(f, "{}[{}]:{}", array, index, self.ty)
            }
        }
    }
}
