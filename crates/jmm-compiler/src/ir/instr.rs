//! IR Instructions
//!
//! Three-address code instructions for the IR.

use super::operand::Operand;
use jmm_ast::BinaryOperator;
use jmm_types::Type;
use std::fmt;

/// Jump target name, unique within a method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(pub String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// IR instruction (Three-Address Code)
#[derive(Debug, Clone, PartialEq)]
pub enum IrInstr {
    /// Copy: dest = value
    Assign { dest: Operand, value: Operand },

    /// Binary operation: dest = left op right
    BinaryOp {
        dest: Operand,
        op: BinaryOp,
        left: Operand,
        right: Operand,
    },

    /// Unary operation: dest = op operand
    UnaryOp {
        dest: Operand,
        op: UnaryOp,
        operand: Operand,
    },

    /// Method call: dest = receiver.method(args)
    ///
    /// `Constructor` calls never produce a value; the receiver is the
    /// object being initialized.
    Call {
        dest: Option<Operand>,
        kind: CallKind,
        receiver: Operand,
        method: String,
        args: Vec<Operand>,
        return_ty: Type,
    },

    /// Object allocation, always followed by its `Constructor` call
    NewObject { dest: Operand, class: String },

    /// Array allocation: dest = new element[length]
    NewArray {
        dest: Operand,
        length: Operand,
        element: Type,
    },

    /// Array length: dest = array.length
    ArrayLength { dest: Operand, array: Operand },

    /// Store array element: array[index] = value
    ArrayStore {
        array: Operand,
        index: Operand,
        value: Operand,
    },

    /// Load field: dest = object.field
    FieldRead {
        dest: Operand,
        object: Operand,
        field: String,
        ty: Type,
    },

    /// Store field: object.field = value
    FieldWrite {
        object: Operand,
        field: String,
        ty: Type,
        value: Operand,
    },

    /// Return from the method
    Return { value: Option<Operand> },

    /// Jump to `target` when `cond` holds
    CondJump { cond: Condition, target: Label },

    /// Unconditional jump
    Jump { target: Label },

    /// Jump target
    Label(Label),
}

impl IrInstr {
    /// The operand written by this instruction, if any
    pub fn dest(&self) -> Option<&Operand> {
        match self {
            IrInstr::Assign { dest, .. }
            | IrInstr::BinaryOp { dest, .. }
            | IrInstr::UnaryOp { dest, .. }
            | IrInstr::NewObject { dest, .. }
            | IrInstr::NewArray { dest, .. }
            | IrInstr::ArrayLength { dest, .. }
            | IrInstr::FieldRead { dest, .. } => Some(dest),
            IrInstr::Call { dest, .. } => dest.as_ref(),
            _ => None,
        }
    }

    /// Every operand mentioned, destination first, then sources in
    /// evaluation order
    pub fn operands(&self) -> Vec<&Operand> {
        let mut out: Vec<&Operand> = self.dest().into_iter().collect();
        match self {
            IrInstr::Assign { value, .. } => out.push(value),
            IrInstr::BinaryOp { left, right, .. } => out.extend([left, right]),
            IrInstr::UnaryOp { operand, .. } => out.push(operand),
            IrInstr::Call { receiver, args, .. } => {
                out.push(receiver);
                out.extend(args);
            }
            IrInstr::NewObject { .. } => {}
            IrInstr::NewArray { length, .. } => out.push(length),
            IrInstr::ArrayLength { array, .. } => out.push(array),
            IrInstr::ArrayStore {
                array,
                index,
                value,
            } => out.extend([array, index, value]),
            IrInstr::FieldRead { object, .. } => out.push(object),
            IrInstr::FieldWrite { object, value, .. } => out.extend([object, value]),
            IrInstr::Return { value } => out.extend(value),
            IrInstr::CondJump { cond, .. } => match cond {
                Condition::Compare { left, right, .. } => out.extend([left, right]),
                Condition::Truthy(value) => out.push(value),
            },
            IrInstr::Jump { .. } | IrInstr::Label(_) => {}
        }
        out
    }

    /// Label this instruction jumps to, if any
    pub fn jump_target(&self) -> Option<&Label> {
        match self {
            IrInstr::CondJump { target, .. } | IrInstr::Jump { target } => Some(target),
            _ => None,
        }
    }
}

/// Branch condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Relational comparison of two operands
    Compare {
        op: BinaryOp,
        left: Operand,
        right: Operand,
    },
    /// A boolean operand that must be true
    Truthy(Operand),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Logical, evaluated eagerly
    And,
    Or,

    // Comparison
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Eq,
    NotEq,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEq => "<=",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Less
                | BinaryOp::Greater
                | BinaryOp::LessEq
                | BinaryOp::GreaterEq
                | BinaryOp::Eq
                | BinaryOp::NotEq
        )
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }

    /// Type of the result
    pub fn result_type(&self) -> Type {
        if self.is_arithmetic() {
            Type::int()
        } else {
            Type::boolean()
        }
    }
}

impl From<BinaryOperator> for BinaryOp {
    fn from(op: BinaryOperator) -> Self {
        match op {
            BinaryOperator::Add => BinaryOp::Add,
            BinaryOperator::Subtract => BinaryOp::Sub,
            BinaryOperator::Multiply => BinaryOp::Mul,
            BinaryOperator::Divide => BinaryOp::Div,
            BinaryOperator::LessThan => BinaryOp::Less,
            BinaryOperator::GreaterThan => BinaryOp::Greater,
            BinaryOperator::LessEqual => BinaryOp::LessEq,
            BinaryOperator::GreaterEqual => BinaryOp::GreaterEq,
            BinaryOperator::Equal => BinaryOp::Eq,
            BinaryOperator::NotEqual => BinaryOp::NotEq,
            BinaryOperator::And => BinaryOp::And,
            BinaryOperator::Or => BinaryOp::Or,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
}

/// How a call is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// Initialization half of `new C()`, or the superclass call in `<init>`
    Constructor,
    StaticInvoke,
    VirtualInvoke,
}

impl fmt::Display for IrInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrInstr::Assign { dest, value } => write!(f, "{} = {}", dest, value),
            IrInstr::BinaryOp {
                dest,
                op,
                left,
                right,
            } => write!(f, "{} = {} {} {}", dest, left, op.symbol(), right),
            IrInstr::UnaryOp { dest, op, operand } => match op {
                UnaryOp::Not => write!(f, "{} = !{}", dest, operand),
            },
            IrInstr::Call {
                dest,
                kind,
                receiver,
                method,
                args,
                return_ty,
            } => {
                if let Some(dest) = dest {
                    write!(f, "{} = ", dest)?;
                }
                let kind = match kind {
                    CallKind::Constructor => "invokespecial",
                    CallKind::StaticInvoke => "invokestatic",
                    CallKind::VirtualInvoke => "invokevirtual",
                };
                write!(f, "{}({}, \"{}\"", kind, receiver, method)?;
                for arg in args {
                    write!(f, ", {}", arg)?;
                }
                write!(f, "):{}", return_ty)
            }
            IrInstr::NewObject { dest, class } => write!(f, "{} = new {}", dest, class),
            IrInstr::NewArray {
                dest,
                length,
                element,
            } => write!(f, "{} = new {}[{}]", dest, element, length),
            IrInstr::ArrayLength { dest, array } => write!(f, "{} = arraylength({})", dest, array),
            IrInstr::ArrayStore {
                array,
                index,
                value,
            } => write!(f, "{}[{}] = {}", array, index, value),
            IrInstr::FieldRead {
                dest,
                object,
                field,
                ty,
            } => write!(f, "{} = getfield({}, {}:{})", dest, object, field, ty),
            IrInstr::FieldWrite {
                object,
                field,
                ty,
                value,
            } => write!(f, "putfield({}, {}:{}, {})", object, field, ty, value),
            IrInstr::Return { value: Some(value) } => write!(f, "ret {}", value),
            IrInstr::Return { value: None } => write!(f, "ret"),
            IrInstr::CondJump { cond, target } => match cond {
                Condition::Compare { op, left, right } => {
                    write!(f, "if ({} {} {}) goto {}", left, op.symbol(), right, target)
                }
                Condition::Truthy(value) => write!(f, "if ({}) goto {}", value, target),
            },
            IrInstr::Jump { target } => write!(f, "goto {}", target),
            IrInstr::Label(label) => write!(f, "{}:", label),
        }
    }
}
