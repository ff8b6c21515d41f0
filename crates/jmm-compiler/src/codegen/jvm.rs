//! Jasmin instruction set
//!
//! The subset of JVM instructions the emitter selects, with their textual
//! form and net operand-stack effect.

use std::fmt;

/// Computational category of a single-slot value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// int or boolean
    Int,
    /// Object or array reference
    Ref,
}

impl ValueKind {
    fn prefix(self) -> char {
        match self {
            ValueKind::Int => 'i',
            ValueKind::Ref => 'a',
        }
    }
}

/// Element category of an array access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    Int,
    Bool,
    Ref,
}

impl ArrayKind {
    fn prefix(self) -> char {
        match self {
            ArrayKind::Int => 'i',
            ArrayKind::Bool => 'b',
            ArrayKind::Ref => 'a',
        }
    }
}

/// Comparison selected by a conditional branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Ge,
    Gt,
    Le,
}

impl CmpOp {
    fn suffix(self) -> &'static str {
        match self {
            CmpOp::Eq => "eq",
            CmpOp::Ne => "ne",
            CmpOp::Lt => "lt",
            CmpOp::Ge => "ge",
            CmpOp::Gt => "gt",
            CmpOp::Le => "le",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeKind {
    Static,
    Virtual,
    Special,
}

/// One Jasmin instruction or label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JvmInstr {
    Load(ValueKind, u16),
    Store(ValueKind, u16),
    /// Integer constant, printed in its shortest form
    IConst(i32),
    GetField {
        owner: String,
        name: String,
        descriptor: String,
    },
    PutField {
        owner: String,
        name: String,
        descriptor: String,
    },
    Invoke {
        kind: InvokeKind,
        owner: String,
        name: String,
        descriptor: String,
        /// Number of argument slots, excluding the receiver
        arg_count: u16,
        returns_value: bool,
    },
    New(String),
    Dup,
    Pop,
    /// Primitive array allocation: `newarray int`
    NewArray(&'static str),
    /// Reference array allocation
    ANewArray(String),
    ArrayLength,
    ArrayLoad(ArrayKind),
    ArrayStore(ArrayKind),
    IAdd,
    ISub,
    IMul,
    IDiv,
    IAnd,
    IOr,
    IXor,
    /// Compare two ints and branch
    IfICmp(CmpOp, String),
    /// Compare two references and branch
    IfACmp(CmpOp, String),
    /// Branch when the int on top is non-zero
    IfNe(String),
    Goto(String),
    Label(String),
    Return(Option<ValueKind>),
}

impl JvmInstr {
    /// Net change of the operand stack depth
    pub fn stack_effect(&self) -> i32 {
        match self {
            JvmInstr::Load(..) | JvmInstr::IConst(_) | JvmInstr::New(_) | JvmInstr::Dup => 1,
            JvmInstr::Store(..) | JvmInstr::Pop => -1,
            JvmInstr::GetField { .. } => 0,
            JvmInstr::PutField { .. } => -2,
            JvmInstr::Invoke {
                kind,
                arg_count,
                returns_value,
                ..
            } => {
                let receiver = if *kind == InvokeKind::Static { 0 } else { 1 };
                i32::from(*returns_value) - i32::from(*arg_count) - receiver
            }
            JvmInstr::NewArray(_) | JvmInstr::ANewArray(_) | JvmInstr::ArrayLength => 0,
            JvmInstr::ArrayLoad(_) => -1,
            JvmInstr::ArrayStore(_) => -3,
            JvmInstr::IAdd
            | JvmInstr::ISub
            | JvmInstr::IMul
            | JvmInstr::IDiv
            | JvmInstr::IAnd
            | JvmInstr::IOr
            | JvmInstr::IXor => -1,
            JvmInstr::IfICmp(..) | JvmInstr::IfACmp(..) => -2,
            JvmInstr::IfNe(_) => -1,
            JvmInstr::Goto(_) | JvmInstr::Label(_) => 0,
            JvmInstr::Return(Some(_)) => -1,
            JvmInstr::Return(None) => 0,
        }
    }

    /// Label this instruction may jump to
    pub fn branch_target(&self) -> Option<&str> {
        match self {
            JvmInstr::IfICmp(_, target)
            | JvmInstr::IfACmp(_, target)
            | JvmInstr::IfNe(target)
            | JvmInstr::Goto(target) => Some(target),
            _ => None,
        }
    }

    /// Whether execution never falls through to the next instruction
    pub fn is_terminator(&self) -> bool {
        matches!(self, JvmInstr::Goto(_) | JvmInstr::Return(_))
    }
}

impl fmt::Display for JvmInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JvmInstr::Load(kind, slot) => write_slot(f, kind.prefix(), "load", *slot),
            JvmInstr::Store(kind, slot) => write_slot(f, kind.prefix(), "store", *slot),
            JvmInstr::IConst(value) => match *value {
                -1 => write!(f, "iconst_m1"),
                0..=5 => write!(f, "iconst_{}", value),
                -128..=127 => write!(f, "bipush {}", value),
                -32768..=32767 => write!(f, "sipush {}", value),
                _ => write!(f, "ldc {}", value),
            },
            JvmInstr::GetField {
                owner,
                name,
                descriptor,
            } => write!(f, "getfield {}/{} {}", owner, name, descriptor),
            JvmInstr::PutField {
                owner,
                name,
                descriptor,
            } => write!(f, "putfield {}/{} {}", owner, name, descriptor),
            JvmInstr::Invoke {
                kind,
                owner,
                name,
                descriptor,
                ..
            } => {
                let mnemonic = match kind {
                    InvokeKind::Static => "invokestatic",
                    InvokeKind::Virtual => "invokevirtual",
                    InvokeKind::Special => "invokespecial",
                };
                write!(f, "{} {}/{}{}", mnemonic, owner, name, descriptor)
            }
            JvmInstr::New(class) => write!(f, "new {}", class),
            JvmInstr::Dup => write!(f, "dup"),
            JvmInstr::Pop => write!(f, "pop"),
            JvmInstr::NewArray(element) => write!(f, "newarray {}", element),
            JvmInstr::ANewArray(class) => write!(f, "anewarray {}", class),
            JvmInstr::ArrayLength => write!(f, "arraylength"),
            JvmInstr::ArrayLoad(kind) => write!(f, "{}aload", kind.prefix()),
            JvmInstr::ArrayStore(kind) => write!(f, "{}astore", kind.prefix()),
            JvmInstr::IAdd => write!(f, "iadd"),
            JvmInstr::ISub => write!(f, "isub"),
            JvmInstr::IMul => write!(f, "imul"),
            JvmInstr::IDiv => write!(f, "idiv"),
            JvmInstr::IAnd => write!(f, "iand"),
            JvmInstr::IOr => write!(f, "ior"),
            JvmInstr::IXor => write!(f, "ixor"),
            JvmInstr::IfICmp(op, target) => write!(f, "if_icmp{} {}", op.suffix(), target),
            JvmInstr::IfACmp(op, target) => write!(f, "if_acmp{} {}", op.suffix(), target),
            JvmInstr::IfNe(target) => write!(f, "ifne {}", target),
            JvmInstr::Goto(target) => write!(f, "goto {}", target),
            JvmInstr::Label(name) => write!(f, "{}:", name),
            JvmInstr::Return(None) => write!(f, "return"),
            JvmInstr::Return(Some(kind)) => write!(f, "{}return", kind.prefix()),
        }
    }
}

fn write_slot(f: &mut fmt::Formatter<'_>, prefix: char, op: &str, slot: u16) -> fmt::Result {
    if slot <= 3 {
        write!(f, "{}{}_{}", prefix, op, slot)
    } else {
        write!(f, "{}{} {}", prefix, op, slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_forms() {
        let text = |v| JvmInstr::IConst(v).to_string();
        assert_eq!(text(-1), "iconst_m1");
        assert_eq!(text(5), "iconst_5");
        assert_eq!(text(6), "bipush 6");
        assert_eq!(text(-128), "bipush -128");
        assert_eq!(text(1000), "sipush 1000");
        assert_eq!(text(40000), "ldc 40000");
    }

    #[test]
    fn test_slot_forms() {
        assert_eq!(JvmInstr::Load(ValueKind::Ref, 0).to_string(), "aload_0");
        assert_eq!(JvmInstr::Store(ValueKind::Int, 3).to_string(), "istore_3");
        assert_eq!(JvmInstr::Load(ValueKind::Int, 4).to_string(), "iload 4");
        assert_eq!(JvmInstr::Return(Some(ValueKind::Int)).to_string(), "ireturn");
        assert_eq!(JvmInstr::ArrayLoad(ArrayKind::Bool).to_string(), "baload");
    }

    #[test]
    fn test_invoke_effect() {
        let invoke = JvmInstr::Invoke {
            kind: InvokeKind::Virtual,
            owner: "Main".into(),
            name: "f".into(),
            descriptor: "(II)I".into(),
            arg_count: 2,
            returns_value: true,
        };
        assert_eq!(invoke.stack_effect(), -2);
        assert_eq!(invoke.to_string(), "invokevirtual Main/f(II)I");
    }
}
