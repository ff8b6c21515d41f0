//! Intermediate Representation (IR)
//!
//! Typed three-address code between the AST and Jasmin. Every value is an
//! [`Operand`] carrying its [`Type`](jmm_types::Type); methods are flat
//! instruction lists with explicit labels and jumps.

pub mod instr;
pub mod method;
pub mod operand;
pub mod pretty;
pub mod unit;

pub use instr::{BinaryOp, CallKind, Condition, IrInstr, Label, UnaryOp};
pub use method::IrMethod;
pub use operand::{Operand, OperandKind, TempId};
pub use pretty::PrettyPrint;
pub use unit::{ClassUnit, IrField};
