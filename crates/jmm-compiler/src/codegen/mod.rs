//! IR to Jasmin code generation
//!
//! Each method gets a fresh local-slot table, instruction selection by
//! operand type, and a stack limit computed from the selected code.

pub mod descriptor;
pub mod emitter;
pub mod jvm;
pub mod registers;
pub mod stack;

pub use descriptor::ClassResolver;
pub use emitter::{JasminEmitter, ROOT_CLASS};
pub use jvm::JvmInstr;
pub use registers::RegisterTable;
pub use stack::max_stack;

use crate::error::CompileResult;
use crate::ir::ClassUnit;

/// Emit `unit` as Jasmin text
pub fn emit_class(unit: &ClassUnit, root_class: &str) -> CompileResult<String> {
    JasminEmitter::with_root_class(unit, root_class).emit()
}
