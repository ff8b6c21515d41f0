//! Java-- Type System
//!
//! Type representation, symbols and the symbol table read contract shared by
//! the checker and the compiler.

#![warn(missing_docs)]

pub mod symbol;
pub mod table;
pub mod ty;

pub use symbol::Symbol;
pub use table::{MethodSignature, SymbolTable};
pub use ty::{Type, TypeAttributes};
