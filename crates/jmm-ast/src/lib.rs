//! Java-- abstract syntax tree
//!
//! The tree is produced by an external parser (or deserialized from JSON) and
//! is never mutated by the checker or the compiler.

pub mod build;
pub mod decl;
pub mod expr;
pub mod span;
pub mod stmt;
pub mod visitor;

pub use decl::*;
pub use expr::*;
pub use span::Span;
pub use stmt::*;
pub use visitor::*;
