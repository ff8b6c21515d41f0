//! Java-- Semantic Checker
//!
//! This crate provides:
//! - Symbol table construction from the AST ([`bind_program`])
//! - Type inference for expressions ([`typing::expr_type`])
//! - Statement-level semantic checks ([`TypeChecker`])
//! - Diagnostics as one-line reports or rich terminal/JSON output
//!
//! # Usage
//!
//! ```ignore
//! use jmm_checker::{bind_program, CheckerPolicy, TypeChecker};
//!
//! let table = bind_program(&program);
//! let errors = TypeChecker::new(&table, CheckerPolicy::default()).check_program(&program);
//! ```

#![warn(missing_docs)]

pub mod binder;
pub mod checker;
pub mod diagnostic;
pub mod error;
pub mod policy;
pub mod report;
pub mod scope;
pub mod typing;

pub use binder::bind_program;
pub use checker::TypeChecker;
pub use error::{CheckError, TypeError};
pub use policy::CheckerPolicy;
pub use report::{Report, Severity, Stage};
pub use scope::{MethodScope, Resolved, VarOrigin};
pub use typing::{expr_type, resolve_call, CallSite, CallTarget};

use jmm_ast::Program;
use jmm_types::SymbolTable;

/// Check `program` against `table` and return every semantic error found
pub fn check(program: &Program, table: &SymbolTable, policy: CheckerPolicy) -> Vec<CheckError> {
    TypeChecker::new(table, policy).check_program(program)
}
