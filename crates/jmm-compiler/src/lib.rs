//! Java-- Compiler - IR generation and Jasmin emission
//!
//! This crate turns a semantically accepted program into Jasmin assembly:
//! - [`lower`]: AST to typed three-address IR ([`ir`])
//! - [`codegen`]: IR to Jasmin text, with slot assignment and stack limits
//! - [`pipeline`]: check, lower and emit in one call
//!
//! # Usage
//!
//! ```ignore
//! use jmm_compiler::{compile_program, CompilerConfig};
//!
//! let output = compile_program(&program, &CompilerConfig::default())?;
//! print!("{}", output.render());
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod ir;
pub mod lower;
pub mod pipeline;

pub use codegen::{emit_class, JasminEmitter};
pub use config::{CompilerConfig, ConfigError};
pub use error::{CompileError, CompileResult};
pub use ir::{ClassUnit, PrettyPrint};
pub use lower::{lower_program, Lowerer};
pub use pipeline::{compile, compile_program, CompileOutput};
