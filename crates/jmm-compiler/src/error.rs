//! Compilation errors

use crate::config::ConfigError;
use jmm_checker::TypeError;
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Error)]
pub enum CompileError {
    /// The IR generator met a construct the checker should have rejected
    #[error("Lowering error: {message}")]
    Lowering { message: String },

    /// IR that cannot be represented in JVM assembly
    #[error("Representation error: {message}")]
    Representation { message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CompileError {
    pub fn lowering(message: impl Into<String>) -> Self {
        CompileError::Lowering {
            message: message.into(),
        }
    }

    pub fn representation(message: impl Into<String>) -> Self {
        CompileError::Representation {
            message: message.into(),
        }
    }
}

impl From<TypeError> for CompileError {
    fn from(err: TypeError) -> Self {
        CompileError::lowering(err.to_string())
    }
}
