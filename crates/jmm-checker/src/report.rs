//! One-line diagnostic reports
//!
//! The plain rendering used in the compiler's text output:
//!
//! ```text
//! ERROR@SEMANTIC, line 4, col 9: condition must be boolean, found int
//! ```

use crate::error::CheckError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Report severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Blocks code generation
    Error,
    /// Informational only. The checker itself never produces one; the
    /// variant is kept for reports added by tools that wrap it.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// Compiler stage that produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Semantic analysis
    Semantic,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Semantic => write!(f, "SEMANTIC"),
        }
    }
}

/// A positioned diagnostic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Severity
    pub severity: Severity,
    /// Producing stage
    pub stage: Stage,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
    /// Human-readable message
    pub message: String,
}

impl Report {
    /// Create an error report
    pub fn error(stage: Stage, line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            stage,
            line,
            column,
            message: message.into(),
        }
    }

    /// Report for a semantic error
    pub fn from_check_error(error: &CheckError) -> Self {
        let span = error.span();
        Self::error(Stage::Semantic, span.line, span.column, error.to_string())
    }

    /// Whether this report blocks code generation
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}, line {}, col {}: {}",
            self.severity, self.stage, self.line, self.column, self.message
        )
    }
}

/// Whether any report is an error
pub fn has_errors(reports: &[Report]) -> bool {
    reports.iter().any(Report::is_error)
}
