//! Diagnostic infrastructure for error reporting
//!
//! Renders [`CheckError`]s with source context through codespan-reporting, or
//! as JSON for tooling. Only available when the source text is at hand; the
//! one-line [`Report`](crate::report::Report) form works without it.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use jmm_ast::Span;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use termcolor::WriteColor;

use crate::error::{CheckError, TypeError};

/// Error code for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    /// The code text, e.g. "E2001"
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// A diagnostic message with source code context
pub struct Diagnostic {
    /// The underlying codespan diagnostic
    inner: CsDiagnostic<usize>,
    /// Error code (e.g., "E2001")
    code: Option<ErrorCode>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.inner = self.inner.with_code(code.0);
        self.code = Some(code);
        self
    }

    /// Add a primary label (main error location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::primary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        self
    }

    /// Add a help suggestion
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Create diagnostic from a CheckError
    pub fn from_check_error(error: &CheckError, file_id: usize) -> Self {
        let diag = Diagnostic::error(error.to_string())
            .with_code(error_code(error))
            .with_primary_label(file_id, error.span(), label_text(error));

        match error {
            CheckError::Type(TypeError::NonLiteralArrayLength { .. }) => {
                diag.with_help("array sizes are fixed at compile time, e.g. new int[10]")
            }
            CheckError::Type(TypeError::FieldInStatic { .. }) => {
                diag.with_help("declare a local variable with the same name in main")
            }
            CheckError::ReturnNotLast { .. } => {
                diag.with_help("move the return statement to the end of the method")
            }
            _ => diag,
        }
    }

    /// Emit the diagnostic to `writer`
    pub fn emit(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// Get the underlying codespan diagnostic (for testing/custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Convert to JSON representation for IDE integration
    pub fn to_json(&self, files: &SimpleFiles<String, String>) -> Result<String, serde_json::Error> {
        let json_diag = JsonDiagnostic::from_diagnostic(self, files);
        serde_json::to_string_pretty(&json_diag)
    }
}

fn label_text(error: &CheckError) -> &'static str {
    use CheckError::*;

    match error {
        Type(TypeError::UndefinedVariable { .. }) => "not found in this scope",
        Type(TypeError::UndefinedMethod { .. }) => "no such method",
        Type(TypeError::ArgumentCountMismatch { .. }) => "incorrect number of arguments",
        Type(_) => "invalid expression",
        DuplicateImport { .. }
        | DuplicateField { .. }
        | DuplicateMethod { .. }
        | DuplicateVariable { .. } => "duplicate declaration",
        VarargsNotLast { .. } | VarargsVariable { .. } | VarargsReturn { .. } => "invalid varargs",
        ReservedParameterName { .. } => "reserved name",
        ReturnCount { .. } | ReturnNotLast { .. } | ReturnMismatch { .. } => "invalid return",
        InvalidCondition { .. } => "expected boolean",
        AssignMismatch { .. } => "incompatible value",
    }
}

/// JSON representation of a diagnostic for IDE integration
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Error code (e.g., "E2001")
    pub code: Option<String>,
    /// Severity level
    pub severity: String,
    /// Main error message
    pub message: String,
    /// Source locations with labels
    pub labels: Vec<JsonLabel>,
    /// Additional notes and help
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    /// File path
    pub file: String,
    /// Start line (1-indexed)
    pub start_line: usize,
    /// Start column (1-indexed)
    pub start_column: usize,
    /// End line (1-indexed)
    pub end_line: usize,
    /// End column (1-indexed)
    pub end_column: usize,
    /// Label message
    pub message: Option<String>,
    /// Label style (primary or secondary)
    pub style: String,
}

impl JsonDiagnostic {
    /// Convert a Diagnostic to JSON representation
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;

                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: Some(label.message.clone()),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.as_ref().map(|c| c.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

/// Get error code for a CheckError
pub fn error_code(error: &CheckError) -> ErrorCode {
    use CheckError::*;

    match error {
        Type(err) => match err {
            TypeError::UndefinedVariable { .. } => ErrorCode("E2001"),
            TypeError::UndefinedClass { .. } => ErrorCode("E2002"),
            TypeError::InvalidOperand { .. } => ErrorCode("E2003"),
            TypeError::ArrayInArithmetic { .. } => ErrorCode("E2004"),
            TypeError::IncompatibleOperands { .. } => ErrorCode("E2005"),
            TypeError::UnknownProperty { .. } => ErrorCode("E2006"),
            TypeError::LengthOnNonArray { .. } => ErrorCode("E2007"),
            TypeError::MixedArrayLiteral { .. } => ErrorCode("E2008"),
            TypeError::NestedArray { .. } => ErrorCode("E2009"),
            TypeError::NonLiteralArrayLength { .. } => ErrorCode("E2010"),
            TypeError::IndexNotInt { .. } => ErrorCode("E2011"),
            TypeError::IndexOnNonArray { .. } => ErrorCode("E2012"),
            TypeError::IndexOnCallResult { .. } => ErrorCode("E2013"),
            TypeError::UndefinedMethod { .. } => ErrorCode("E2014"),
            TypeError::ArgumentCountMismatch { .. } => ErrorCode("E2015"),
            TypeError::ArgumentTypeMismatch { .. } => ErrorCode("E2016"),
            TypeError::InvalidReceiver { .. } => ErrorCode("E2017"),
            TypeError::UnresolvedCallType { .. } => ErrorCode("E2018"),
            TypeError::VoidValue { .. } => ErrorCode("E2019"),
            TypeError::ThisInStatic { .. } => ErrorCode("E2020"),
            TypeError::FieldInStatic { .. } => ErrorCode("E2021"),
        },
        DuplicateImport { .. } => ErrorCode("E3001"),
        DuplicateField { .. } => ErrorCode("E3002"),
        DuplicateMethod { .. } => ErrorCode("E3003"),
        DuplicateVariable { .. } => ErrorCode("E3004"),
        VarargsNotLast { .. } => ErrorCode("E3005"),
        VarargsVariable { .. } => ErrorCode("E3006"),
        VarargsReturn { .. } => ErrorCode("E3007"),
        ReservedParameterName { .. } => ErrorCode("E3008"),
        ReturnCount { .. } => ErrorCode("E3009"),
        ReturnNotLast { .. } => ErrorCode("E3010"),
        InvalidCondition { .. } => ErrorCode("E3011"),
        AssignMismatch { .. } => ErrorCode("E3012"),
        ReturnMismatch { .. } => ErrorCode("E3013"),
    }
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(path.into().display().to_string(), source.into());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use jmm_types::Type;

    fn condition_error() -> CheckError {
        CheckError::InvalidCondition {
            actual: Type::int(),
            span: Span::new(4, 9, 1, 5),
        }
    }

    #[test]
    fn test_from_check_error() {
        let diag = Diagnostic::from_check_error(&condition_error(), 0);
        assert_eq!(diag.inner().severity, Severity::Error);
        assert_eq!(diag.code, Some(ErrorCode("E3011")));
        assert_eq!(diag.inner().labels.len(), 1);
    }

    #[test]
    fn test_help_for_field_in_static() {
        let error: CheckError = TypeError::FieldInStatic {
            name: "x".into(),
            span: Span::new(0, 1, 1, 1),
        }
        .into();
        let diag = Diagnostic::from_check_error(&error, 0);
        assert!(diag.inner().notes[0].starts_with("help:"));
    }

    #[test]
    fn test_json_output() {
        let diag = Diagnostic::from_check_error(&condition_error(), 0);
        let files = create_files("Main.jmm", "if (1 + 2) { } else { }");

        let json = diag.to_json(&files).unwrap();
        let parsed: JsonDiagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.code.as_deref(), Some("E3011"));
        assert_eq!(parsed.severity, "error");
        assert_eq!(parsed.labels[0].file, "Main.jmm");
        assert_eq!(parsed.labels[0].start_column, 5);
    }

    #[test]
    fn test_emit_to_buffer() {
        let diag = Diagnostic::from_check_error(&condition_error(), 0);
        let files = create_files("Main.jmm", "if (1 + 2) { } else { }");
        let mut buffer = termcolor::Buffer::no_color();
        diag.emit(&mut buffer, &files).unwrap();
        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(text.contains("condition must be boolean"));
        assert!(text.contains("E3011"));
    }
}
