//! Shared input and diagnostic output for CLI commands.
//!
//! Uses `termcolor` for colored terminal output.
//! Respects the `NO_COLOR` environment variable and the `--color` flag.

use anyhow::Context;
use codespan_reporting::files::SimpleFiles;
use jmm_ast::Program;
use jmm_checker::diagnostic::{create_files, Diagnostic, JsonDiagnostic};
use jmm_checker::CheckError;
use std::path::Path;
use termcolor::{ColorChoice, StandardStream};

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// Read a JSON-serialized AST
pub fn load_program(path: &Path) -> anyhow::Result<Program> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let program = serde_json::from_str(&text).with_context(|| format!("Invalid AST in {}", path.display()))?;
    Ok(program)
}

/// Source files for diagnostic rendering; empty text when no source is given
pub fn load_files(input: &Path, source: Option<&Path>) -> anyhow::Result<SimpleFiles<String, String>> {
    Ok(match source {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            create_files(path, text)
        }
        None => create_files(input, String::new()),
    })
}

/// Render diagnostics with source context to stderr
pub fn emit_rich(errors: &[CheckError], files: &SimpleFiles<String, String>, color: ColorChoice) -> anyhow::Result<()> {
    let mut stderr = StandardStream::stderr(color);
    for error in errors {
        Diagnostic::from_check_error(error, 0)
            .emit(&mut stderr, files)
            .context("Failed to render diagnostic")?;
    }
    Ok(())
}

/// All diagnostics as one JSON array
pub fn to_json(errors: &[CheckError], files: &SimpleFiles<String, String>) -> anyhow::Result<String> {
    let diagnostics: Vec<JsonDiagnostic> = errors
        .iter()
        .map(|error| JsonDiagnostic::from_diagnostic(&Diagnostic::from_check_error(error, 0), files))
        .collect();
    Ok(serde_json::to_string_pretty(&diagnostics)?)
}
