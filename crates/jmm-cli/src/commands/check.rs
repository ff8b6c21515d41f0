//! `jmmc check`: run the semantic checker without generating code.

use crate::output;
use jmm_checker::{bind_program, check, CheckerPolicy, Report};
use std::path::Path;
use termcolor::ColorChoice;
use tracing::debug;

/// Returns whether the program was accepted
pub fn execute(input: &Path, source: Option<&Path>, strict: bool, color: ColorChoice) -> anyhow::Result<bool> {
    let program = output::load_program(input)?;
    let policy = if strict {
        CheckerPolicy::strict()
    } else {
        CheckerPolicy::default()
    };

    let table = bind_program(&program);
    let errors = check(&program, &table, policy);
    debug!(class = %table.class_name, errors = errors.len(), "checked");

    if source.is_some() {
        let files = output::load_files(input, source)?;
        output::emit_rich(&errors, &files, color)?;
    }
    for error in &errors {
        println!("{}", Report::from_check_error(error));
    }
    Ok(errors.is_empty())
}
