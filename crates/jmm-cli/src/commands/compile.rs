//! `jmmc compile`: check, lower and emit Jasmin assembly.

use crate::output;
use anyhow::Context;
use jmm_checker::CheckerPolicy;
use jmm_compiler::{compile_program, CompilerConfig};
use std::path::PathBuf;
use termcolor::ColorChoice;
use tracing::info;

pub struct CompileArgs {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub emit_ir: bool,
    pub strict: bool,
    pub json_diagnostics: bool,
    pub output: Option<PathBuf>,
    pub color: ColorChoice,
}

/// Returns whether the program compiled without errors
pub fn execute(args: CompileArgs) -> anyhow::Result<bool> {
    let mut config = match &args.config {
        Some(path) => CompilerConfig::from_file(path)?,
        None => CompilerConfig::default(),
    };
    if args.emit_ir {
        config.compiler.emit_ir = true;
    }
    if args.strict {
        config.checker = CheckerPolicy::strict();
    }

    let program = output::load_program(&args.input)?;
    let result = compile_program(&program, &config)
        .with_context(|| format!("Failed to compile {}", args.input.display()))?;

    if let Some(listing) = &result.ir_listing {
        eprintln!("{}", listing);
    }

    let files = output::load_files(&args.input, args.source.as_deref())?;
    if args.source.is_some() && !args.json_diagnostics {
        output::emit_rich(&result.errors, &files, args.color)?;
    }

    if args.json_diagnostics {
        println!("{}", output::to_json(&result.errors, &files)?);
        if let (Some(path), Some(assembly)) = (&args.output, &result.assembly) {
            write_output(path, assembly)?;
        }
    } else {
        match &args.output {
            Some(path) => {
                for report in &result.reports {
                    println!("{}", report);
                }
                if let Some(assembly) = &result.assembly {
                    write_output(path, assembly)?;
                }
            }
            None => print!("{}", result.render()),
        }
    }

    Ok(!result.has_errors())
}

fn write_output(path: &std::path::Path, assembly: &str) -> anyhow::Result<()> {
    std::fs::write(path, assembly).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = assembly.len(), "wrote assembly");
    Ok(())
}
