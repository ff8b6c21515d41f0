//! Java-- compiler CLI
//!
//! Reads a serialized AST (JSON), runs the semantic checker and, for
//! accepted programs, emits Jasmin assembly.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jmmc")]
#[command(about = "Java-- to Jasmin compiler", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Color output: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check and compile an AST to Jasmin assembly
    Compile {
        /// AST file (JSON)
        input: PathBuf,
        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Source text the AST was parsed from, for rich diagnostics
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Print the IR listing to stderr
        #[arg(long)]
        emit_ir: bool,
        /// Disable the checker's import and superclass leniency
        #[arg(long)]
        strict: bool,
        /// Print diagnostics as JSON instead of the text blob
        #[arg(long)]
        json_diagnostics: bool,
        /// Output file for the Jasmin text
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the semantic checker only
    Check {
        /// AST file (JSON)
        input: PathBuf,
        /// Source text the AST was parsed from, for rich diagnostics
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Disable the checker's import and superclass leniency
        #[arg(long)]
        strict: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("JMM_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();
    let color = output::resolve_color_choice(cli.color.as_deref());

    let ok = match cli.command {
        Commands::Compile {
            input,
            config,
            source,
            emit_ir,
            strict,
            json_diagnostics,
            output,
        } => commands::compile::execute(commands::compile::CompileArgs {
            input,
            config,
            source,
            emit_ir,
            strict,
            json_diagnostics,
            output,
            color,
        })?,

        Commands::Check {
            input,
            source,
            strict,
        } => commands::check::execute(&input, source.as_deref(), strict, color)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compile_flags() {
        let cli = Cli::parse_from(["jmmc", "compile", "ast.json", "--emit-ir", "-o", "Main.j"]);
        match cli.command {
            Commands::Compile {
                input,
                emit_ir,
                output,
                strict,
                ..
            } => {
                assert_eq!(input, PathBuf::from("ast.json"));
                assert!(emit_ir);
                assert!(!strict);
                assert_eq!(output, Some(PathBuf::from("Main.j")));
            }
            Commands::Check { .. } => panic!("expected compile"),
        }
    }
}
