//! Check, lower and emit in one pass

use crate::codegen::emit_class;
use crate::config::CompilerConfig;
use crate::error::CompileResult;
use crate::ir::{ClassUnit, PrettyPrint};
use crate::lower::lower_program;
use jmm_ast::Program;
use jmm_checker::report::has_errors;
use jmm_checker::{bind_program, check, CheckError, Report};
use jmm_types::SymbolTable;
use tracing::debug;

/// Result of compiling one program
#[derive(Debug, Default)]
pub struct CompileOutput {
    /// One report per diagnostic
    pub reports: Vec<Report>,
    /// The semantic errors behind the reports
    pub errors: Vec<CheckError>,
    /// Lowered class, absent when checking failed
    pub ir: Option<ClassUnit>,
    /// IR listing, when `emit_ir` is set
    pub ir_listing: Option<String>,
    /// Jasmin text, absent when checking failed
    pub assembly: Option<String>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        has_errors(&self.reports)
    }

    /// The output blob: report lines, then the assembly if any
    pub fn render(&self) -> String {
        let mut out = String::new();
        for report in &self.reports {
            out.push_str(&report.to_string());
            out.push('\n');
        }
        if let Some(assembly) = &self.assembly {
            if !self.reports.is_empty() {
                out.push('\n');
            }
            out.push_str(assembly);
        }
        out
    }
}

/// Compile `program` against an existing symbol table.
///
/// Semantic errors are returned as reports and stop the pipeline before
/// lowering; lowering and emission failures are returned as `Err`.
pub fn compile(program: &Program, table: &SymbolTable, config: &CompilerConfig) -> CompileResult<CompileOutput> {
    let errors = check(program, table, config.checker);
    let reports: Vec<Report> = errors.iter().map(Report::from_check_error).collect();
    if has_errors(&reports) {
        debug!(class = %table.class_name, errors = reports.len(), "semantic errors, skipping code generation");
        return Ok(CompileOutput {
            reports,
            errors,
            ..CompileOutput::default()
        });
    }

    let unit = lower_program(program, table, config.checker)?;
    let ir_listing = config.compiler.emit_ir.then(|| unit.pretty_print());
    let assembly = emit_class(&unit, &config.compiler.root_class)?;
    debug!(
        class = %unit.name,
        instructions = unit.instruction_count(),
        bytes = assembly.len(),
        "emitted class"
    );

    Ok(CompileOutput {
        reports,
        errors,
        ir: Some(unit),
        ir_listing,
        assembly: Some(assembly),
    })
}

/// Bind the symbol table from the program itself, then [`compile`]
pub fn compile_program(program: &Program, config: &CompilerConfig) -> CompileResult<CompileOutput> {
    let table = bind_program(program);
    compile(program, &table, config)
}
