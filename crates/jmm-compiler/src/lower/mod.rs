//! AST to IR Lowering
//!
//! Converts the type-checked AST into the IR representation. Expressions
//! are lowered children-first into the current method body and yield the
//! operand holding their value.

mod context;
mod control_flow;
mod expr;
mod stmt;

pub use context::CompilationContext;
pub use control_flow::{IfLabels, WhileLabels};

use crate::error::{CompileError, CompileResult};
use crate::ir::{ClassUnit, IrField, IrInstr, IrMethod, Operand};
use jmm_ast::{MethodDecl, Program};
use jmm_checker::{CheckerPolicy, MethodScope};
use jmm_types::{MethodSignature, SymbolTable};
use tracing::{debug, trace};

/// AST to IR lowerer
pub struct Lowerer<'a> {
    table: &'a SymbolTable,
    policy: CheckerPolicy,
    /// Temporary and label counters for the unit
    ctx: CompilationContext,
    /// Instructions of the method being lowered
    body: Vec<IrInstr>,
}

impl<'a> Lowerer<'a> {
    /// Create a new lowerer
    pub fn new(table: &'a SymbolTable, policy: CheckerPolicy) -> Self {
        Self {
            table,
            policy,
            ctx: CompilationContext::new(),
            body: Vec::new(),
        }
    }

    /// Lower an accepted program to one class unit
    pub fn lower_program(&mut self, program: &Program) -> CompileResult<ClassUnit> {
        self.ctx.reset();

        let class = &program.class;
        let mut unit = ClassUnit::new(class.name.clone());
        unit.super_class = self.table.super_class.clone();
        unit.imports = self.table.imports.clone();
        unit.fields = self
            .table
            .fields
            .iter()
            .map(|f| IrField {
                name: f.name.clone(),
                ty: f.ty.without_attributes(),
            })
            .collect();

        for (index, method) in class.methods.iter().enumerate() {
            let table = self.table;
            let sig = table.method_at(index, &method.name).ok_or_else(|| {
                CompileError::lowering(format!("method '{}' is missing from the symbol table", method.name))
            })?;
            let lowered = self.lower_method(method, sig)?;
            unit.add_method(lowered);
        }

        debug!(
            class = %unit.name,
            methods = unit.methods.len(),
            temps = self.ctx.temp_count(),
            "lowered class"
        );
        Ok(unit)
    }

    /// Counters after the last lowering
    pub fn context(&self) -> &CompilationContext {
        &self.ctx
    }

    fn lower_method(&mut self, method: &MethodDecl, sig: &'a MethodSignature) -> CompileResult<IrMethod> {
        trace!(method = %sig.name, "lowering method");
        let scope = MethodScope::new(self.table, sig, self.policy);

        let params = sig
            .parameters
            .iter()
            .map(|p| Operand::variable(p.name.clone(), p.ty.without_attributes()))
            .collect();
        let mut lowered = IrMethod::new(sig.name.clone(), params, sig.return_type.without_attributes());
        lowered.is_public = sig.is_public;
        lowered.is_static = sig.is_static;

        self.body.clear();
        for stmt in &method.body {
            self.lower_stmt(stmt, &scope)?;
        }
        lowered.extend(std::mem::take(&mut self.body));

        if !lowered.ends_with_return() {
            if !lowered.return_ty.is_void() {
                return Err(CompileError::lowering(format!(
                    "method '{}' does not end with a return",
                    sig.name
                )));
            }
            lowered.push(IrInstr::Return { value: None });
        }
        Ok(lowered)
    }

    fn emit(&mut self, instr: IrInstr) {
        self.body.push(instr);
    }

    /// `this` inside the current class
    fn this(&self) -> Operand {
        Operand::this(self.table.class_type())
    }
}

/// Lower `program` against `table` in one call
pub fn lower_program(program: &Program, table: &SymbolTable, policy: CheckerPolicy) -> CompileResult<ClassUnit> {
    Lowerer::new(table, policy).lower_program(program)
}
