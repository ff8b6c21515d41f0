//! Statement lowering

use super::Lowerer;
use crate::error::{CompileError, CompileResult};
use crate::ir::{IrInstr, Operand};
use jmm_ast::{
    ArrayAssignStatement, AssignStatement, Expression, IfStatement, ReturnStatement, Statement,
    WhileStatement,
};
use jmm_checker::{CallSite, MethodScope, Resolved};
use jmm_types::Type;

impl<'a> Lowerer<'a> {
    pub(super) fn lower_stmt(&mut self, stmt: &Statement, scope: &MethodScope<'a>) -> CompileResult<()> {
        match stmt {
            Statement::Block(block) => {
                for stmt in &block.statements {
                    self.lower_stmt(stmt, scope)?;
                }
                Ok(())
            }
            Statement::If(if_stmt) => self.lower_if(if_stmt, scope),
            Statement::While(while_stmt) => self.lower_while(while_stmt, scope),
            Statement::Expression(expr_stmt) => self.lower_discarded(&expr_stmt.expression, scope),
            Statement::Assign(assign) => self.lower_assign(assign, scope),
            Statement::ArrayAssign(assign) => self.lower_array_assign(assign, scope),
            Statement::Return(ret) => self.lower_return(ret, scope),
        }
    }

    /// Condition, else-branch inline, then-branch after its label
    fn lower_if(&mut self, if_stmt: &IfStatement, scope: &MethodScope<'a>) -> CompileResult<()> {
        let labels = self.ctx.if_labels();

        self.lower_condition(&if_stmt.condition, labels.then.clone(), scope)?;
        if let Some(else_branch) = &if_stmt.else_branch {
            self.lower_stmt(else_branch, scope)?;
        }
        self.emit(IrInstr::Jump {
            target: labels.end.clone(),
        });

        self.emit(IrInstr::Label(labels.then));
        self.lower_stmt(&if_stmt.then_branch, scope)?;
        self.emit(IrInstr::Label(labels.end));
        Ok(())
    }

    fn lower_while(&mut self, while_stmt: &WhileStatement, scope: &MethodScope<'a>) -> CompileResult<()> {
        let labels = self.ctx.while_labels();

        self.emit(IrInstr::Label(labels.cond.clone()));
        self.lower_condition(&while_stmt.condition, labels.body.clone(), scope)?;
        self.emit(IrInstr::Jump {
            target: labels.end.clone(),
        });

        self.emit(IrInstr::Label(labels.body));
        self.lower_stmt(&while_stmt.body, scope)?;
        self.emit(IrInstr::Jump { target: labels.cond });
        self.emit(IrInstr::Label(labels.end));
        Ok(())
    }

    /// Expression statement: a call gets no result temporary
    fn lower_discarded(&mut self, expr: &Expression, scope: &MethodScope<'a>) -> CompileResult<()> {
        match expr.unparenthesized() {
            Expression::Call(call) => {
                self.lower_call(call, scope, &CallSite::Standalone)?;
            }
            other => {
                self.lower_expr(other, scope, &CallSite::Standalone)?;
            }
        }
        Ok(())
    }

    fn lower_assign(&mut self, assign: &AssignStatement, scope: &MethodScope<'a>) -> CompileResult<()> {
        let target = resolve_target(&assign.target, scope)?;
        let ty = target.symbol.ty.without_attributes();
        let value = self.lower_expr(&assign.value, scope, &CallSite::Assigned(ty.clone()))?;

        let instr = if target.is_field() {
            IrInstr::FieldWrite {
                object: self.this(),
                field: assign.target.clone(),
                ty,
                value,
            }
        } else {
            IrInstr::Assign {
                dest: Operand::variable(assign.target.clone(), ty),
                value,
            }
        };
        self.emit(instr);
        Ok(())
    }

    fn lower_array_assign(&mut self, assign: &ArrayAssignStatement, scope: &MethodScope<'a>) -> CompileResult<()> {
        let target = resolve_target(&assign.target, scope)?;
        let ty = target.symbol.ty.without_attributes();
        let element = ty
            .element()
            .ok_or_else(|| CompileError::lowering(format!("'{}' is not an array", assign.target)))?;

        let array = if target.is_field() {
            let dest = self.ctx.fresh_temp(ty.clone());
            self.emit(IrInstr::FieldRead {
                dest: dest.clone(),
                object: self.this(),
                field: assign.target.clone(),
                ty,
            });
            dest
        } else {
            Operand::variable(assign.target.clone(), ty)
        };
        let index = self.lower_expr(&assign.index, scope, &CallSite::expecting(Type::int()))?;
        let value = self.lower_expr(&assign.value, scope, &CallSite::Assigned(element))?;

        self.emit(IrInstr::ArrayStore { array, index, value });
        Ok(())
    }

    fn lower_return(&mut self, ret: &ReturnStatement, scope: &MethodScope<'a>) -> CompileResult<()> {
        let value = match &ret.value {
            Some(expr) => Some(self.lower_expr(expr, scope, &CallSite::Returned(scope.return_type()))?),
            None => None,
        };
        self.emit(IrInstr::Return { value });
        Ok(())
    }
}

fn resolve_target<'a>(name: &str, scope: &MethodScope<'a>) -> CompileResult<Resolved<'a>> {
    scope
        .resolve(name)
        .ok_or_else(|| CompileError::lowering(format!("unresolved assignment target '{}'", name)))
}
