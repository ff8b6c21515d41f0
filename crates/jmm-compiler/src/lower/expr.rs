//! Expression lowering

use super::Lowerer;
use crate::error::{CompileError, CompileResult};
use crate::ir::{BinaryOp, CallKind, Condition, IrInstr, Label, Operand, UnaryOp};
use crate::ir::method::CONSTRUCTOR;
use jmm_ast::{BinaryOperator, CallExpression, Expression, UnaryOperator};
use jmm_checker::typing::{parameter_type, passes_varargs_array, trusts_superclass};
use jmm_checker::{expr_type, resolve_call, CallSite, CallTarget, MethodScope};
use jmm_types::{MethodSignature, Type};

impl<'a> Lowerer<'a> {
    /// Lower an expression whose value is used at `site`
    pub(super) fn lower_expr(
        &mut self,
        expr: &Expression,
        scope: &MethodScope<'a>,
        site: &CallSite,
    ) -> CompileResult<Operand> {
        match expr {
            Expression::IntLiteral(lit) => Ok(Operand::int(lit.value)),
            Expression::BoolLiteral(lit) => Ok(Operand::boolean(lit.value)),

            Expression::Identifier(id) => {
                let resolved = scope
                    .resolve(&id.name)
                    .ok_or_else(|| CompileError::lowering(format!("unresolved variable '{}'", id.name)))?;
                let ty = resolved.symbol.ty.without_attributes();
                if !resolved.is_field() {
                    return Ok(Operand::variable(id.name.clone(), ty));
                }
                let dest = self.ctx.fresh_temp(ty.clone());
                self.emit(IrInstr::FieldRead {
                    dest: dest.clone(),
                    object: self.this(),
                    field: id.name.clone(),
                    ty,
                });
                Ok(dest)
            }

            Expression::This(_) => Ok(self.this()),

            Expression::Binary(bin) => {
                let (left_site, right_site) = operand_sites(bin.operator, &bin.left, &bin.right, scope)?;
                let left = self.lower_expr(&bin.left, scope, &left_site)?;
                let left = self.settle_before(left, &bin.right);
                let right = self.lower_expr(&bin.right, scope, &right_site)?;
                let op = BinaryOp::from(bin.operator);
                let dest = self.ctx.fresh_temp(op.result_type());
                self.emit(IrInstr::BinaryOp {
                    dest: dest.clone(),
                    op,
                    left,
                    right,
                });
                Ok(dest)
            }

            Expression::Unary(unary) => match unary.operator {
                UnaryOperator::Not => {
                    let operand = self.lower_expr(&unary.operand, scope, &CallSite::expecting(Type::boolean()))?;
                    let dest = self.ctx.fresh_temp(Type::boolean());
                    self.emit(IrInstr::UnaryOp {
                        dest: dest.clone(),
                        op: UnaryOp::Not,
                        operand,
                    });
                    Ok(dest)
                }
            },

            Expression::ArrayLiteral(lit) => {
                let ty = expr_type(expr, scope, site)?;
                let element = element_type(&ty)?;
                let mut values = Vec::with_capacity(lit.elements.len());
                for item in &lit.elements {
                    values.push(self.lower_expr(item, scope, &CallSite::expecting(element.clone()))?);
                }
                self.pack_array(element, values)
            }

            Expression::Index(idx) => {
                let array = self.lower_expr(&idx.object, scope, &CallSite::unknown())?;
                let index = self.lower_expr(&idx.index, scope, &CallSite::expecting(Type::int()))?;
                let ty = element_type(&array.ty)?;
                let element = Operand::element(array, index, ty.clone());
                if !matches!(site, CallSite::Argument(_)) {
                    return Ok(element);
                }
                let dest = self.ctx.fresh_temp(ty);
                self.emit(IrInstr::Assign {
                    dest: dest.clone(),
                    value: element,
                });
                Ok(dest)
            }

            Expression::NewArray(new) => {
                let length = self.lower_expr(&new.length, scope, &CallSite::expecting(Type::int()))?;
                let element = new.element.to_type().without_attributes();
                let dest = self.ctx.fresh_temp(Type::array(element.name.clone()));
                self.emit(IrInstr::NewArray {
                    dest: dest.clone(),
                    length,
                    element,
                });
                Ok(dest)
            }

            Expression::NewObject(new) => {
                let dest = self.ctx.fresh_temp(Type::new(new.class_name.clone()));
                self.emit(IrInstr::NewObject {
                    dest: dest.clone(),
                    class: new.class_name.clone(),
                });
                self.emit(IrInstr::Call {
                    dest: None,
                    kind: CallKind::Constructor,
                    receiver: dest.clone(),
                    method: CONSTRUCTOR.to_string(),
                    args: Vec::new(),
                    return_ty: Type::void(),
                });
                Ok(dest)
            }

            Expression::Member(member) => {
                if member.property != "length" {
                    return Err(CompileError::lowering(format!(
                        "unknown property '{}'",
                        member.property
                    )));
                }
                let array = self.lower_expr(&member.object, scope, &CallSite::expecting(Type::int_array()))?;
                let dest = self.ctx.fresh_temp(Type::int());
                self.emit(IrInstr::ArrayLength {
                    dest: dest.clone(),
                    array,
                });
                Ok(dest)
            }

            Expression::Call(call) => self.lower_call(call, scope, site)?.ok_or_else(|| {
                CompileError::lowering(format!("call to '{}' has no value", call.method))
            }),

            Expression::Parenthesized(p) => self.lower_expr(&p.expression, scope, site),
        }
    }

    /// Lower a call. Returns the result temporary, present only when the
    /// site consumes a non-void value.
    pub(super) fn lower_call(
        &mut self,
        call: &CallExpression,
        scope: &MethodScope<'a>,
        site: &CallSite,
    ) -> CompileResult<Option<Operand>> {
        let target = resolve_call(call, scope)?;
        let return_ty = target.result_type(site);

        let (kind, receiver) = match &target {
            CallTarget::ImportedStatic(name) => (CallKind::StaticInvoke, Operand::class_ref(name.clone())),
            CallTarget::Local(sig) if sig.is_static => (
                CallKind::StaticInvoke,
                Operand::class_ref(self.table.class_name.clone()),
            ),
            _ => (
                CallKind::VirtualInvoke,
                self.lower_expr(&call.receiver, scope, &CallSite::unknown())?,
            ),
        };

        let args = match &target {
            CallTarget::Local(sig) => self.lower_local_args(call, sig, scope)?,
            _ => {
                let mut args = Vec::with_capacity(call.arguments.len());
                for arg in &call.arguments {
                    args.push(self.lower_expr(arg, scope, &CallSite::Argument(None))?);
                }
                args
            }
        };

        let dest = if site.consumes_value() && !return_ty.is_void() {
            Some(self.ctx.fresh_temp(return_ty.clone()))
        } else {
            None
        };
        self.emit(IrInstr::Call {
            dest: dest.clone(),
            kind,
            receiver,
            method: call.method.clone(),
            args,
            return_ty,
        });
        Ok(dest)
    }

    /// Arguments of a call to a declared method. Trailing varargs arguments
    /// are packed into a fresh array unless an array is passed directly.
    fn lower_local_args(
        &mut self,
        call: &CallExpression,
        sig: &MethodSignature,
        scope: &MethodScope<'a>,
    ) -> CompileResult<Vec<Operand>> {
        let mut args = Vec::with_capacity(call.arguments.len());
        for (i, arg) in call.arguments.iter().enumerate() {
            args.push(self.lower_expr(arg, scope, &CallSite::Argument(parameter_type(sig, i)))?);
        }

        let Some(varargs) = sig.varargs_parameter() else {
            return Ok(args);
        };
        let types: Vec<Type> = args.iter().map(|a| a.ty.clone()).collect();
        if passes_varargs_array(sig, &types) {
            return Ok(args);
        }

        let fixed = sig.parameters.len() - 1;
        if args.len() < fixed {
            // Only accepted when trusted to target a superclass overload
            if trusts_superclass(scope) {
                return Ok(args);
            }
            return Err(CompileError::lowering(format!(
                "call to '{}' has too few arguments",
                call.method
            )));
        }
        let element = element_type(&varargs.ty)?;
        let trailing = args.split_off(fixed);
        let packed = self.pack_array(element, trailing)?;
        args.push(packed);
        Ok(args)
    }

    /// Copy an array element into a temporary when `next` is evaluated
    /// after it and may call a method that writes the array
    fn settle_before(&mut self, operand: Operand, next: &Expression) -> Operand {
        if !operand.is_element() || !contains_call(next) {
            return operand;
        }
        let dest = self.ctx.fresh_temp(operand.ty.clone());
        self.emit(IrInstr::Assign {
            dest: dest.clone(),
            value: operand,
        });
        dest
    }

    /// Allocate an array of `values.len()` elements and store each value
    fn pack_array(&mut self, element: Type, values: Vec<Operand>) -> CompileResult<Operand> {
        let length = i32::try_from(values.len())
            .map_err(|_| CompileError::lowering("array literal is too large"))?;
        let dest = self.ctx.fresh_temp(Type::array(element.name.clone()));
        self.emit(IrInstr::NewArray {
            dest: dest.clone(),
            length: Operand::int(length),
            element,
        });
        for (i, value) in (0..length).zip(values) {
            self.emit(IrInstr::ArrayStore {
                array: dest.clone(),
                index: Operand::int(i),
                value,
            });
        }
        Ok(dest)
    }

    /// Lower a branch to `target` taken when `condition` holds.
    ///
    /// Relational conditions compare and branch directly; anything else is
    /// evaluated to a boolean first.
    pub(super) fn lower_condition(
        &mut self,
        condition: &Expression,
        target: Label,
        scope: &MethodScope<'a>,
    ) -> CompileResult<()> {
        let cond = match condition.unparenthesized() {
            Expression::Binary(bin) if bin.operator.is_relational() => {
                let (left_site, right_site) = operand_sites(bin.operator, &bin.left, &bin.right, scope)?;
                let left = self.lower_expr(&bin.left, scope, &left_site)?;
                let left = self.settle_before(left, &bin.right);
                let right = self.lower_expr(&bin.right, scope, &right_site)?;
                Condition::Compare {
                    op: BinaryOp::from(bin.operator),
                    left,
                    right,
                }
            }
            _ => Condition::Truthy(self.lower_expr(condition, scope, &CallSite::expecting(Type::boolean()))?),
        };
        self.emit(IrInstr::CondJump { cond, target });
        Ok(())
    }
}

/// Sites of the two operands of `op`, matching how the checker typed them
fn operand_sites(
    op: BinaryOperator,
    left: &Expression,
    right: &Expression,
    scope: &MethodScope<'_>,
) -> CompileResult<(CallSite, CallSite)> {
    if op.is_equality() {
        return Ok(if left.is_call() {
            let right_ty = expr_type(right, scope, &CallSite::unknown())?;
            (CallSite::expecting(right_ty), CallSite::unknown())
        } else {
            let left_ty = expr_type(left, scope, &CallSite::unknown())?;
            (CallSite::unknown(), CallSite::expecting(left_ty))
        });
    }

    let operand = if op.is_logical() {
        Type::boolean()
    } else {
        Type::int()
    };
    Ok((CallSite::expecting(operand.clone()), CallSite::expecting(operand)))
}

fn contains_call(expr: &Expression) -> bool {
    match expr {
        Expression::Call(_) => true,
        Expression::Binary(bin) => contains_call(&bin.left) || contains_call(&bin.right),
        Expression::Unary(unary) => contains_call(&unary.operand),
        Expression::ArrayLiteral(lit) => lit.elements.iter().any(contains_call),
        Expression::Index(idx) => contains_call(&idx.object) || contains_call(&idx.index),
        Expression::NewArray(new) => contains_call(&new.length),
        Expression::Member(member) => contains_call(&member.object),
        Expression::Parenthesized(p) => contains_call(&p.expression),
        Expression::IntLiteral(_)
        | Expression::BoolLiteral(_)
        | Expression::Identifier(_)
        | Expression::This(_)
        | Expression::NewObject(_) => false,
    }
}

fn element_type(array: &Type) -> CompileResult<Type> {
    array
        .element()
        .ok_or_else(|| CompileError::lowering(format!("expected an array, found {}", array)))
}
