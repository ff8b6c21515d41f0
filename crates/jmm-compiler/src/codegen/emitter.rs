//! Jasmin emitter
//!
//! Lowers a [`ClassUnit`] to Jasmin assembly text, one method at a time.
//! Emission holds no state across calls, so emitting the same unit twice
//! yields identical text.

use super::descriptor::ClassResolver;
use super::jvm::{ArrayKind, CmpOp, InvokeKind, JvmInstr, ValueKind};
use super::registers::RegisterTable;
use super::stack::max_stack;
use crate::error::{CompileError, CompileResult};
use crate::ir::method::CONSTRUCTOR;
use crate::ir::{BinaryOp, CallKind, ClassUnit, Condition, IrInstr, IrMethod, Operand, OperandKind, UnaryOp};
use jmm_types::Type;
use tracing::trace;

/// Default superclass of every class
pub const ROOT_CLASS: &str = "java/lang/Object";

/// Emits Jasmin text for one class unit
pub struct JasminEmitter<'u> {
    unit: &'u ClassUnit,
    resolver: ClassResolver<'u>,
    root_class: String,
}

impl<'u> JasminEmitter<'u> {
    pub fn new(unit: &'u ClassUnit) -> Self {
        Self::with_root_class(unit, ROOT_CLASS)
    }

    /// Emitter using `root_class` as the superclass of classes that
    /// declare none
    pub fn with_root_class(unit: &'u ClassUnit, root_class: impl Into<String>) -> Self {
        Self {
            unit,
            resolver: ClassResolver::new(&unit.name, &unit.imports),
            root_class: root_class.into(),
        }
    }

    /// Internal name of the superclass
    pub fn super_class(&self) -> String {
        match &self.unit.super_class {
            Some(name) => self.resolver.qualify(name),
            None => self.root_class.clone(),
        }
    }

    /// Emit the whole class
    pub fn emit(&self) -> CompileResult<String> {
        let mut out = String::new();
        out.push_str(&format!(".class public {}\n", self.unit.name));
        out.push_str(&format!(".super {}\n", self.super_class()));

        if !self.unit.fields.is_empty() {
            out.push('\n');
        }
        for field in &self.unit.fields {
            let descriptor = self.resolver.descriptor(&field.ty)?;
            out.push_str(&format!(".field public {} {}\n", field.name, descriptor));
        }

        for method in &self.unit.methods {
            out.push('\n');
            out.push_str(&self.emit_method(method)?);
        }
        Ok(out)
    }

    /// Emit one `.method` block
    pub fn emit_method(&self, method: &IrMethod) -> CompileResult<String> {
        trace!(method = %method.name, "emitting method");
        let registers = RegisterTable::for_method(method)?;
        let code = MethodEmitter::new(self, method, &registers).lower()?;
        let stack = max_stack(&code)?;

        let descriptor = self
            .resolver
            .method_descriptor(method.params.iter().map(|p| &p.ty), &method.return_ty)?;

        let mut out = String::from(".method ");
        if method.is_public {
            out.push_str("public ");
        }
        if method.is_static {
            out.push_str("static ");
        }
        out.push_str(&format!("{}{}\n", method.name, descriptor));
        out.push_str(&format!("\t.limit stack {}\n", stack));
        out.push_str(&format!("\t.limit locals {}\n", registers.locals_limit()));
        for instr in &code {
            match instr {
                JvmInstr::Label(_) => out.push_str(&format!("{}\n", instr)),
                _ => out.push_str(&format!("\t{}\n", instr)),
            }
        }
        out.push_str(".end method\n");
        Ok(out)
    }
}

/// Instruction selection for one method body
struct MethodEmitter<'e, 'u> {
    emitter: &'e JasminEmitter<'u>,
    method: &'e IrMethod,
    registers: &'e RegisterTable,
    code: Vec<JvmInstr>,
    /// Counter for labels of comparisons used as values
    next_cmp: u32,
}

impl<'e, 'u> MethodEmitter<'e, 'u> {
    fn new(emitter: &'e JasminEmitter<'u>, method: &'e IrMethod, registers: &'e RegisterTable) -> Self {
        Self {
            emitter,
            method,
            registers,
            code: Vec::new(),
            next_cmp: 0,
        }
    }

    fn lower(mut self) -> CompileResult<Vec<JvmInstr>> {
        let mut instrs = self.method.instrs.iter();
        while let Some(instr) = instrs.next() {
            match instr {
                IrInstr::NewObject { dest, class } => {
                    // The allocation and its initializer form one unit
                    match instrs.next() {
                        Some(IrInstr::Call {
                            kind: CallKind::Constructor,
                            receiver,
                            ..
                        }) if receiver == dest => self.new_object(dest, class)?,
                        _ => {
                            return Err(CompileError::representation(format!(
                                "allocation of {} is not followed by its constructor call",
                                class
                            )));
                        }
                    }
                }
                other => self.instr(other)?,
            }
        }
        Ok(self.code)
    }

    fn push(&mut self, instr: JvmInstr) {
        self.code.push(instr);
    }

    fn qualify(&self, name: &str) -> String {
        self.emitter.resolver.qualify(name)
    }

    fn instr(&mut self, instr: &IrInstr) -> CompileResult<()> {
        match instr {
            IrInstr::Assign { dest, value } => {
                self.load(value)?;
                self.store(dest)
            }

            IrInstr::BinaryOp {
                dest,
                op,
                left,
                right,
            } => {
                self.load(left)?;
                self.load(right)?;
                if op.is_comparison() {
                    self.comparison_value(*op, left, right)?;
                } else {
                    self.push(arithmetic(*op)?);
                }
                self.store(dest)
            }

            IrInstr::UnaryOp { dest, op, operand } => match op {
                UnaryOp::Not => {
                    self.load(operand)?;
                    self.push(JvmInstr::IConst(1));
                    self.push(JvmInstr::IXor);
                    self.store(dest)
                }
            },

            IrInstr::Call {
                dest,
                kind,
                receiver,
                method,
                args,
                return_ty,
            } => self.call(dest.as_ref(), *kind, receiver, method, args, return_ty),

            IrInstr::NewObject { class, .. } => Err(CompileError::representation(format!(
                "allocation of {} is not followed by its constructor call",
                class
            ))),

            IrInstr::NewArray {
                dest,
                length,
                element,
            } => {
                self.load(length)?;
                let alloc = match element.name.as_str() {
                    jmm_types::ty::INT => JvmInstr::NewArray("int"),
                    jmm_types::ty::BOOLEAN => JvmInstr::NewArray("boolean"),
                    jmm_types::ty::VOID => {
                        return Err(CompileError::representation("array of void"));
                    }
                    name => JvmInstr::ANewArray(self.qualify(name)),
                };
                self.push(alloc);
                self.store(dest)
            }

            IrInstr::ArrayLength { dest, array } => {
                self.load(array)?;
                self.push(JvmInstr::ArrayLength);
                self.store(dest)
            }

            IrInstr::ArrayStore {
                array,
                index,
                value,
            } => {
                let kind = array_kind(&array.ty)?;
                self.load(array)?;
                self.load(index)?;
                self.load(value)?;
                self.push(JvmInstr::ArrayStore(kind));
                Ok(())
            }

            IrInstr::FieldRead {
                dest,
                object,
                field,
                ty,
            } => {
                self.load(object)?;
                let owner = self.qualify(&object.ty.name);
                let descriptor = self.emitter.resolver.descriptor(ty)?;
                self.push(JvmInstr::GetField {
                    owner,
                    name: field.clone(),
                    descriptor,
                });
                self.store(dest)
            }

            IrInstr::FieldWrite {
                object,
                field,
                ty,
                value,
            } => {
                self.load(object)?;
                self.load(value)?;
                let owner = self.qualify(&object.ty.name);
                let descriptor = self.emitter.resolver.descriptor(ty)?;
                self.push(JvmInstr::PutField {
                    owner,
                    name: field.clone(),
                    descriptor,
                });
                Ok(())
            }

            IrInstr::Return { value: None } => {
                self.push(JvmInstr::Return(None));
                Ok(())
            }
            IrInstr::Return { value: Some(value) } => {
                let kind = value_kind(&self.method.return_ty)?;
                self.load(value)?;
                self.push(JvmInstr::Return(Some(kind)));
                Ok(())
            }

            IrInstr::CondJump { cond, target } => {
                match cond {
                    Condition::Compare { op, left, right } => {
                        self.load(left)?;
                        self.load(right)?;
                        let branch = compare_branch(*op, left, right, target.to_string())?;
                        self.push(branch);
                    }
                    Condition::Truthy(value) => {
                        self.load(value)?;
                        self.push(JvmInstr::IfNe(target.to_string()));
                    }
                }
                Ok(())
            }

            IrInstr::Jump { target } => {
                self.push(JvmInstr::Goto(target.to_string()));
                Ok(())
            }

            IrInstr::Label(label) => {
                self.push(JvmInstr::Label(label.to_string()));
                Ok(())
            }
        }
    }

    /// `new C; dup; invokespecial C/<init>()V` then store
    fn new_object(&mut self, dest: &Operand, class: &str) -> CompileResult<()> {
        let owner = self.qualify(class);
        self.push(JvmInstr::New(owner.clone()));
        self.push(JvmInstr::Dup);
        self.push(JvmInstr::Invoke {
            kind: InvokeKind::Special,
            owner,
            name: CONSTRUCTOR.to_string(),
            descriptor: "()V".to_string(),
            arg_count: 0,
            returns_value: false,
        });
        self.store(dest)
    }

    fn call(
        &mut self,
        dest: Option<&Operand>,
        kind: CallKind,
        receiver: &Operand,
        method: &str,
        args: &[Operand],
        return_ty: &Type,
    ) -> CompileResult<()> {
        let (invoke, owner) = match kind {
            CallKind::Constructor => {
                if receiver.kind != OperandKind::This {
                    return Err(CompileError::representation(format!(
                        "constructor call on {} without an allocation",
                        receiver
                    )));
                }
                // Superclass initializer in <init>
                self.load(receiver)?;
                (InvokeKind::Special, self.emitter.super_class())
            }
            CallKind::StaticInvoke => match &receiver.kind {
                OperandKind::ClassRef(name) => (InvokeKind::Static, self.qualify(name)),
                _ => {
                    return Err(CompileError::representation(format!(
                        "static call to {} needs a class receiver, found {}",
                        method, receiver
                    )));
                }
            },
            CallKind::VirtualInvoke => {
                if receiver.ty.is_array || !receiver.ty.is_reference() {
                    return Err(CompileError::representation(format!(
                        "cannot invoke {} on {}",
                        method, receiver
                    )));
                }
                self.load(receiver)?;
                (InvokeKind::Virtual, self.qualify(&receiver.ty.name))
            }
        };

        for arg in args {
            self.load(arg)?;
        }
        let descriptor = self
            .emitter
            .resolver
            .method_descriptor(args.iter().map(|a| &a.ty), return_ty)?;
        let arg_count = u16::try_from(args.len())
            .map_err(|_| CompileError::representation("too many call arguments"))?;
        let returns_value = !return_ty.is_void();
        self.push(JvmInstr::Invoke {
            kind: invoke,
            owner,
            name: method.to_string(),
            descriptor,
            arg_count,
            returns_value,
        });

        match dest {
            Some(dest) if returns_value => self.store(dest),
            Some(dest) => Err(CompileError::representation(format!(
                "void call to {} stored into {}",
                method, dest
            ))),
            None => {
                if returns_value {
                    self.push(JvmInstr::Pop);
                }
                Ok(())
            }
        }
    }

    /// Comparison result as 0/1 through a branch
    fn comparison_value(&mut self, op: BinaryOp, left: &Operand, right: &Operand) -> CompileResult<()> {
        let n = self.next_cmp;
        self.next_cmp += 1;
        let when_true = format!("cmp_true_{}", n);
        let end = format!("cmp_end_{}", n);

        let branch = compare_branch(op, left, right, when_true.clone())?;
        self.push(branch);
        self.push(JvmInstr::IConst(0));
        self.push(JvmInstr::Goto(end.clone()));
        self.push(JvmInstr::Label(when_true));
        self.push(JvmInstr::IConst(1));
        self.push(JvmInstr::Label(end));
        Ok(())
    }

    /// Push the value of `operand`
    fn load(&mut self, operand: &Operand) -> CompileResult<()> {
        match &operand.kind {
            OperandKind::Temp(_) | OperandKind::Variable(_) => {
                let kind = value_kind(&operand.ty)?;
                let slot = self.registers.slot(operand)?;
                self.push(JvmInstr::Load(kind, slot));
            }
            OperandKind::This => {
                if self.method.is_static {
                    return Err(CompileError::representation("'this' in a static method"));
                }
                self.push(JvmInstr::Load(ValueKind::Ref, 0));
            }
            OperandKind::ClassRef(name) => {
                return Err(CompileError::representation(format!(
                    "class {} used as a value",
                    name
                )));
            }
            OperandKind::IntLiteral(value) => self.push(JvmInstr::IConst(*value)),
            OperandKind::BoolLiteral(value) => self.push(JvmInstr::IConst(i32::from(*value))),
            OperandKind::Element { array, index } => {
                let kind = array_kind(&array.ty)?;
                self.load(array)?;
                self.load(index)?;
                self.push(JvmInstr::ArrayLoad(kind));
            }
        }
        Ok(())
    }

    /// Pop the top of the stack into `dest`
    fn store(&mut self, dest: &Operand) -> CompileResult<()> {
        if !dest.is_storage() {
            return Err(CompileError::representation(format!("cannot store into {}", dest)));
        }
        let kind = value_kind(&dest.ty)?;
        let slot = self.registers.slot(dest)?;
        self.push(JvmInstr::Store(kind, slot));
        Ok(())
    }
}

fn value_kind(ty: &Type) -> CompileResult<ValueKind> {
    if ty.is_void() && !ty.is_array {
        return Err(CompileError::representation("void value has no representation"));
    }
    Ok(if ty.is_reference() {
        ValueKind::Ref
    } else {
        ValueKind::Int
    })
}

fn array_kind(array: &Type) -> CompileResult<ArrayKind> {
    let element = array
        .element()
        .ok_or_else(|| CompileError::representation(format!("{} is not an array", array)))?;
    Ok(match element.name.as_str() {
        jmm_types::ty::INT => ArrayKind::Int,
        jmm_types::ty::BOOLEAN => ArrayKind::Bool,
        _ => ArrayKind::Ref,
    })
}

fn arithmetic(op: BinaryOp) -> CompileResult<JvmInstr> {
    Ok(match op {
        BinaryOp::Add => JvmInstr::IAdd,
        BinaryOp::Sub => JvmInstr::ISub,
        BinaryOp::Mul => JvmInstr::IMul,
        BinaryOp::Div => JvmInstr::IDiv,
        // Both operands are always evaluated
        BinaryOp::And => JvmInstr::IAnd,
        BinaryOp::Or => JvmInstr::IOr,
        _ => {
            return Err(CompileError::representation(format!(
                "'{}' is not an arithmetic operator",
                op.symbol()
            )));
        }
    })
}

/// Branch taken when `left op right` holds
fn compare_branch(op: BinaryOp, left: &Operand, right: &Operand, target: String) -> CompileResult<JvmInstr> {
    let cmp = match op {
        BinaryOp::Less => CmpOp::Lt,
        BinaryOp::GreaterEq => CmpOp::Ge,
        BinaryOp::Greater => CmpOp::Gt,
        BinaryOp::LessEq => CmpOp::Le,
        BinaryOp::Eq => CmpOp::Eq,
        BinaryOp::NotEq => CmpOp::Ne,
        _ => {
            return Err(CompileError::representation(format!(
                "'{}' is not a comparison",
                op.symbol()
            )));
        }
    };

    if left.ty.is_reference() || right.ty.is_reference() {
        return match cmp {
            CmpOp::Eq | CmpOp::Ne => Ok(JvmInstr::IfACmp(cmp, target)),
            _ => Err(CompileError::representation(format!(
                "ordering comparison '{}' on references",
                op.symbol()
            ))),
        };
    }
    Ok(JvmInstr::IfICmp(cmp, target))
}
