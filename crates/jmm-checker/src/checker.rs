//! Semantic checker - validates declarations and statements
//!
//! Walks the class in declaration order. Each check records its own error and
//! checking continues, so one run reports every independent problem. The
//! current method travels as an explicit [`MethodScope`] argument.

use crate::error::{CheckError, TypeError};
use crate::policy::CheckerPolicy;
use crate::scope::MethodScope;
use crate::typing::{expr_type, CallSite};
use jmm_ast::*;
use jmm_types::{SymbolTable, Type};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

/// Semantic checker
pub struct TypeChecker<'a> {
    table: &'a SymbolTable,
    policy: CheckerPolicy,

    /// Errors collected so far
    errors: Vec<CheckError>,
}

/// Counts return statements at any depth
#[derive(Default)]
struct ReturnCounter {
    count: usize,
}

impl Visitor for ReturnCounter {
    fn visit_statement(&mut self, stmt: &Statement) {
        if stmt.is_return() {
            self.count += 1;
        }
        walk_statement(self, stmt);
    }
}

impl<'a> TypeChecker<'a> {
    /// Create a checker over `table`
    pub fn new(table: &'a SymbolTable, policy: CheckerPolicy) -> Self {
        TypeChecker {
            table,
            policy,
            errors: Vec::new(),
        }
    }

    /// Check a whole program and return the collected errors
    pub fn check_program(mut self, program: &Program) -> Vec<CheckError> {
        self.check_imports(&program.imports);
        self.check_fields(&program.class.fields);

        let mut seen = FxHashSet::default();
        for (index, method) in program.class.methods.iter().enumerate() {
            if !seen.insert(method.name.as_str()) {
                self.errors.push(CheckError::DuplicateMethod {
                    name: method.name.clone(),
                    span: method.span,
                });
            }
            self.check_method(index, method);
        }

        debug!(class = %program.class.name, errors = self.errors.len(), "semantic check finished");
        self.errors
    }

    /// Get the errors collected during checking
    pub fn errors(&self) -> &[CheckError] {
        &self.errors
    }

    fn check_imports(&mut self, imports: &[ImportDecl]) {
        let mut seen = FxHashSet::default();
        for import in imports {
            if !seen.insert(import.simple_name()) {
                self.errors.push(CheckError::DuplicateImport {
                    name: import.simple_name().to_string(),
                    span: import.span,
                });
            }
        }
    }

    fn check_fields(&mut self, fields: &[VarDecl]) {
        let mut seen = FxHashSet::default();
        for field in fields {
            if !seen.insert(field.name.as_str()) {
                self.errors.push(CheckError::DuplicateField {
                    name: field.name.clone(),
                    span: field.span,
                });
            }
            if field.ty.is_varargs {
                self.errors.push(CheckError::VarargsVariable {
                    name: field.name.clone(),
                    span: field.span,
                });
            }
        }
    }

    fn check_method(&mut self, index: usize, method: &MethodDecl) {
        trace!(method = %method.name, "checking method");
        self.check_signature(method);
        self.check_returns(method);

        let Some(sig) = self.table.method_at(index, &method.name) else {
            self.errors.push(
                TypeError::UndefinedMethod {
                    name: method.name.clone(),
                    span: method.span,
                }
                .into(),
            );
            return;
        };
        let scope = MethodScope::new(self.table, sig, self.policy);
        for stmt in &method.body {
            self.check_stmt(stmt, &scope);
        }
    }

    fn check_signature(&mut self, method: &MethodDecl) {
        if method.return_type.is_varargs {
            self.errors.push(CheckError::VarargsReturn {
                method: method.name.clone(),
                span: method.return_type.span,
            });
        }

        let mut seen = FxHashSet::default();
        let last = method.params.len().saturating_sub(1);
        for (i, param) in method.params.iter().enumerate() {
            if param.ty.is_varargs && i != last {
                self.errors.push(CheckError::VarargsNotLast {
                    method: method.name.clone(),
                    param: param.name.clone(),
                    span: param.span,
                });
            }
            if param.name == "length" {
                self.errors.push(CheckError::ReservedParameterName {
                    method: method.name.clone(),
                    span: param.span,
                });
            }
            self.check_unique(&mut seen, method, param);
        }

        for local in &method.locals {
            if local.ty.is_varargs {
                self.errors.push(CheckError::VarargsVariable {
                    name: local.name.clone(),
                    span: local.span,
                });
            }
            self.check_unique(&mut seen, method, local);
        }
    }

    fn check_unique<'d>(&mut self, seen: &mut FxHashSet<&'d str>, method: &MethodDecl, decl: &'d VarDecl) {
        if !seen.insert(decl.name.as_str()) {
            self.errors.push(CheckError::DuplicateVariable {
                name: decl.name.clone(),
                method: method.name.clone(),
                span: decl.span,
            });
        }
    }

    /// Non-void methods need exactly one return, as the last statement.
    /// The entry point and void methods may have none.
    fn check_returns(&mut self, method: &MethodDecl) {
        let mut counter = ReturnCounter::default();
        counter.visit_method(method);

        let optional = method.is_entry_point() || method.return_type.to_type().is_void();
        let count_ok = if optional {
            counter.count <= 1
        } else {
            counter.count == 1
        };
        if !count_ok {
            self.errors.push(CheckError::ReturnCount {
                method: method.name.clone(),
                expected: if optional { "at most one" } else { "exactly one" },
                actual: counter.count,
                span: method.span,
            });
            return;
        }

        if counter.count == 1 && !method.body.last().is_some_and(Statement::is_return) {
            let span = method
                .body
                .iter()
                .find(|stmt| stmt.is_return())
                .map(|stmt| *stmt.span())
                .unwrap_or(method.span);
            self.errors.push(CheckError::ReturnNotLast {
                method: method.name.clone(),
                span,
            });
        }
    }

    fn check_stmt(&mut self, stmt: &Statement, scope: &MethodScope<'_>) {
        match stmt {
            Statement::Block(block) => {
                for stmt in &block.statements {
                    self.check_stmt(stmt, scope);
                }
            }
            Statement::If(if_stmt) => {
                self.check_condition(&if_stmt.condition, scope);
                self.check_stmt(&if_stmt.then_branch, scope);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.check_stmt(else_branch, scope);
                }
            }
            Statement::While(while_stmt) => {
                self.check_condition(&while_stmt.condition, scope);
                self.check_stmt(&while_stmt.body, scope);
            }
            Statement::Expression(expr_stmt) => {
                self.infer(&expr_stmt.expression, scope, &CallSite::Standalone);
            }
            Statement::Assign(assign) => self.check_assign(assign, scope),
            Statement::ArrayAssign(assign) => self.check_array_assign(assign, scope),
            Statement::Return(ret) => self.check_return(ret, scope),
        }
    }

    /// Infer a type, recording the error on failure
    fn infer(&mut self, expr: &Expression, scope: &MethodScope<'_>, site: &CallSite) -> Option<Type> {
        match expr_type(expr, scope, site) {
            Ok(ty) => Some(ty),
            Err(err) => {
                self.errors.push(err.into());
                None
            }
        }
    }

    fn check_condition(&mut self, condition: &Expression, scope: &MethodScope<'_>) {
        let Some(ty) = self.infer(condition, scope, &CallSite::expecting(Type::boolean())) else {
            return;
        };
        if !ty.is_boolean() {
            self.errors.push(CheckError::InvalidCondition {
                actual: ty,
                span: *condition.span(),
            });
        }
    }

    /// Resolve an assignment target, rejecting fields inside static methods
    fn target_type(&mut self, name: &str, span: Span, scope: &MethodScope<'_>) -> Option<Type> {
        match scope.resolve(name) {
            Some(resolved) if resolved.is_field() && scope.is_static() => {
                self.errors.push(
                    TypeError::FieldInStatic {
                        name: name.to_string(),
                        span,
                    }
                    .into(),
                );
                None
            }
            Some(resolved) => Some(resolved.symbol.ty.without_attributes()),
            None => {
                self.errors.push(
                    TypeError::UndefinedVariable {
                        name: name.to_string(),
                        span,
                    }
                    .into(),
                );
                None
            }
        }
    }

    fn check_assign(&mut self, assign: &AssignStatement, scope: &MethodScope<'_>) {
        let Some(target) = self.target_type(&assign.target, assign.span, scope) else {
            return;
        };
        let Some(value) = self.infer(&assign.value, scope, &CallSite::Assigned(target.clone())) else {
            return;
        };
        if !scope.is_assignable(&target, &value) {
            self.errors.push(CheckError::AssignMismatch {
                target: assign.target.clone(),
                expected: target,
                actual: value,
                span: *assign.value.span(),
            });
        }
    }

    fn check_array_assign(&mut self, assign: &ArrayAssignStatement, scope: &MethodScope<'_>) {
        let Some(target) = self.target_type(&assign.target, assign.span, scope) else {
            return;
        };
        let Some(element) = target.element() else {
            self.errors.push(
                TypeError::IndexOnNonArray {
                    actual: target,
                    span: assign.span,
                }
                .into(),
            );
            return;
        };

        if let Some(index) = self.infer(&assign.index, scope, &CallSite::expecting(Type::int())) {
            if !index.is_int() {
                self.errors.push(
                    TypeError::IndexNotInt {
                        actual: index,
                        span: *assign.index.span(),
                    }
                    .into(),
                );
            }
        }

        let Some(value) = self.infer(&assign.value, scope, &CallSite::Assigned(element.clone())) else {
            return;
        };
        if !scope.is_assignable(&element, &value) {
            self.errors.push(CheckError::AssignMismatch {
                target: format!("{}[]", assign.target),
                expected: element,
                actual: value,
                span: *assign.value.span(),
            });
        }
    }

    fn check_return(&mut self, ret: &ReturnStatement, scope: &MethodScope<'_>) {
        let expected = scope.return_type();
        let actual = match &ret.value {
            Some(value) => match self.infer(value, scope, &CallSite::Returned(expected.clone())) {
                Some(ty) => ty,
                None => return,
            },
            None => Type::void(),
        };

        let compatible = if expected.is_void() {
            actual.is_void()
        } else {
            scope.is_assignable(&expected, &actual)
        };
        if !compatible {
            self.errors.push(CheckError::ReturnMismatch {
                method: scope.method().name.clone(),
                expected,
                actual,
                span: ret.span,
            });
        }
    }
}
