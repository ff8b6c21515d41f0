//! AST visitor pattern for traversing the syntax tree
//!
//! Each visit method has a default implementation that calls the
//! corresponding walk function, so implementors override only the nodes they
//! care about.
//!
//! # Example
//!
//! ```rust
//! use jmm_ast::*;
//!
//! struct CountReturns {
//!     count: usize,
//! }
//!
//! impl Visitor for CountReturns {
//!     fn visit_statement(&mut self, stmt: &Statement) {
//!         if stmt.is_return() {
//!             self.count += 1;
//!         }
//!         walk_statement(self, stmt);
//!     }
//! }
//! ```

use crate::decl::{ClassDecl, MethodDecl, Program};
use crate::expr::*;
use crate::stmt::*;

/// AST visitor trait
pub trait Visitor: Sized {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_class(&mut self, class: &ClassDecl) {
        walk_class(self, class);
    }

    fn visit_method(&mut self, method: &MethodDecl) {
        walk_method(self, method);
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }
}

pub fn walk_program<V: Visitor>(visitor: &mut V, program: &Program) {
    visitor.visit_class(&program.class);
}

pub fn walk_class<V: Visitor>(visitor: &mut V, class: &ClassDecl) {
    for method in &class.methods {
        visitor.visit_method(method);
    }
}

pub fn walk_method<V: Visitor>(visitor: &mut V, method: &MethodDecl) {
    for stmt in &method.body {
        visitor.visit_statement(stmt);
    }
}

pub fn walk_statement<V: Visitor>(visitor: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Block(block) => {
            for stmt in &block.statements {
                visitor.visit_statement(stmt);
            }
        }
        Statement::If(stmt) => {
            visitor.visit_expression(&stmt.condition);
            visitor.visit_statement(&stmt.then_branch);
            if let Some(else_branch) = &stmt.else_branch {
                visitor.visit_statement(else_branch);
            }
        }
        Statement::While(stmt) => {
            visitor.visit_expression(&stmt.condition);
            visitor.visit_statement(&stmt.body);
        }
        Statement::Expression(stmt) => visitor.visit_expression(&stmt.expression),
        Statement::Assign(stmt) => visitor.visit_expression(&stmt.value),
        Statement::ArrayAssign(stmt) => {
            visitor.visit_expression(&stmt.index);
            visitor.visit_expression(&stmt.value);
        }
        Statement::Return(stmt) => {
            if let Some(value) = &stmt.value {
                visitor.visit_expression(value);
            }
        }
    }
}

pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &Expression) {
    match expr {
        Expression::IntLiteral(_)
        | Expression::BoolLiteral(_)
        | Expression::Identifier(_)
        | Expression::This(_)
        | Expression::NewObject(_) => {}
        Expression::Binary(e) => {
            visitor.visit_expression(&e.left);
            visitor.visit_expression(&e.right);
        }
        Expression::Unary(e) => visitor.visit_expression(&e.operand),
        Expression::ArrayLiteral(e) => {
            for element in &e.elements {
                visitor.visit_expression(element);
            }
        }
        Expression::Index(e) => {
            visitor.visit_expression(&e.object);
            visitor.visit_expression(&e.index);
        }
        Expression::NewArray(e) => visitor.visit_expression(&e.length),
        Expression::Member(e) => visitor.visit_expression(&e.object),
        Expression::Call(e) => {
            visitor.visit_expression(&e.receiver);
            for arg in &e.arguments {
                visitor.visit_expression(arg);
            }
        }
        Expression::Parenthesized(e) => visitor.visit_expression(&e.expression),
    }
}
