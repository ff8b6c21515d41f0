//! Statement nodes

use crate::expr::Expression;
use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Statement {
    /// Block: { stmts }
    Block(BlockStatement),

    /// Conditional: if (cond) stmt else stmt
    If(IfStatement),

    /// Loop: while (cond) stmt
    While(WhileStatement),

    /// Expression used as a statement: foo();
    Expression(ExpressionStatement),

    /// Variable assignment: x = expr;
    Assign(AssignStatement),

    /// Array element assignment: a[i] = expr;
    ArrayAssign(ArrayAssignStatement),

    /// Return: return expr;
    Return(ReturnStatement),
}

impl Statement {
    /// Get the span of this statement
    pub fn span(&self) -> &Span {
        match self {
            Statement::Block(s) => &s.span,
            Statement::If(s) => &s.span,
            Statement::While(s) => &s.span,
            Statement::Expression(s) => &s.span,
            Statement::Assign(s) => &s.span,
            Statement::ArrayAssign(s) => &s.span,
            Statement::Return(s) => &s.span,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Statement::Return(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    #[serde(default)]
    pub else_branch: Option<Box<Statement>>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Box<Statement>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignStatement {
    pub target: String,
    pub value: Expression,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayAssignStatement {
    pub target: String,
    pub index: Expression,
    pub value: Expression,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    #[serde(default)]
    pub value: Option<Expression>,
    #[serde(default)]
    pub span: Span,
}
