//! Expression nodes

use crate::span::Span;
use crate::decl::TypeAnnotation;
use serde::{Deserialize, Serialize};

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Expression {
    /// Integer literal: 42
    IntLiteral(IntLiteral),

    /// Boolean literal: true, false
    BoolLiteral(BoolLiteral),

    /// Variable reference: x
    Identifier(Identifier),

    /// The receiver: this
    This(Span),

    /// Binary operation: a + b, a < b, a && b
    Binary(BinaryExpression),

    /// Unary operation: !a
    Unary(UnaryExpression),

    /// Array literal: [1, 2, 3]
    ArrayLiteral(ArrayLiteral),

    /// Array access: a[i]
    Index(IndexExpression),

    /// Array allocation: new int[n]
    NewArray(NewArrayExpression),

    /// Object allocation: new Foo()
    NewObject(NewObjectExpression),

    /// Property access: a.length
    Member(MemberExpression),

    /// Method call: obj.method(args)
    Call(CallExpression),

    /// Parenthesized: (expr)
    Parenthesized(ParenthesizedExpression),
}

impl Expression {
    /// Get the span of this expression
    pub fn span(&self) -> &Span {
        match self {
            Expression::IntLiteral(e) => &e.span,
            Expression::BoolLiteral(e) => &e.span,
            Expression::Identifier(e) => &e.span,
            Expression::This(span) => span,
            Expression::Binary(e) => &e.span,
            Expression::Unary(e) => &e.span,
            Expression::ArrayLiteral(e) => &e.span,
            Expression::Index(e) => &e.span,
            Expression::NewArray(e) => &e.span,
            Expression::NewObject(e) => &e.span,
            Expression::Member(e) => &e.span,
            Expression::Call(e) => &e.span,
            Expression::Parenthesized(e) => &e.span,
        }
    }

    /// Replace the span of this node
    pub fn with_span(mut self, span: Span) -> Self {
        let slot = match &mut self {
            Expression::IntLiteral(e) => &mut e.span,
            Expression::BoolLiteral(e) => &mut e.span,
            Expression::Identifier(e) => &mut e.span,
            Expression::This(s) => s,
            Expression::Binary(e) => &mut e.span,
            Expression::Unary(e) => &mut e.span,
            Expression::ArrayLiteral(e) => &mut e.span,
            Expression::Index(e) => &mut e.span,
            Expression::NewArray(e) => &mut e.span,
            Expression::NewObject(e) => &mut e.span,
            Expression::Member(e) => &mut e.span,
            Expression::Call(e) => &mut e.span,
            Expression::Parenthesized(e) => &mut e.span,
        };
        *slot = span;
        self
    }

    /// Strip any number of enclosing parentheses
    pub fn unparenthesized(&self) -> &Expression {
        match self {
            Expression::Parenthesized(p) => p.expression.unparenthesized(),
            other => other,
        }
    }

    /// Whether this is a method call (ignoring parentheses)
    pub fn is_call(&self) -> bool {
        matches!(self.unparenthesized(), Expression::Call(_))
    }
}

// ============================================================================
// Literals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntLiteral {
    pub value: i32,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolLiteral {
    pub value: bool,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    #[serde(default)]
    pub span: Span,
}

// ============================================================================
// Operators
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,          // +
    Subtract,     // -
    Multiply,     // *
    Divide,       // /
    LessThan,     // <
    GreaterThan,  // >
    LessEqual,    // <=
    GreaterEqual, // >=
    Equal,        // ==
    NotEqual,     // !=
    And,          // &&
    Or,           // ||
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
        )
    }

    /// Ordering comparisons over integers
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            BinaryOperator::LessThan
                | BinaryOperator::GreaterThan
                | BinaryOperator::LessEqual
                | BinaryOperator::GreaterEqual
        )
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOperator::Equal | BinaryOperator::NotEqual)
    }

    /// Ordering or equality comparison
    pub fn is_relational(&self) -> bool {
        self.is_ordering() || self.is_equality()
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not, // !
}

// ============================================================================
// Arrays and objects
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexExpression {
    pub object: Box<Expression>,
    pub index: Box<Expression>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArrayExpression {
    /// Element type (`int` in `new int[n]`)
    pub element: TypeAnnotation,
    pub length: Box<Expression>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewObjectExpression {
    pub class_name: String,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: String,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpression {
    /// `this`, a variable, an imported class name, or any other expression
    pub receiver: Box<Expression>,
    pub method: String,
    pub arguments: Vec<Expression>,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenthesizedExpression {
    pub expression: Box<Expression>,
    #[serde(default)]
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_classes_are_disjoint() {
        use BinaryOperator::*;
        for op in [
            Add, Subtract, Multiply, Divide, LessThan, GreaterThan, LessEqual, GreaterEqual,
            Equal, NotEqual, And, Or,
        ] {
            let classes = [op.is_arithmetic(), op.is_relational(), op.is_logical()];
            assert_eq!(classes.iter().filter(|c| **c).count(), 1, "{}", op.symbol());
        }
    }

    #[test]
    fn test_unparenthesized() {
        let inner = Expression::IntLiteral(IntLiteral {
            value: 1,
            span: Span::at(1, 2),
        });
        let wrapped = Expression::Parenthesized(ParenthesizedExpression {
            expression: Box::new(Expression::Parenthesized(ParenthesizedExpression {
                expression: Box::new(inner.clone()),
                span: Span::at(1, 1),
            })),
            span: Span::at(1, 0),
        });
        assert_eq!(wrapped.unparenthesized(), &inner);
        assert_eq!(wrapped.span(), &Span::at(1, 0));
    }
}
