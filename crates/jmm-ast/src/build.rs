//! Constructors for building trees by hand
//!
//! Used by tests and by tools that synthesize programs without a parser. All
//! nodes get a default span unless one is set with [`Expression::with_span`]
//! or the `*_at` variants.

use crate::decl::*;
use crate::expr::*;
use crate::span::Span;
use crate::stmt::*;

// ============================================================================
// Types
// ============================================================================

pub fn ty_int() -> TypeAnnotation {
    TypeAnnotation::new(TypeKind::Int)
}

pub fn ty_bool() -> TypeAnnotation {
    TypeAnnotation::new(TypeKind::Boolean)
}

pub fn ty_void() -> TypeAnnotation {
    TypeAnnotation::new(TypeKind::Void)
}

pub fn ty_int_array() -> TypeAnnotation {
    TypeAnnotation::array(TypeKind::Int)
}

pub fn ty_int_varargs() -> TypeAnnotation {
    TypeAnnotation::varargs(TypeKind::Int)
}

pub fn ty_string() -> TypeAnnotation {
    TypeAnnotation::new(TypeKind::String)
}

pub fn ty_class(name: &str) -> TypeAnnotation {
    TypeAnnotation::new(TypeKind::Class(name.to_string()))
}

// ============================================================================
// Expressions
// ============================================================================

pub fn int(value: i32) -> Expression {
    Expression::IntLiteral(IntLiteral {
        value,
        span: Span::default(),
    })
}

pub fn boolean(value: bool) -> Expression {
    Expression::BoolLiteral(BoolLiteral {
        value,
        span: Span::default(),
    })
}

pub fn ident(name: &str) -> Expression {
    Expression::Identifier(Identifier {
        name: name.to_string(),
        span: Span::default(),
    })
}

pub fn this() -> Expression {
    Expression::This(Span::default())
}

pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
    let span = left.span().merge(right.span());
    Expression::Binary(BinaryExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        span,
    })
}

pub fn add(left: Expression, right: Expression) -> Expression {
    binary(BinaryOperator::Add, left, right)
}

pub fn mul(left: Expression, right: Expression) -> Expression {
    binary(BinaryOperator::Multiply, left, right)
}

pub fn lt(left: Expression, right: Expression) -> Expression {
    binary(BinaryOperator::LessThan, left, right)
}

pub fn and(left: Expression, right: Expression) -> Expression {
    binary(BinaryOperator::And, left, right)
}

pub fn not(operand: Expression) -> Expression {
    let span = *operand.span();
    Expression::Unary(UnaryExpression {
        operator: UnaryOperator::Not,
        operand: Box::new(operand),
        span,
    })
}

pub fn paren(expression: Expression) -> Expression {
    let span = *expression.span();
    Expression::Parenthesized(ParenthesizedExpression {
        expression: Box::new(expression),
        span,
    })
}

pub fn array_literal(elements: Vec<Expression>) -> Expression {
    Expression::ArrayLiteral(ArrayLiteral {
        elements,
        span: Span::default(),
    })
}

pub fn index(object: Expression, index: Expression) -> Expression {
    let span = *object.span();
    Expression::Index(IndexExpression {
        object: Box::new(object),
        index: Box::new(index),
        span,
    })
}

pub fn new_int_array(length: Expression) -> Expression {
    Expression::NewArray(NewArrayExpression {
        element: ty_int(),
        length: Box::new(length),
        span: Span::default(),
    })
}

pub fn new_object(class_name: &str) -> Expression {
    Expression::NewObject(NewObjectExpression {
        class_name: class_name.to_string(),
        span: Span::default(),
    })
}

pub fn length(object: Expression) -> Expression {
    member(object, "length")
}

pub fn member(object: Expression, property: &str) -> Expression {
    let span = *object.span();
    Expression::Member(MemberExpression {
        object: Box::new(object),
        property: property.to_string(),
        span,
    })
}

pub fn call(receiver: Expression, method: &str, arguments: Vec<Expression>) -> Expression {
    let span = *receiver.span();
    Expression::Call(CallExpression {
        receiver: Box::new(receiver),
        method: method.to_string(),
        arguments,
        span,
    })
}

/// `this.method(args)`
pub fn this_call(method: &str, arguments: Vec<Expression>) -> Expression {
    call(this(), method, arguments)
}

// ============================================================================
// Statements
// ============================================================================

pub fn assign(target: &str, value: Expression) -> Statement {
    let span = *value.span();
    Statement::Assign(AssignStatement {
        target: target.to_string(),
        value,
        span,
    })
}

pub fn array_assign(target: &str, index: Expression, value: Expression) -> Statement {
    let span = *index.span();
    Statement::ArrayAssign(ArrayAssignStatement {
        target: target.to_string(),
        index,
        value,
        span,
    })
}

pub fn ret(value: Expression) -> Statement {
    let span = *value.span();
    Statement::Return(ReturnStatement {
        value: Some(value),
        span,
    })
}

pub fn ret_void() -> Statement {
    Statement::Return(ReturnStatement {
        value: None,
        span: Span::default(),
    })
}

pub fn expr_stmt(expression: Expression) -> Statement {
    let span = *expression.span();
    Statement::Expression(ExpressionStatement { expression, span })
}

pub fn block(statements: Vec<Statement>) -> Statement {
    Statement::Block(BlockStatement {
        statements,
        span: Span::default(),
    })
}

pub fn if_else(condition: Expression, then_branch: Statement, else_branch: Statement) -> Statement {
    let span = *condition.span();
    Statement::If(IfStatement {
        condition,
        then_branch: Box::new(then_branch),
        else_branch: Some(Box::new(else_branch)),
        span,
    })
}

pub fn while_loop(condition: Expression, body: Statement) -> Statement {
    let span = *condition.span();
    Statement::While(WhileStatement {
        condition,
        body: Box::new(body),
        span,
    })
}

// ============================================================================
// Declarations
// ============================================================================

pub fn var(name: &str, ty: TypeAnnotation) -> VarDecl {
    VarDecl {
        name: name.to_string(),
        ty,
        span: Span::default(),
    }
}

pub fn import(path: &str) -> ImportDecl {
    ImportDecl {
        path: path.split('.').map(str::to_string).collect(),
        span: Span::default(),
    }
}

pub fn program(imports: &[&str], class: ClassDecl) -> Program {
    Program {
        imports: imports.iter().map(|p| import(p)).collect(),
        class,
    }
}

/// Builder for [`MethodDecl`]
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    decl: MethodDecl,
}

impl MethodBuilder {
    pub fn new(name: &str, return_type: TypeAnnotation) -> Self {
        Self {
            decl: MethodDecl {
                name: name.to_string(),
                is_public: false,
                is_static: false,
                return_type,
                params: Vec::new(),
                locals: Vec::new(),
                body: Vec::new(),
                span: Span::default(),
            },
        }
    }

    /// `public static void main(String[] args)`
    pub fn main() -> Self {
        Self::new("main", ty_void())
            .public()
            .static_()
            .param("args", TypeAnnotation::array(TypeKind::String))
    }

    pub fn public(mut self) -> Self {
        self.decl.is_public = true;
        self
    }

    pub fn static_(mut self) -> Self {
        self.decl.is_static = true;
        self
    }

    pub fn param(mut self, name: &str, ty: TypeAnnotation) -> Self {
        self.decl.params.push(var(name, ty));
        self
    }

    pub fn local(mut self, name: &str, ty: TypeAnnotation) -> Self {
        self.decl.locals.push(var(name, ty));
        self
    }

    pub fn stmt(mut self, stmt: Statement) -> Self {
        self.decl.body.push(stmt);
        self
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.decl.span = Span::at(line, column);
        self
    }

    pub fn build(self) -> MethodDecl {
        self.decl
    }
}

/// Builder for [`ClassDecl`]
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    decl: ClassDecl,
}

impl ClassBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            decl: ClassDecl {
                name: name.to_string(),
                extends: None,
                fields: Vec::new(),
                methods: Vec::new(),
                span: Span::default(),
            },
        }
    }

    pub fn extends(mut self, super_class: &str) -> Self {
        self.decl.extends = Some(super_class.to_string());
        self
    }

    pub fn field(mut self, name: &str, ty: TypeAnnotation) -> Self {
        self.decl.fields.push(var(name, ty));
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.decl.methods.push(method);
        self
    }

    pub fn build(self) -> ClassDecl {
        self.decl
    }
}
