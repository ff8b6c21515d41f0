//! Expression type inference
//!
//! [`expr_type`] is a pure, structurally recursive function of the
//! expression, the method scope and the [`CallSite`] the expression appears
//! in. The site only matters for calls to opaque (imported or inherited)
//! methods, whose result type cannot be read from the symbol table and is
//! taken from what the surrounding expression expects instead.

use crate::error::TypeError;
use crate::scope::MethodScope;
use jmm_ast::{BinaryOperator, CallExpression, Expression, UnaryOperator};
use jmm_types::{MethodSignature, Type};

/// What the enclosing construct does with an expression's value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallSite {
    /// Value discarded (expression statement)
    Standalone,
    /// Right-hand side of an assignment to a variable of the given type
    Assigned(Type),
    /// Returned from a method with the given return type
    Returned(Type),
    /// Argument of a call; the parameter type when the callee is local
    Argument(Option<Type>),
    /// Operand, index, condition or receiver with the expected type, if any
    Nested(Option<Type>),
}

impl CallSite {
    /// The type the site expects, if it knows one
    pub fn expected(&self) -> Option<&Type> {
        match self {
            CallSite::Standalone => None,
            CallSite::Assigned(ty) | CallSite::Returned(ty) => Some(ty),
            CallSite::Argument(ty) | CallSite::Nested(ty) => ty.as_ref(),
        }
    }

    /// Whether the value is used
    pub fn consumes_value(&self) -> bool {
        !matches!(self, CallSite::Standalone)
    }

    /// Site of an operand expected to have type `ty`
    pub fn expecting(ty: Type) -> Self {
        CallSite::Nested(Some(ty))
    }

    /// Site with no expectation
    pub fn unknown() -> Self {
        CallSite::Nested(None)
    }
}

/// How a method call binds
#[derive(Debug, Clone, PartialEq)]
pub enum CallTarget<'a> {
    /// Method declared in the class
    Local(&'a MethodSignature),
    /// Undeclared method on the class itself, trusted to exist on the superclass
    Inherited,
    /// Static call on an imported class name
    ImportedStatic(String),
    /// Virtual call on a value whose type is imported or the superclass
    ImportedVirtual(Type),
}

impl CallTarget<'_> {
    /// Whether arity and argument types can be validated
    pub fn is_local(&self) -> bool {
        matches!(self, CallTarget::Local(_))
    }

    /// Whether the call is dispatched without a receiver object
    pub fn is_static(&self) -> bool {
        match self {
            CallTarget::Local(sig) => sig.is_static,
            CallTarget::ImportedStatic(_) => true,
            CallTarget::Inherited | CallTarget::ImportedVirtual(_) => false,
        }
    }

    /// Reported type of the call at `site`
    pub fn result_type(&self, site: &CallSite) -> Type {
        match self {
            CallTarget::Local(sig) => sig.return_type.without_attributes(),
            _ => site
                .expected()
                .map(Type::without_attributes)
                .unwrap_or_else(Type::void),
        }
    }
}

/// Classify a call by its receiver
pub fn resolve_call<'a>(
    call: &CallExpression,
    scope: &MethodScope<'a>,
) -> Result<CallTarget<'a>, TypeError> {
    let table = scope.table();
    match call.receiver.unparenthesized() {
        Expression::This(span) => {
            if scope.is_static() {
                return Err(TypeError::ThisInStatic { span: *span });
            }
            self_call(call, scope)
        }
        Expression::Identifier(id) if scope.resolve(&id.name).is_none() => {
            if table.is_imported(&id.name) {
                Ok(CallTarget::ImportedStatic(id.name.clone()))
            } else if id.name == table.class_name {
                // Only static methods can be called through the class name
                match self_call(call, scope)? {
                    CallTarget::Local(sig) if sig.is_static => Ok(CallTarget::Local(sig)),
                    _ => Err(invalid_receiver(call, table.class_type())),
                }
            } else {
                Err(TypeError::UndefinedVariable {
                    name: id.name.clone(),
                    span: id.span,
                })
            }
        }
        receiver => {
            let ty = expr_type(receiver, scope, &CallSite::unknown())?;
            if ty.is_array {
                return Err(invalid_receiver(call, ty));
            }
            if ty.name == table.class_name {
                self_call(call, scope)
            } else if table.is_imported(&ty.name) || table.is_super(&ty.name) {
                Ok(CallTarget::ImportedVirtual(ty))
            } else {
                Err(invalid_receiver(call, ty))
            }
        }
    }
}

fn self_call<'a>(call: &CallExpression, scope: &MethodScope<'a>) -> Result<CallTarget<'a>, TypeError> {
    let table = scope.table();
    match table.method(&call.method) {
        Some(sig) => Ok(CallTarget::Local(sig)),
        None if trusts_superclass(scope) => Ok(CallTarget::Inherited),
        None => Err(TypeError::UndefinedMethod {
            name: call.method.clone(),
            span: call.span,
        }),
    }
}

/// Whether calls on the class skip existence and argument checks because a
/// superclass may declare the method
pub fn trusts_superclass(scope: &MethodScope<'_>) -> bool {
    scope.table().super_class.is_some() && scope.policy().trust_superclass
}

fn invalid_receiver(call: &CallExpression, receiver: Type) -> TypeError {
    TypeError::InvalidReceiver {
        method: call.method.clone(),
        receiver,
        span: call.span,
    }
}

/// Parameter type expected for argument `index` of a local callee.
///
/// Arguments in the varargs position expect the element type.
pub fn parameter_type(sig: &MethodSignature, index: usize) -> Option<Type> {
    let params = &sig.parameters;
    match sig.varargs_parameter() {
        Some(varargs) if index + 1 >= params.len() => varargs.ty.element(),
        _ => params.get(index).map(|p| p.ty.without_attributes()),
    }
}

/// Whether a local varargs call passes an existing array instead of
/// individual trailing arguments
pub fn passes_varargs_array(sig: &MethodSignature, arg_types: &[Type]) -> bool {
    match sig.varargs_parameter() {
        Some(varargs) => {
            arg_types.len() == sig.parameters.len() && arg_types.last() == Some(&varargs.ty)
        }
        None => false,
    }
}

fn check_arguments(
    call: &CallExpression,
    sig: &MethodSignature,
    scope: &MethodScope<'_>,
) -> Result<(), TypeError> {
    let params = &sig.parameters;
    let args = &call.arguments;
    let varargs = sig.varargs_parameter().is_some();
    let arity_ok = if varargs {
        args.len() + 1 >= params.len()
    } else {
        args.len() == params.len()
    };
    if !arity_ok {
        return Err(TypeError::ArgumentCountMismatch {
            method: call.method.clone(),
            expected: if varargs { params.len() - 1 } else { params.len() },
            actual: args.len(),
            varargs,
            span: call.span,
        });
    }

    let mut actual_types = Vec::with_capacity(args.len());
    for (i, arg) in args.iter().enumerate() {
        let expected = parameter_type(sig, i);
        actual_types.push(expr_type(arg, scope, &CallSite::Argument(expected))?);
    }
    let direct_array = passes_varargs_array(sig, &actual_types);

    for (i, (arg, actual)) in args.iter().zip(&actual_types).enumerate() {
        let Some(expected) = parameter_type(sig, i) else {
            continue;
        };
        let in_varargs = varargs && i + 1 >= params.len();
        if in_varargs && direct_array {
            continue;
        }
        if !scope.is_assignable(&expected, actual) {
            return Err(TypeError::ArgumentTypeMismatch {
                method: call.method.clone(),
                position: i + 1,
                expected,
                actual: actual.clone(),
                span: *arg.span(),
            });
        }
    }
    Ok(())
}

fn call_type(call: &CallExpression, scope: &MethodScope<'_>, site: &CallSite) -> Result<Type, TypeError> {
    let target = resolve_call(call, scope)?;
    match &target {
        CallTarget::Local(sig) if !trusts_superclass(scope) => check_arguments(call, sig, scope)?,
        CallTarget::Local(sig) => {
            // A superclass overload may take these arguments
            for (i, arg) in call.arguments.iter().enumerate() {
                expr_type(arg, scope, &CallSite::Argument(parameter_type(sig, i)))?;
            }
        }
        _ => {
            for arg in &call.arguments {
                expr_type(arg, scope, &CallSite::Argument(None))?;
            }
        }
    }

    let ty = target.result_type(site);
    if site.consumes_value() && ty.is_void() {
        let method = call.method.clone();
        let span = call.span;
        return Err(if target.is_local() {
            TypeError::VoidValue { method, span }
        } else {
            TypeError::UnresolvedCallType { method, span }
        });
    }
    Ok(ty)
}

fn expect_operand(op: BinaryOperator, expected: Type, actual: Type, expr: &Expression) -> Result<(), TypeError> {
    if actual == expected {
        Ok(())
    } else {
        Err(TypeError::InvalidOperand {
            op: op.symbol(),
            expected,
            actual,
            span: *expr.span(),
        })
    }
}

fn binary_type(
    op: BinaryOperator,
    left: &Expression,
    right: &Expression,
    scope: &MethodScope<'_>,
) -> Result<Type, TypeError> {
    if op.is_equality() {
        // An opaque call takes its type from the other operand
        let (l, r) = if left.is_call() {
            let r = expr_type(right, scope, &CallSite::unknown())?;
            let l = expr_type(left, scope, &CallSite::expecting(r.clone()))?;
            (l, r)
        } else {
            let l = expr_type(left, scope, &CallSite::unknown())?;
            let r = expr_type(right, scope, &CallSite::expecting(l.clone()))?;
            (l, r)
        };
        if scope.is_assignable(&l, &r) || scope.is_assignable(&r, &l) {
            return Ok(Type::boolean());
        }
        return Err(TypeError::IncompatibleOperands {
            op: op.symbol(),
            left: l,
            right: r,
            span: *left.span(),
        });
    }

    let operand = if op.is_logical() {
        Type::boolean()
    } else {
        Type::int()
    };
    let l = expr_type(left, scope, &CallSite::expecting(operand.clone()))?;
    let r = expr_type(right, scope, &CallSite::expecting(operand.clone()))?;
    if op.is_arithmetic() {
        for (ty, expr) in [(&l, left), (&r, right)] {
            if ty.is_array {
                return Err(TypeError::ArrayInArithmetic {
                    op: op.symbol(),
                    span: *expr.span(),
                });
            }
        }
    }
    expect_operand(op, operand.clone(), l, left)?;
    expect_operand(op, operand, r, right)?;

    Ok(if op.is_arithmetic() {
        Type::int()
    } else {
        Type::boolean()
    })
}

/// Infer the type of `expr` appearing at `site`
pub fn expr_type(expr: &Expression, scope: &MethodScope<'_>, site: &CallSite) -> Result<Type, TypeError> {
    match expr {
        Expression::IntLiteral(_) => Ok(Type::int()),
        Expression::BoolLiteral(_) => Ok(Type::boolean()),

        Expression::Identifier(id) => match scope.resolve(&id.name) {
            Some(resolved) if resolved.is_field() && scope.is_static() => Err(TypeError::FieldInStatic {
                name: id.name.clone(),
                span: id.span,
            }),
            Some(resolved) => Ok(resolved.symbol.ty.without_attributes()),
            None => Err(TypeError::UndefinedVariable {
                name: id.name.clone(),
                span: id.span,
            }),
        },

        Expression::This(span) => {
            if scope.is_static() {
                Err(TypeError::ThisInStatic { span: *span })
            } else {
                Ok(scope.table().class_type())
            }
        }

        Expression::Binary(bin) => binary_type(bin.operator, &bin.left, &bin.right, scope),

        Expression::Unary(unary) => match unary.operator {
            UnaryOperator::Not => {
                let ty = expr_type(&unary.operand, scope, &CallSite::expecting(Type::boolean()))?;
                if ty.is_boolean() {
                    Ok(Type::boolean())
                } else {
                    Err(TypeError::InvalidOperand {
                        op: "!",
                        expected: Type::boolean(),
                        actual: ty,
                        span: *unary.operand.span(),
                    })
                }
            }
        },

        Expression::ArrayLiteral(lit) => {
            let Some((first, rest)) = lit.elements.split_first() else {
                return Ok(Type::int_array());
            };
            let element = expr_type(first, scope, &CallSite::unknown())?;
            if element.is_array {
                return Err(TypeError::NestedArray { span: lit.span });
            }
            for item in rest {
                let ty = expr_type(item, scope, &CallSite::expecting(element.clone()))?;
                if ty != element {
                    return Err(TypeError::MixedArrayLiteral {
                        expected: element,
                        actual: ty,
                        span: *item.span(),
                    });
                }
            }
            Ok(Type::array(element.name))
        }

        Expression::Index(idx) => {
            if idx.object.is_call() {
                return Err(TypeError::IndexOnCallResult {
                    span: *idx.object.span(),
                });
            }
            let object = expr_type(&idx.object, scope, &CallSite::unknown())?;
            let Some(element) = object.element() else {
                return Err(TypeError::IndexOnNonArray {
                    actual: object,
                    span: *idx.object.span(),
                });
            };
            let index = expr_type(&idx.index, scope, &CallSite::expecting(Type::int()))?;
            if !index.is_int() {
                return Err(TypeError::IndexNotInt {
                    actual: index,
                    span: *idx.index.span(),
                });
            }
            Ok(element)
        }

        Expression::NewArray(new) => {
            if !matches!(new.length.unparenthesized(), Expression::IntLiteral(_)) {
                return Err(TypeError::NonLiteralArrayLength {
                    span: *new.length.span(),
                });
            }
            let element = new.element.to_type();
            if element.is_array {
                return Err(TypeError::NestedArray { span: new.span });
            }
            Ok(Type::array(element.name))
        }

        Expression::NewObject(new) => {
            if scope.is_known_class(&new.class_name) {
                Ok(Type::new(new.class_name.clone()))
            } else {
                Err(TypeError::UndefinedClass {
                    name: new.class_name.clone(),
                    span: new.span,
                })
            }
        }

        Expression::Member(member) => {
            if member.property != "length" {
                return Err(TypeError::UnknownProperty {
                    property: member.property.clone(),
                    span: member.span,
                });
            }
            let object = expr_type(&member.object, scope, &CallSite::expecting(Type::int_array()))?;
            if object.is_array {
                Ok(Type::int())
            } else {
                Err(TypeError::LengthOnNonArray {
                    actual: object,
                    span: *member.object.span(),
                })
            }
        }

        Expression::Call(call) => call_type(call, scope, site),

        Expression::Parenthesized(p) => expr_type(&p.expression, scope, site),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::CheckerPolicy;
    use jmm_ast::build::*;
    use jmm_types::SymbolTable;

    fn table() -> SymbolTable {
        SymbolTable::new("Main")
            .with_import("io")
            .with_import("a.Foo")
            .with_field("count", Type::int())
            .with_method(
                MethodSignature::new("f", Type::int())
                    .with_parameter("p", Type::boolean())
                    .with_local("a", Type::int_array())
                    .with_local("i", Type::int())
                    .with_local("foo", Type::new("Foo")),
            )
            .with_method(MethodSignature::new("g", Type::void()))
            .with_method(
                MethodSignature::new("sum", Type::int())
                    .with_parameter("base", Type::int())
                    .with_parameter("xs", Type::int().with_varargs()),
            )
            .with_method(
                MethodSignature::new("main", Type::void())
                    .static_()
                    .with_parameter("args", Type::array("String")),
            )
    }

    fn infer(table: &SymbolTable, method: usize, expr: &Expression) -> Result<Type, TypeError> {
        let scope = MethodScope::new(table, &table.methods[method], CheckerPolicy::default());
        expr_type(expr, &scope, &CallSite::unknown())
    }

    #[test]
    fn test_int_arithmetic() {
        let table = table();
        assert_eq!(infer(&table, 0, &add(int(1), ident("i"))), Ok(Type::int()));
        assert_eq!(infer(&table, 0, &mul(ident("count"), int(2))), Ok(Type::int()));
    }

    #[test]
    fn test_arithmetic_rejects_boolean_and_array() {
        let table = table();
        assert!(matches!(
            infer(&table, 0, &add(int(1), ident("p"))),
            Err(TypeError::InvalidOperand { op: "+", .. })
        ));
        assert!(matches!(
            infer(&table, 0, &add(ident("a"), int(1))),
            Err(TypeError::ArrayInArithmetic { op: "+", .. })
        ));
    }

    #[test]
    fn test_relational_and_logical() {
        let table = table();
        assert_eq!(infer(&table, 0, &lt(ident("i"), int(3))), Ok(Type::boolean()));
        assert_eq!(infer(&table, 0, &and(ident("p"), not(ident("p")))), Ok(Type::boolean()));
        assert!(infer(&table, 0, &and(ident("p"), int(1))).is_err());
        assert!(infer(&table, 0, &lt(ident("p"), int(1))).is_err());
    }

    #[test]
    fn test_equality_requires_compatible_types() {
        let table = table();
        let eq = binary(BinaryOperator::Equal, ident("i"), int(3));
        assert_eq!(infer(&table, 0, &eq), Ok(Type::boolean()));
        let bad = binary(BinaryOperator::NotEqual, ident("p"), int(3));
        assert!(matches!(infer(&table, 0, &bad), Err(TypeError::IncompatibleOperands { .. })));
    }

    #[test]
    fn test_variable_not_found() {
        let table = table();
        assert_eq!(
            infer(&table, 0, &ident("nope")),
            Err(TypeError::UndefinedVariable {
                name: "nope".into(),
                span: Default::default()
            })
        );
    }

    #[test]
    fn test_arrays() {
        let table = table();
        assert_eq!(infer(&table, 0, &index(ident("a"), ident("i"))), Ok(Type::int()));
        assert_eq!(infer(&table, 0, &length(ident("a"))), Ok(Type::int()));
        assert_eq!(infer(&table, 0, &new_int_array(int(4))), Ok(Type::int_array()));
        assert!(matches!(
            infer(&table, 0, &index(ident("a"), ident("p"))),
            Err(TypeError::IndexNotInt { .. })
        ));
        assert!(matches!(
            infer(&table, 0, &index(ident("i"), int(0))),
            Err(TypeError::IndexOnNonArray { .. })
        ));
        assert!(matches!(
            infer(&table, 0, &new_int_array(ident("i"))),
            Err(TypeError::NonLiteralArrayLength { .. })
        ));
        assert!(matches!(
            infer(&table, 0, &member(ident("a"), "size")),
            Err(TypeError::UnknownProperty { .. })
        ));
        assert!(matches!(
            infer(&table, 0, &length(ident("i"))),
            Err(TypeError::LengthOnNonArray { .. })
        ));
    }

    #[test]
    fn test_array_literal() {
        let table = table();
        assert_eq!(infer(&table, 0, &array_literal(vec![])), Ok(Type::int_array()));
        assert_eq!(
            infer(&table, 0, &array_literal(vec![int(1), ident("i")])),
            Ok(Type::int_array())
        );
        assert!(matches!(
            infer(&table, 0, &array_literal(vec![int(1), boolean(true), boolean(false)])),
            Err(TypeError::MixedArrayLiteral { .. })
        ));
    }

    #[test]
    fn test_local_call_uses_declared_return_type() {
        let table = table();
        let call = this_call("sum", vec![int(1), int(2), int(3)]);
        assert_eq!(infer(&table, 0, &call), Ok(Type::int()));
    }

    #[test]
    fn test_varargs_arity() {
        let table = table();
        assert_eq!(infer(&table, 0, &this_call("sum", vec![int(1)])), Ok(Type::int()));
        assert_eq!(
            infer(&table, 0, &this_call("sum", vec![int(1), ident("a")])),
            Ok(Type::int())
        );
        assert!(matches!(
            infer(&table, 0, &this_call("sum", vec![])),
            Err(TypeError::ArgumentCountMismatch { varargs: true, .. })
        ));
        assert!(matches!(
            infer(&table, 0, &this_call("sum", vec![int(1), boolean(true)])),
            Err(TypeError::ArgumentTypeMismatch { position: 2, .. })
        ));
    }

    #[test]
    fn test_local_call_checks() {
        let table = table();
        assert!(matches!(
            infer(&table, 0, &this_call("missing", vec![])),
            Err(TypeError::UndefinedMethod { .. })
        ));
        assert!(matches!(
            infer(&table, 0, &this_call("g", vec![])),
            Err(TypeError::VoidValue { .. })
        ));
        assert!(matches!(
            infer(&table, 0, &this_call("f", vec![int(1)])),
            Err(TypeError::ArgumentTypeMismatch { position: 1, .. })
        ));
    }

    #[test]
    fn test_imported_call_takes_site_type() {
        let table = table();
        let scope = MethodScope::new(&table, &table.methods[0], CheckerPolicy::default());
        let call = call(ident("io"), "read", vec![]);

        let assigned = expr_type(&call, &scope, &CallSite::Assigned(Type::int()));
        assert_eq!(assigned, Ok(Type::int()));
        assert_eq!(expr_type(&call, &scope, &CallSite::Standalone), Ok(Type::void()));
        assert!(matches!(
            expr_type(&call, &scope, &CallSite::unknown()),
            Err(TypeError::UnresolvedCallType { .. })
        ));
        assert_eq!(
            expr_type(&add(call.clone(), int(1)), &scope, &CallSite::unknown()),
            Ok(Type::int())
        );
    }

    #[test]
    fn test_call_classification() {
        let table = table();
        let scope = MethodScope::new(&table, &table.methods[0], CheckerPolicy::default());
        let resolve = |expr: Expression| match expr {
            Expression::Call(c) => resolve_call(&c, &scope),
            _ => unreachable!(),
        };

        assert_eq!(
            resolve(call(ident("io"), "println", vec![])),
            Ok(CallTarget::ImportedStatic("io".into()))
        );
        assert_eq!(
            resolve(call(ident("foo"), "bar", vec![])),
            Ok(CallTarget::ImportedVirtual(Type::new("Foo")))
        );
        assert!(matches!(resolve(this_call("f", vec![])), Ok(CallTarget::Local(_))));
        assert!(matches!(
            resolve(call(new_object("Main"), "g", vec![])),
            Ok(CallTarget::Local(_))
        ));
        assert!(matches!(
            resolve(call(ident("i"), "f", vec![])),
            Err(TypeError::InvalidReceiver { .. })
        ));
        assert!(matches!(
            resolve(call(ident("Main"), "main", vec![ident("a")])),
            Ok(CallTarget::Local(sig)) if sig.is_static
        ));
        assert!(matches!(
            resolve(call(ident("Main"), "g", vec![])),
            Err(TypeError::InvalidReceiver { .. })
        ));
    }

    #[test]
    fn test_superclass_trust() {
        let table = table().with_super("Base");
        let scope = MethodScope::new(&table, &table.methods[0], CheckerPolicy::default());
        let Expression::Call(c) = this_call("inherited", vec![]) else {
            unreachable!()
        };
        assert_eq!(resolve_call(&c, &scope), Ok(CallTarget::Inherited));

        let strict = MethodScope::new(&table, &table.methods[0], CheckerPolicy::strict());
        assert!(matches!(resolve_call(&c, &strict), Err(TypeError::UndefinedMethod { .. })));
    }

    #[test]
    fn test_static_context() {
        let table = table();
        assert!(matches!(infer(&table, 3, &this()), Err(TypeError::ThisInStatic { .. })));
        assert!(matches!(
            infer(&table, 3, &ident("count")),
            Err(TypeError::FieldInStatic { .. })
        ));
        assert_eq!(infer(&table, 3, &new_object("Main")), Ok(Type::new("Main")));
        assert!(matches!(
            infer(&table, 3, &new_object("Nope")),
            Err(TypeError::UndefinedClass { .. })
        ));
    }
}
