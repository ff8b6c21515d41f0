use jmm_ast::build::*;
use jmm_ast::{ClassDecl, MethodDecl, Span};
use jmm_checker::{bind_program, check, CheckError, CheckerPolicy, Report, TypeError};

fn check_with(imports: &[&str], class: ClassDecl, policy: CheckerPolicy) -> Vec<CheckError> {
    let program = program(imports, class);
    let table = bind_program(&program);
    check(&program, &table, policy)
}

fn check_class(class: ClassDecl) -> Vec<CheckError> {
    check_with(&["io", "a.Foo", "b.Bar"], class, CheckerPolicy::default())
}

fn with_main(method: MethodDecl) -> ClassDecl {
    ClassBuilder::new("Main")
        .method(method)
        .method(MethodBuilder::main().build())
        .build()
}

#[test]
fn test_boolean_assigned_int_is_rejected() {
    let method = MethodBuilder::new("f", ty_void())
        .local("a", ty_bool())
        .stmt(assign("a", int(10)))
        .build();
    let errors = check_class(with_main(method));
    assert!(matches!(errors[..], [CheckError::AssignMismatch { .. }]));
}

#[test]
fn test_int_condition_is_rejected_with_position() {
    let condition = add(int(1), int(2)).with_span(Span::new(4, 9, 3, 13));
    let method = MethodBuilder::new("f", ty_void())
        .stmt(if_else(condition, block(vec![]), block(vec![])))
        .build();
    let errors = check_class(with_main(method));
    assert_eq!(errors.len(), 1);

    let report = Report::from_check_error(&errors[0]);
    assert_eq!((report.line, report.column), (3, 13));
    assert!(report.to_string().starts_with("ERROR@SEMANTIC, line 3, col 13:"));
}

#[test]
fn test_array_condition_is_rejected() {
    let method = MethodBuilder::new("f", ty_void())
        .local("a", ty_int_array())
        .stmt(while_loop(ident("a"), block(vec![])))
        .build();
    let errors = check_class(with_main(method));
    assert!(matches!(errors[..], [CheckError::InvalidCondition { .. }]));
}

#[test]
fn test_boolean_index_is_rejected() {
    let method = MethodBuilder::new("f", ty_int())
        .local("a", ty_int_array())
        .local("b", ty_bool())
        .stmt(assign("a", new_int_array(int(2))))
        .stmt(assign("b", boolean(true)))
        .stmt(ret(index(ident("a"), ident("b"))))
        .build();
    let errors = check_class(with_main(method));
    assert!(matches!(
        errors[..],
        [CheckError::Type(TypeError::IndexNotInt { .. })]
    ));
}

#[test]
fn test_index_on_call_result_is_rejected() {
    let class = ClassBuilder::new("Main")
        .method(
            MethodBuilder::new("arr", ty_int_array())
                .local("a", ty_int_array())
                .stmt(ret(ident("a")))
                .build(),
        )
        .method(
            MethodBuilder::new("f", ty_int())
                .stmt(ret(index(this_call("arr", vec![]), int(0))))
                .build(),
        )
        .build();
    let errors = check_class(class);
    assert!(matches!(
        errors[..],
        [CheckError::Type(TypeError::IndexOnCallResult { .. })]
    ));
}

#[test]
fn test_this_in_main_is_rejected() {
    let main = MethodBuilder::main()
        .stmt(expr_stmt(this_call("f", vec![])))
        .build();
    let class = ClassBuilder::new("Main")
        .method(MethodBuilder::new("f", ty_void()).build())
        .method(main)
        .build();
    let errors = check_class(class);
    assert!(matches!(
        errors[..],
        [CheckError::Type(TypeError::ThisInStatic { .. })]
    ));
}

#[test]
fn test_imported_values_are_mutually_assignable() {
    let method = MethodBuilder::new("f", ty_void())
        .local("foo", ty_class("Foo"))
        .local("bar", ty_class("Bar"))
        .stmt(assign("foo", ident("bar")))
        .build();

    assert_eq!(check_class(with_main(method.clone())), vec![]);

    let strict = check_with(&["a.Foo", "b.Bar"], with_main(method), CheckerPolicy::strict());
    assert!(matches!(strict[..], [CheckError::AssignMismatch { .. }]));
}

#[test]
fn test_upcast_to_superclass() {
    let method = MethodBuilder::new("f", ty_void())
        .local("base", ty_class("Base"))
        .local("me", ty_class("Main"))
        .stmt(assign("me", new_object("Main")))
        .stmt(assign("base", ident("me")))
        .build();
    let class = ClassBuilder::new("Main")
        .extends("Base")
        .method(method)
        .method(MethodBuilder::main().build())
        .build();
    assert_eq!(check_class(class), vec![]);
}

#[test]
fn test_superclass_suppresses_unknown_method() {
    let method = MethodBuilder::new("f", ty_int())
        .local("a", ty_int())
        .stmt(assign("a", this_call("inherited", vec![int(1), boolean(true)])))
        .stmt(ret(ident("a")))
        .build();

    let with_super = ClassBuilder::new("Main").extends("Base").method(method.clone()).build();
    assert_eq!(check_class(with_super), vec![]);

    let without_super = ClassBuilder::new("Main").method(method).build();
    assert!(matches!(
        check_class(without_super)[..],
        [CheckError::Type(TypeError::UndefinedMethod { .. })]
    ));
}

#[test]
fn test_superclass_trusts_calls_to_declared_methods() {
    let f = MethodBuilder::new("f", ty_int())
        .param("a", ty_int())
        .stmt(ret(ident("a")))
        .build();
    // An overload on the superclass may take two arguments
    let g = MethodBuilder::new("g", ty_int())
        .stmt(ret(this_call("f", vec![int(1), int(2)])))
        .build();

    let with_super = ClassBuilder::new("Main")
        .extends("Base")
        .method(f.clone())
        .method(g.clone())
        .build();
    assert_eq!(check_class(with_super), vec![]);

    let strict = ClassBuilder::new("Main")
        .extends("Base")
        .method(f.clone())
        .method(g.clone())
        .build();
    let errors = check_with(&[], strict, CheckerPolicy::strict());
    assert!(errors
        .iter()
        .any(|e| matches!(e, CheckError::Type(TypeError::ArgumentCountMismatch { actual: 2, .. }))));

    let without_super = ClassBuilder::new("Main").method(f).method(g).build();
    assert!(matches!(
        check_class(without_super)[..],
        [CheckError::Type(TypeError::ArgumentCountMismatch { expected: 1, actual: 2, .. })]
    ));
}

#[test]
fn test_imported_static_call_accepts_anything() {
    let main = MethodBuilder::main()
        .local("x", ty_int())
        .stmt(assign("x", call(ident("io"), "read", vec![])))
        .stmt(expr_stmt(call(ident("io"), "println", vec![ident("x"), boolean(true)])))
        .build();
    assert_eq!(check_class(ClassBuilder::new("Main").method(main).build()), vec![]);
}

#[test]
fn test_duplicate_imports_by_last_segment() {
    let class = ClassBuilder::new("Main").method(MethodBuilder::main().build()).build();
    let errors = check_with(&["a.Foo", "b.Foo"], class, CheckerPolicy::default());
    assert!(matches!(errors[..], [CheckError::DuplicateImport { .. }]));
}

#[test]
fn test_arity_mismatch_stops_argument_checks() {
    let class = ClassBuilder::new("Main")
        .method(
            MethodBuilder::new("g", ty_int())
                .param("a", ty_int())
                .stmt(ret(ident("a")))
                .build(),
        )
        .method(
            MethodBuilder::new("f", ty_int())
                .stmt(ret(this_call("g", vec![boolean(true), ident("nope")])))
                .build(),
        )
        .build();
    let errors = check_class(class);
    assert!(matches!(
        errors[..],
        [CheckError::Type(TypeError::ArgumentCountMismatch { expected: 1, actual: 2, .. })]
    ));
}

#[test]
fn test_multiple_unrelated_errors_are_all_reported() {
    let class = ClassBuilder::new("Main")
        .field("x", ty_int())
        .field("x", ty_int())
        .method(
            MethodBuilder::new("f", ty_int())
                .param("length", ty_int())
                .stmt(ret(add(ident("undefined"), int(1))))
                .stmt(expr_stmt(int(0)))
                .build(),
        )
        .build();
    let errors = check_class(class);
    assert_eq!(errors.len(), 4, "{errors:#?}");
}
