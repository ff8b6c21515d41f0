use jmm_ast::build::*;
use jmm_ast::{MethodDecl, Program};
use jmm_checker::{bind_program, CheckerPolicy};
use jmm_compiler::ir::{CallKind, IrInstr, OperandKind};
use jmm_compiler::{ClassUnit, Lowerer};

fn lower(program: &Program) -> (ClassUnit, u32) {
    let table = bind_program(program);
    let mut lowerer = Lowerer::new(&table, CheckerPolicy::default());
    let unit = lowerer.lower_program(program).unwrap();
    (unit, lowerer.context().temp_count())
}

fn single(method: MethodDecl) -> (ClassUnit, u32) {
    lower(&program(&["io"], ClassBuilder::new("Main").method(method).build()))
}

fn body<'u>(unit: &'u ClassUnit, name: &str) -> &'u [IrInstr] {
    &unit.method(name).unwrap().instrs
}

fn text(instrs: &[IrInstr]) -> Vec<String> {
    instrs.iter().map(|i| i.to_string()).collect()
}

#[test]
fn test_one_temp_per_consumed_subexpression() {
    let (unit, temps) = single(
        MethodBuilder::new("f", ty_void())
            .local("a", ty_int())
            .stmt(assign("a", add(int(1), mul(int(2), int(3)))))
            .build(),
    );
    assert_eq!(temps, 2);
    assert_eq!(
        text(body(&unit, "f")),
        [
            "tmp0:int = 2:int * 3:int",
            "tmp1:int = 1:int + tmp0:int",
            "a:int = tmp1:int",
            "ret",
        ]
    );
}

#[test]
fn test_standalone_call_has_no_result() {
    let (unit, temps) = single(
        MethodBuilder::new("f", ty_int())
            .stmt(expr_stmt(this_call("f", vec![])))
            .stmt(ret(int(0)))
            .build(),
    );
    assert_eq!(temps, 0);
    assert!(matches!(
        &body(&unit, "f")[0],
        IrInstr::Call { dest: None, kind: CallKind::VirtualInvoke, .. }
    ));
}

#[test]
fn test_indexed_argument_is_materialized() {
    let (unit, _) = single(
        MethodBuilder::new("f", ty_void())
            .local("xs", ty_int_array())
            .local("a", ty_int())
            .stmt(assign("a", index(ident("xs"), int(0))))
            .stmt(expr_stmt(call(ident("io"), "println", vec![index(ident("xs"), int(1))])))
            .build(),
    );
    assert_eq!(
        text(body(&unit, "f")),
        [
            "a:int = xs:int[][0:int]:int",
            "tmp0:int = xs:int[][1:int]:int",
            "invokestatic(class io, \"println\", tmp0:int):void",
            "ret",
        ]
    );
}

#[test]
fn test_counters_span_methods() {
    let branchy = |name: &str, step: i32| {
        MethodBuilder::new(name, ty_int())
            .param("a", ty_int())
            .local("r", ty_int())
            .stmt(if_else(
                lt(ident("a"), int(0)),
                assign("r", int(0)),
                assign("r", add(ident("a"), int(step))),
            ))
            .stmt(ret(ident("r")))
            .build()
    };
    let (first, second) = (branchy("f", 1), branchy("g", 2));
    let (unit, temps) = lower(&program(&[], ClassBuilder::new("Main").method(first).method(second).build()));

    assert_eq!(temps, 2);
    let g = text(body(&unit, "g"));
    assert_eq!(g[0], "if (a:int < 0:int) goto then_1");
    assert_eq!(g[1], "tmp1:int = a:int + 2:int");
}

#[test]
fn test_counters_reset_per_program() {
    let program = program(
        &[],
        ClassBuilder::new("Main")
            .method(
                MethodBuilder::new("f", ty_int())
                    .stmt(ret(add(int(1), int(2))))
                    .build(),
            )
            .build(),
    );
    let table = bind_program(&program);
    let mut lowerer = Lowerer::new(&table, CheckerPolicy::default());
    let first = lowerer.lower_program(&program).unwrap();
    let second = lowerer.lower_program(&program).unwrap();
    assert_eq!(first, second);
    assert_eq!(lowerer.context().temp_count(), 1);
}

#[test]
fn test_imported_call_takes_type_from_site() {
    let (unit, _) = single(
        MethodBuilder::new("f", ty_void())
            .local("flag", ty_bool())
            .stmt(assign("flag", call(ident("io"), "ready", vec![])))
            .build(),
    );
    assert_eq!(
        text(body(&unit, "f"))[0],
        "tmp0:boolean = invokestatic(class io, \"ready\"):boolean"
    );
}

fn sum_method() -> MethodDecl {
    MethodBuilder::new("sum", ty_int())
        .param("xs", ty_int_varargs())
        .stmt(ret(length(ident("xs"))))
        .build()
}

#[test]
fn test_varargs_array_passed_directly() {
    let caller = MethodBuilder::new("f", ty_int())
        .local("xs", ty_int_array())
        .stmt(ret(this_call("sum", vec![ident("xs")])))
        .build();
    let (unit, _) = lower(&program(&[], ClassBuilder::new("Main").method(sum_method()).method(caller).build()));

    let f = body(&unit, "f");
    assert!(!f.iter().any(|i| matches!(i, IrInstr::NewArray { .. })));
    assert!(matches!(
        &f[0],
        IrInstr::Call { args, .. } if args.len() == 1 && args[0].kind == OperandKind::Variable("xs".into())
    ));
}

#[test]
fn test_trailing_varargs_are_packed() {
    let caller = MethodBuilder::new("f", ty_int())
        .stmt(ret(this_call("sum", vec![int(4), int(5)])))
        .build();
    let (unit, _) = lower(&program(&[], ClassBuilder::new("Main").method(sum_method()).method(caller).build()));

    assert_eq!(
        text(body(&unit, "f")),
        [
            "tmp1:int[] = new int[2:int]",
            "tmp1:int[][0:int] = 4:int",
            "tmp1:int[][1:int] = 5:int",
            "tmp2:int = invokevirtual(this:Main, \"sum\", tmp1:int[]):int",
            "ret tmp2:int",
        ]
    );
}

#[test]
fn test_allocation_precedes_constructor_call() {
    let (unit, _) = single(
        MethodBuilder::new("f", ty_void())
            .local("m", ty_class("Main"))
            .stmt(assign("m", new_object("Main")))
            .build(),
    );
    let f = body(&unit, "f");
    let (IrInstr::NewObject { dest, class }, IrInstr::Call { kind, receiver, .. }) = (&f[0], &f[1]) else {
        panic!("unexpected lowering: {:?}", text(f));
    };
    assert_eq!(class, "Main");
    assert_eq!(*kind, CallKind::Constructor);
    assert_eq!(receiver, dest);
    assert_eq!(text(f)[2], "m:Main = tmp0:Main");
}

#[test]
fn test_static_call_uses_class_receiver() {
    let helper = MethodBuilder::new("helper", ty_int()).static_().stmt(ret(int(1))).build();
    let main = MethodBuilder::main()
        .local("a", ty_int())
        .stmt(assign("a", call(ident("Main"), "helper", vec![])))
        .build();
    let (unit, _) = lower(&program(&[], ClassBuilder::new("Main").method(helper).method(main).build()));
    assert!(matches!(
        &body(&unit, "main")[0],
        IrInstr::Call { kind: CallKind::StaticInvoke, receiver, .. } if receiver.kind == OperandKind::ClassRef("Main".into())
    ));
}

#[test]
fn test_element_read_before_sibling_call() {
    let f = MethodBuilder::new("f", ty_int())
        .param("a", ty_int_array())
        .stmt(ret(add(index(ident("a"), int(0)), this_call("m", vec![ident("a")]))))
        .build();
    let m = MethodBuilder::new("m", ty_int())
        .param("b", ty_int_array())
        .stmt(ret(length(ident("b"))))
        .build();
    let (unit, _) = lower(&program(&[], ClassBuilder::new("Main").method(f).method(m).build()));

    assert_eq!(
        text(body(&unit, "f")),
        [
            "tmp0:int = a:int[][0:int]:int",
            "tmp1:int = invokevirtual(this:Main, \"m\", a:int[]):int",
            "tmp2:int = tmp0:int + tmp1:int",
            "ret tmp2:int",
        ]
    );
}

#[test]
fn test_element_without_sibling_call_stays_inline() {
    let (unit, _) = single(
        MethodBuilder::new("f", ty_int())
            .param("a", ty_int_array())
            .stmt(ret(add(index(ident("a"), int(0)), int(1))))
            .build(),
    );
    assert_eq!(
        text(body(&unit, "f")),
        ["tmp0:int = a:int[][0:int]:int + 1:int", "ret tmp0:int"]
    );
}

#[test]
fn test_trusted_call_keeps_extra_arguments() {
    let pick = MethodBuilder::new("pick", ty_int())
        .param("k", ty_int())
        .param("xs", ty_int_varargs())
        .stmt(ret(ident("k")))
        .build();
    let f = MethodBuilder::new("f", ty_int())
        .param("a", ty_int())
        .stmt(ret(ident("a")))
        .build();
    let g = MethodBuilder::new("g", ty_int())
        .local("r", ty_int())
        .stmt(assign("r", this_call("f", vec![int(1), int(2)])))
        .stmt(assign("r", this_call("pick", vec![])))
        .stmt(ret(ident("r")))
        .build();
    let class = ClassBuilder::new("Main").extends("Base").method(pick).method(f).method(g).build();
    let (unit, _) = lower(&program(&[], class));

    let calls: Vec<_> = body(&unit, "g")
        .iter()
        .filter_map(|i| match i {
            IrInstr::Call { method, args, .. } => Some((method.as_str(), args.len())),
            _ => None,
        })
        .collect();
    assert_eq!(calls, [("f", 2), ("pick", 0)]);
}
