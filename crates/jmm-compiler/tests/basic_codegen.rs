use jmm_ast::build::*;
use jmm_ast::Program;
use jmm_compiler::{compile_program, CompilerConfig, JasminEmitter};

fn assemble(program: &Program) -> String {
    let output = compile_program(program, &CompilerConfig::default()).unwrap();
    assert!(!output.has_errors(), "{}", output.render());
    output.assembly.unwrap()
}

/// Text of the method block starting with `header`
fn method_block<'t>(asm: &'t str, header: &str) -> &'t str {
    let start = asm.find(header).unwrap_or_else(|| panic!("missing {header} in\n{asm}"));
    let rest = &asm[start..];
    let end = rest.find(".end method").unwrap();
    &rest[..end]
}

/// Instruction lines of a method block, without directives and labels
fn instructions(block: &str) -> Vec<&str> {
    block
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.starts_with('.') && !line.ends_with(':'))
        .collect()
}

fn get_x_program() -> Program {
    let class = ClassBuilder::new("Main")
        .field("x", ty_int())
        .method(
            MethodBuilder::new("getX", ty_int())
                .public()
                .stmt(ret(ident("x")))
                .build(),
        )
        .method(MethodBuilder::main().build())
        .build();
    program(&[], class)
}

#[test]
fn test_field_getter_end_to_end() {
    let asm = assemble(&get_x_program());

    assert!(asm.starts_with(".class public Main\n.super java/lang/Object\n"));
    assert!(asm.contains(".field public x I\n"));

    let ctor = method_block(&asm, ".method public <init>()V");
    assert_eq!(
        instructions(ctor),
        ["aload_0", "invokespecial java/lang/Object/<init>()V", "return"]
    );

    let get_x = instructions(method_block(&asm, ".method public getX()I"));
    assert_eq!(get_x.first(), Some(&"aload_0"));
    assert!(get_x.contains(&"getfield Main/x I"));
    assert_eq!(get_x.last(), Some(&"ireturn"));

    let main = method_block(&asm, ".method public static main([Ljava/lang/String;)V");
    assert!(main.contains("\t.limit locals 1\n"));
    assert_eq!(instructions(main), ["return"]);
}

#[test]
fn test_constructor_is_emitted_first() {
    let asm = assemble(&get_x_program());
    let ctor = asm.find("<init>()V\n").unwrap();
    let get_x = asm.find("getX()I").unwrap();
    assert!(ctor < get_x);
}

#[test]
fn test_emission_is_idempotent() {
    let output = compile_program(&get_x_program(), &CompilerConfig::default()).unwrap();
    let unit = output.ir.unwrap();
    let first = JasminEmitter::new(&unit).emit().unwrap();
    let second = JasminEmitter::new(&unit).emit().unwrap();
    assert_eq!(first, second);
    assert_eq!(Some(first), output.assembly);
}

fn loops_and_arrays() -> Program {
    let sum = MethodBuilder::new("sum", ty_int())
        .public()
        .param("xs", ty_int_varargs())
        .local("i", ty_int())
        .local("acc", ty_int())
        .stmt(assign("i", int(0)))
        .stmt(assign("acc", int(0)))
        .stmt(while_loop(
            lt(ident("i"), length(ident("xs"))),
            block(vec![
                assign("acc", add(ident("acc"), index(ident("xs"), ident("i")))),
                assign("i", add(ident("i"), int(1))),
            ]),
        ))
        .stmt(ret(ident("acc")))
        .build();

    let main = MethodBuilder::main()
        .local("m", ty_class("Main"))
        .local("r", ty_int())
        .local("big", ty_bool())
        .stmt(assign("m", new_object("Main")))
        .stmt(assign("r", call(ident("m"), "sum", vec![int(1), int(2), int(300)])))
        .stmt(assign("big", lt(ident("r"), int(10))))
        .stmt(expr_stmt(call(ident("io"), "println", vec![ident("r")])))
        .stmt(if_else(
            and(ident("big"), not(boolean(false))),
            expr_stmt(call(ident("io"), "println", vec![int(1)])),
            expr_stmt(call(ident("io"), "println", vec![int(0)])),
        ))
        .build();

    program(&["io"], ClassBuilder::new("Main").method(sum).method(main).build())
}

#[test]
fn test_loops_arrays_and_calls() {
    let asm = assemble(&loops_and_arrays());

    let sum = method_block(&asm, ".method public sum([I)I");
    assert!(sum.contains("whilecond_0:\n"));
    assert!(sum.contains("\tarraylength\n"));
    assert!(sum.contains("\tiaload\n"));
    assert!(sum.contains("\tif_icmplt whileloop_0\n\tgoto whileend_0\nwhileloop_0:\n"));
    assert!(sum.trim_end().ends_with("ireturn"));

    let main = method_block(&asm, ".method public static main([Ljava/lang/String;)V");
    assert!(main.contains("\tnew Main\n\tdup\n\tinvokespecial Main/<init>()V\n\tastore_1\n"));
    // Trailing varargs arguments are packed into an array
    assert!(main.contains("\ticonst_3\n\tnewarray int\n"));
    assert!(main.contains("\tsipush 300\n\tiastore\n"));
    assert!(main.contains("\tinvokevirtual Main/sum([I)I\n"));
    assert!(main.contains("\tif_icmplt cmp_true_0\n"));
    assert!(main.contains("\tinvokestatic io/println(I)V\n"));
    assert!(main.contains("\tiand\n"));
    assert!(main.contains("\ticonst_1\n\tixor\n"));
    assert!(main.contains("\tifne then_0\n"));
    assert!(!main.contains("\tpop\n"));
}

#[test]
fn test_reference_equality_uses_acmp() {
    let method = MethodBuilder::new("same", ty_bool())
        .param("a", ty_class("Main"))
        .local("r", ty_bool())
        .stmt(if_else(
            binary(jmm_ast::BinaryOperator::Equal, ident("a"), this()),
            assign("r", boolean(true)),
            assign("r", boolean(false)),
        ))
        .stmt(ret(ident("r")))
        .build();
    let asm = assemble(&program(&[], ClassBuilder::new("Main").method(method).build()));
    let same = method_block(&asm, ".method same(LMain;)Z");
    assert!(same.contains("\taload_1\n\taload_0\n\tif_acmpeq then_0\n"));
}

#[test]
fn test_element_loaded_before_sibling_call() {
    let class = ClassBuilder::new("Main")
        .method(
            MethodBuilder::new("f", ty_int())
                .public()
                .param("a", ty_int_array())
                .stmt(ret(add(index(ident("a"), int(0)), this_call("m", vec![ident("a")]))))
                .build(),
        )
        .method(
            MethodBuilder::new("m", ty_int())
                .public()
                .param("b", ty_int_array())
                .stmt(ret(length(ident("b"))))
                .build(),
        )
        .method(MethodBuilder::main().build())
        .build();
    let asm = assemble(&program(&[], class));

    let f = instructions(method_block(&asm, ".method public f([I)I"));
    let load = f.iter().position(|i| *i == "iaload").unwrap();
    let call = f.iter().position(|i| i.starts_with("invokevirtual Main/m")).unwrap();
    assert!(load < call, "{f:?}");
}
