//! Symbol table construction
//!
//! One pass over the declarations of a [`Program`]. Duplicate names are kept
//! as declared; reporting them is the checker's job.

use jmm_ast::{MethodDecl, Program, VarDecl};
use jmm_types::{MethodSignature, Symbol, SymbolTable};
use tracing::debug;

fn symbols(decls: &[VarDecl]) -> Vec<Symbol> {
    decls
        .iter()
        .map(|decl| Symbol::new(decl.name.clone(), decl.ty.to_type()))
        .collect()
}

fn bind_method(method: &MethodDecl) -> MethodSignature {
    MethodSignature {
        name: method.name.clone(),
        return_type: method.return_type.to_type(),
        parameters: symbols(&method.params),
        locals: symbols(&method.locals),
        is_static: method.is_static,
        is_public: method.is_public,
    }
}

/// Build the symbol table of `program`
pub fn bind_program(program: &Program) -> SymbolTable {
    let class = &program.class;
    let table = SymbolTable {
        class_name: class.name.clone(),
        super_class: class.extends.clone(),
        imports: program.imports.iter().map(|i| i.qualified_name()).collect(),
        fields: symbols(&class.fields),
        methods: class.methods.iter().map(bind_method).collect(),
    };
    debug!(
        class = %table.class_name,
        imports = table.imports.len(),
        fields = table.fields.len(),
        methods = table.methods.len(),
        "bound symbol table"
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use jmm_ast::build::*;
    use jmm_types::Type;

    #[test]
    fn test_bind_program() {
        let class = ClassBuilder::new("Main")
            .extends("Base")
            .field("x", ty_int())
            .method(
                MethodBuilder::new("sum", ty_int())
                    .public()
                    .param("base", ty_int())
                    .param("xs", ty_int_varargs())
                    .local("acc", ty_int())
                    .build(),
            )
            .method(MethodBuilder::main().build())
            .build();
        let table = bind_program(&program(&["java.util.List", "io"], class));

        assert_eq!(table.class_name, "Main");
        assert_eq!(table.super_class.as_deref(), Some("Base"));
        assert_eq!(table.imports, vec!["java.util.List", "io"]);
        assert_eq!(table.fields[0].ty, Type::int());

        let sum = table.method("sum").unwrap();
        assert!(sum.is_public && !sum.is_static);
        assert!(sum.parameters[1].ty.is_varargs());
        assert_eq!(sum.locals[0].name, "acc");

        let main = table.method("main").unwrap();
        assert!(main.is_entry_point());
        assert_eq!(main.parameters[0].ty, Type::array("String"));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let class = ClassBuilder::new("Main")
            .field("x", ty_int())
            .field("x", ty_bool())
            .build();
        let table = bind_program(&program(&[], class));
        assert_eq!(table.fields.len(), 2);
    }
}
