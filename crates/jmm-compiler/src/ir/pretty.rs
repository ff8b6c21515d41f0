//! Pretty-printing for IR
//!
//! Provides human-readable output for debugging IR structures.

use super::method::IrMethod;
use super::unit::ClassUnit;
use super::instr::IrInstr;

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for ClassUnit {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        for import in &self.imports {
            output.push_str(&format!("import {};\n", import));
        }
        if !self.imports.is_empty() {
            output.push('\n');
        }

        match &self.super_class {
            Some(super_class) => output.push_str(&format!("{} extends {} {{\n", self.name, super_class)),
            None => output.push_str(&format!("{} {{\n", self.name)),
        }

        for field in &self.fields {
            output.push_str(&format!("  .field public {}:{};\n", field.name, field.ty));
        }
        if !self.fields.is_empty() {
            output.push('\n');
        }

        for method in &self.methods {
            output.push_str(&indent(&method.pretty_print(), 2));
            output.push('\n');
        }

        output.push_str("}\n");
        output
    }
}

impl PrettyPrint for IrMethod {
    fn pretty_print(&self) -> String {
        let mut output = String::from(".method ");
        if self.is_public {
            output.push_str("public ");
        }
        if self.is_static {
            output.push_str("static ");
        }
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        output.push_str(&format!(
            "{}({}):{} {{\n",
            self.name,
            params.join(", "),
            self.return_ty
        ));

        for instr in &self.instrs {
            match instr {
                IrInstr::Label(_) => output.push_str(&format!("{}\n", instr)),
                _ => output.push_str(&format!("  {};\n", instr)),
            }
        }

        output.push_str("}\n");
        output
    }
}

fn indent(text: &str, width: usize) -> String {
    let prefix = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}\n", prefix, line)
            }
        })
        .collect()
}
