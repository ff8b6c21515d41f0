//! IR Methods

use super::instr::{CallKind, IrInstr};
use super::operand::Operand;
use jmm_types::Type;
use rustc_hash::FxHashMap;

/// Name of the instance initializer
pub const CONSTRUCTOR: &str = "<init>";

/// A lowered method
#[derive(Debug, Clone, PartialEq)]
pub struct IrMethod {
    pub name: String,
    pub is_public: bool,
    pub is_static: bool,
    /// Parameters in declaration order
    pub params: Vec<Operand>,
    pub return_ty: Type,
    pub instrs: Vec<IrInstr>,
    /// Label name to the index of its `Label` instruction
    pub labels: FxHashMap<String, usize>,
}

impl IrMethod {
    pub fn new(name: impl Into<String>, params: Vec<Operand>, return_ty: Type) -> Self {
        Self {
            name: name.into(),
            is_public: false,
            is_static: false,
            params,
            return_ty,
            instrs: Vec::new(),
            labels: FxHashMap::default(),
        }
    }

    /// The implicit no-argument constructor of `class`, delegating to the
    /// superclass initializer
    pub fn constructor(class: Type) -> Self {
        let mut method = Self::new(CONSTRUCTOR, Vec::new(), Type::void());
        method.is_public = true;
        method.push(IrInstr::Call {
            dest: None,
            kind: CallKind::Constructor,
            receiver: Operand::this(class),
            method: CONSTRUCTOR.to_string(),
            args: Vec::new(),
            return_ty: Type::void(),
        });
        method.push(IrInstr::Return { value: None });
        method
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR
    }

    /// Append an instruction, indexing labels as they are placed
    pub fn push(&mut self, instr: IrInstr) {
        if let IrInstr::Label(label) = &instr {
            self.labels.insert(label.0.clone(), self.instrs.len());
        }
        self.instrs.push(instr);
    }

    pub fn extend(&mut self, instrs: impl IntoIterator<Item = IrInstr>) {
        for instr in instrs {
            self.push(instr);
        }
    }

    /// Whether the body ends in a return
    pub fn ends_with_return(&self) -> bool {
        matches!(self.instrs.last(), Some(IrInstr::Return { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::instr::Label;

    #[test]
    fn test_labels_are_indexed() {
        let mut method = IrMethod::new("f", Vec::new(), Type::void());
        method.push(IrInstr::Jump {
            target: Label::new("endif_0"),
        });
        method.push(IrInstr::Label(Label::new("endif_0")));
        assert_eq!(method.labels.get("endif_0"), Some(&1));
        assert!(!method.ends_with_return());
    }

    #[test]
    fn test_constructor_shape() {
        let ctor = IrMethod::constructor(Type::new("Main"));
        assert!(ctor.is_constructor());
        assert!(ctor.is_public && !ctor.is_static);
        assert!(ctor.ends_with_return());
        assert!(matches!(
            ctor.instrs[0],
            IrInstr::Call {
                kind: CallKind::Constructor,
                ..
            }
        ));
    }
}
