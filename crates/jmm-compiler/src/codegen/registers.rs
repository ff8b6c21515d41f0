//! Local variable slot assignment

use crate::error::{CompileError, CompileResult};
use crate::ir::{IrMethod, Operand, OperandKind, TempId};
use rustc_hash::FxHashMap;

/// Storage an operand lives in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotKey {
    Temp(TempId),
    Variable(String),
}

impl SlotKey {
    fn of(operand: &Operand) -> Option<SlotKey> {
        match &operand.kind {
            OperandKind::Temp(id) => Some(SlotKey::Temp(*id)),
            OperandKind::Variable(name) => Some(SlotKey::Variable(name.clone())),
            _ => None,
        }
    }
}

/// Slot table of one method
///
/// Slot 0 holds `this` in instance methods, then one slot per parameter in
/// declaration order, then locals and temporaries in order of first
/// appearance. Every value is a single-slot int, boolean or reference.
#[derive(Debug, Default)]
pub struct RegisterTable {
    slots: FxHashMap<SlotKey, u16>,
    next_slot: u16,
}

impl RegisterTable {
    pub fn for_method(method: &IrMethod) -> CompileResult<Self> {
        let mut table = RegisterTable {
            slots: FxHashMap::default(),
            next_slot: if method.is_static { 0 } else { 1 },
        };
        for param in &method.params {
            table.allocate(param)?;
        }
        for instr in &method.instrs {
            for operand in instr.operands() {
                table.allocate(operand)?;
            }
        }
        Ok(table)
    }

    fn allocate(&mut self, operand: &Operand) -> CompileResult<()> {
        if let OperandKind::Element { array, index } = &operand.kind {
            self.allocate(array)?;
            return self.allocate(index);
        }
        let Some(key) = SlotKey::of(operand) else {
            return Ok(());
        };
        if self.slots.contains_key(&key) {
            return Ok(());
        }
        let slot = self.next_slot;
        self.next_slot = self
            .next_slot
            .checked_add(1)
            .ok_or_else(|| CompileError::representation("too many local variables (max 65535)"))?;
        self.slots.insert(key, slot);
        Ok(())
    }

    /// Slot holding `operand`
    pub fn slot(&self, operand: &Operand) -> CompileResult<u16> {
        SlotKey::of(operand)
            .and_then(|key| self.slots.get(&key).copied())
            .ok_or_else(|| CompileError::representation(format!("no local slot for {}", operand)))
    }

    /// Value for `.limit locals`
    pub fn locals_limit(&self) -> u16 {
        self.next_slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::IrInstr;
    use jmm_types::Type;

    #[test]
    fn test_slot_order() {
        let a = Operand::variable("a", Type::int());
        let tmp = Operand::temp(TempId(0), Type::int());
        let mut method = IrMethod::new("f", vec![a.clone()], Type::int());
        method.push(IrInstr::BinaryOp {
            dest: tmp.clone(),
            op: crate::ir::BinaryOp::Add,
            left: a.clone(),
            right: Operand::variable("b", Type::int()),
        });
        method.push(IrInstr::Return {
            value: Some(tmp.clone()),
        });

        let table = RegisterTable::for_method(&method).unwrap();
        assert_eq!(table.slot(&a).unwrap(), 1);
        assert_eq!(table.slot(&tmp).unwrap(), 2);
        assert_eq!(table.slot(&Operand::variable("b", Type::int())).unwrap(), 3);
        assert_eq!(table.locals_limit(), 4);

        method.is_static = true;
        let table = RegisterTable::for_method(&method).unwrap();
        assert_eq!(table.slot(&a).unwrap(), 0);
        assert!(table.slot(&Operand::int(1)).is_err());
    }
}
