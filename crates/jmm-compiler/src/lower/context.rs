//! Per-unit lowering state

use super::control_flow::{IfLabels, WhileLabels};
use crate::ir::{Operand, TempId};
use jmm_types::Type;

/// Counters shared by every method of one compilation unit
///
/// Temporaries and labels are numbered monotonically and never reused.
/// If-labels and while-labels count independently.
#[derive(Debug, Default)]
pub struct CompilationContext {
    next_temp: u32,
    next_if: u32,
    next_while: u32,
}

impl CompilationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh temporary of type `ty`
    pub fn fresh_temp(&mut self, ty: Type) -> Operand {
        let id = TempId::new(self.next_temp);
        self.next_temp += 1;
        Operand::temp(id, ty.without_attributes())
    }

    pub fn if_labels(&mut self) -> IfLabels {
        let labels = IfLabels::new(self.next_if);
        self.next_if += 1;
        labels
    }

    pub fn while_labels(&mut self) -> WhileLabels {
        let labels = WhileLabels::new(self.next_while);
        self.next_while += 1;
        labels
    }

    /// Number of temporaries allocated so far
    pub fn temp_count(&self) -> u32 {
        self.next_temp
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_independent() {
        let mut ctx = CompilationContext::new();
        assert_eq!(ctx.fresh_temp(Type::int()).to_string(), "tmp0:int");
        assert_eq!(ctx.fresh_temp(Type::int().with_varargs()).to_string(), "tmp1:int[]");

        assert_eq!(ctx.if_labels().then.as_str(), "then_0");
        assert_eq!(ctx.while_labels().cond.as_str(), "whilecond_0");
        assert_eq!(ctx.if_labels().end.as_str(), "endif_1");
        assert_eq!(ctx.temp_count(), 2);

        ctx.reset();
        assert_eq!(ctx.temp_count(), 0);
        assert_eq!(ctx.if_labels().then.as_str(), "then_0");
    }
}
