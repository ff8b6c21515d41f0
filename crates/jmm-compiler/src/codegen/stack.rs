//! Operand stack depth analysis

use super::jvm::JvmInstr;
use crate::error::{CompileError, CompileResult};
use rustc_hash::FxHashMap;

/// Maximum operand stack depth reached by `code`.
///
/// Forward scan: each instruction adds its net effect to a running height.
/// Branches record the height at their target label; code after an
/// unconditional transfer is unreachable until the next label, which
/// resumes at its recorded height.
pub fn max_stack(code: &[JvmInstr]) -> CompileResult<u16> {
    let mut at_label: FxHashMap<&str, i32> = FxHashMap::default();
    let mut height = Some(0i32);
    let mut max = 0i32;

    for instr in code {
        if let JvmInstr::Label(name) = instr {
            let recorded = at_label.get(name.as_str()).copied();
            height = match (height, recorded) {
                (Some(h), Some(r)) if h != r => {
                    return Err(CompileError::representation(format!(
                        "stack height {} at label {} does not match {}",
                        h, name, r
                    )));
                }
                (Some(h), _) => Some(h),
                (None, Some(r)) => Some(r),
                // Only reached by a backward jump seen later
                (None, None) => Some(0),
            };
            if let Some(h) = height {
                at_label.insert(name.as_str(), h);
            }
            continue;
        }

        let Some(current) = height else {
            continue;
        };
        let next = current + instr.stack_effect();
        if next < 0 {
            return Err(CompileError::representation(format!(
                "operand stack underflow at '{}'",
                instr
            )));
        }
        // Pushes happen after pops, so the peak is the larger end point
        max = max.max(current).max(next);

        if let Some(target) = instr.branch_target() {
            at_label.entry(target).or_insert(next);
        }
        height = if instr.is_terminator() { None } else { Some(next) };
    }

    u16::try_from(max).map_err(|_| CompileError::representation("operand stack too deep"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::jvm::{CmpOp, ValueKind};

    #[test]
    fn test_straight_line() {
        let code = [
            JvmInstr::Load(ValueKind::Int, 1),
            JvmInstr::Load(ValueKind::Int, 2),
            JvmInstr::IAdd,
            JvmInstr::Return(Some(ValueKind::Int)),
        ];
        assert_eq!(max_stack(&code).unwrap(), 2);
    }

    #[test]
    fn test_height_carried_across_branches() {
        // a < b as a value: both arms push one int before the join
        let code = [
            JvmInstr::Load(ValueKind::Int, 1),
            JvmInstr::Load(ValueKind::Int, 2),
            JvmInstr::IfICmp(CmpOp::Lt, "cmp_true_0".into()),
            JvmInstr::IConst(0),
            JvmInstr::Goto("cmp_end_0".into()),
            JvmInstr::Label("cmp_true_0".into()),
            JvmInstr::IConst(1),
            JvmInstr::Label("cmp_end_0".into()),
            JvmInstr::Store(ValueKind::Int, 3),
            JvmInstr::Return(None),
        ];
        assert_eq!(max_stack(&code).unwrap(), 2);
    }

    #[test]
    fn test_underflow_is_rejected() {
        assert!(max_stack(&[JvmInstr::Pop]).is_err());
    }
}
