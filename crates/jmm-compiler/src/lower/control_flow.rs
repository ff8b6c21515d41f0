//! Control Flow Lowering Utilities
//!
//! Label sets for the structured statements.

use crate::ir::Label;

/// Labels of one `if`/`else`
#[derive(Debug, Clone)]
pub struct IfLabels {
    /// Start of the then-branch
    pub then: Label,
    /// Join point after both branches
    pub end: Label,
}

impl IfLabels {
    pub fn new(n: u32) -> Self {
        Self {
            then: Label::new(format!("then_{}", n)),
            end: Label::new(format!("endif_{}", n)),
        }
    }
}

/// Labels of one `while`
#[derive(Debug, Clone)]
pub struct WhileLabels {
    /// Condition test, the target of the back edge
    pub cond: Label,
    /// Start of the body
    pub body: Label,
    /// Loop exit
    pub end: Label,
}

impl WhileLabels {
    pub fn new(n: u32) -> Self {
        Self {
            cond: Label::new(format!("whilecond_{}", n)),
            body: Label::new(format!("whileloop_{}", n)),
            end: Label::new(format!("whileend_{}", n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_names() {
        let labels = WhileLabels::new(3);
        assert_eq!(labels.cond.as_str(), "whilecond_3");
        assert_eq!(labels.body.as_str(), "whileloop_3");
        assert_eq!(labels.end.as_str(), "whileend_3");
        assert_eq!(IfLabels::new(2).end.as_str(), "endif_2");
    }
}
