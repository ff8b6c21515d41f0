//! Policy flags for known approximations of single-file checking

use serde::{Deserialize, Serialize};

/// Toggles for the checker's deliberate leniencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerPolicy {
    /// Treat any two imported class names as mutually assignable.
    ///
    /// Imports are opaque: their members and hierarchy cannot be seen, so
    /// turning this off rejects programs that pass imported objects around.
    pub lenient_imports: bool,

    /// Assume any method not declared locally exists on the superclass
    /// once the class declares `extends`.
    pub trust_superclass: bool,
}

impl Default for CheckerPolicy {
    fn default() -> Self {
        Self {
            lenient_imports: true,
            trust_superclass: true,
        }
    }
}

impl CheckerPolicy {
    /// No leniency: imported names are only assignable to themselves and
    /// unknown methods are always reported
    pub fn strict() -> Self {
        Self {
            lenient_imports: false,
            trust_superclass: false,
        }
    }
}
