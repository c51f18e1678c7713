//! CP variable types.

use std::fmt;

/// Handle of a boolean variable inside a [`CpModel`](super::CpModel).
///
/// Handles are dense: the `n`-th variable added to a model has index `n`,
/// which is also its position in a solver assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarId(pub u32);

impl VarId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A boolean variable (true/false decision).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoolVar {
    /// Variable name, used only for diagnostics.
    pub name: String,
}

impl BoolVar {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One `coeff * var` term of a linear expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Term {
    pub var: VarId,
    pub coeff: i64,
}

impl Term {
    pub fn new(var: VarId, coeff: i64) -> Self {
        Self { var, coeff }
    }

    /// A `+1 * var` term.
    pub fn unit(var: VarId) -> Self {
        Self { var, coeff: 1 }
    }
}
