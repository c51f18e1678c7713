//! The assembled model handed to a solver.

use super::rest_day::RestDayPlan;
use crate::cp::{ConstraintFamily, CpModel};
use crate::space::VariableSpace;
use std::collections::BTreeMap;

/// Variables, constraints and optional objective of one timetabling
/// instance, plus the keyed variable space needed to read solutions back.
///
/// A plain data structure: it never solves anything itself.
#[derive(Debug, Clone)]
pub struct TimetableModel {
    pub(super) cp: CpModel,
    pub(super) space: VariableSpace,
    pub(super) rest_days: RestDayPlan,
}

impl TimetableModel {
    /// The solver-facing model.
    pub fn cp(&self) -> &CpModel {
        &self.cp
    }

    pub fn space(&self) -> &VariableSpace {
        &self.space
    }

    /// Rest day chosen for every group and teacher.
    pub fn rest_days(&self) -> &RestDayPlan {
        &self.rest_days
    }

    pub fn variable_count(&self) -> usize {
        self.cp.variable_count()
    }

    pub fn constraint_count(&self) -> usize {
        self.cp.constraint_count()
    }

    /// Constraint count of every non-empty family, in family order.
    pub fn family_counts(&self) -> BTreeMap<ConstraintFamily, usize> {
        let mut counts = BTreeMap::new();
        for constraint in &self.cp.constraints {
            *counts.entry(constraint.family).or_insert(0) += 1;
        }
        counts
    }

    /// Splits the model into its parts.
    pub fn into_parts(self) -> (CpModel, VariableSpace, RestDayPlan) {
        (self.cp, self.space, self.rest_days)
    }
}
