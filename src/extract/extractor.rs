//! Reading timetables back from solver assignments.

use super::solution::{TimetableEntry, TimetableSolution};
use crate::assembly::TimetableModel;
use crate::cp::{CpSolution, VarId};
use crate::error::ExtractError;
use crate::space::JointVarKey;
use std::collections::BTreeMap;

/// Turns raw solver assignments into [`TimetableSolution`]s.
///
/// Only the joint assignment variables are read: they fully determine the
/// occupancy variables through the linking constraints.
#[derive(Debug, Clone, Copy)]
pub struct SolutionExtractor<'a> {
    model: &'a TimetableModel,
}

impl<'a> SolutionExtractor<'a> {
    pub fn new(model: &'a TimetableModel) -> Self {
        Self { model }
    }

    /// Joint variables set in `solution`, in ascending order.
    ///
    /// Two assignments with the same canonical key describe the same
    /// timetable.
    pub fn canonical_key(&self, solution: &CpSolution) -> Result<Vec<VarId>, ExtractError> {
        self.check(solution)?;
        let mut key: Vec<VarId> = self
            .model
            .space()
            .joint_keys()
            .map(|(_, w)| w)
            .filter(|w| solution.values[w.index()])
            .collect();
        key.sort_unstable();
        Ok(key)
    }

    /// Reconstructs the timetable of `solution`.
    ///
    /// # Errors
    ///
    /// [`ExtractError::NoSolution`] unless the status carries an assignment,
    /// [`ExtractError::LengthMismatch`] when the assignment does not cover
    /// the model's variables.
    pub fn extract(&self, solution: &CpSolution) -> Result<TimetableSolution, ExtractError> {
        self.check(solution)?;

        let mut assigned: Vec<JointVarKey> = self
            .model
            .space()
            .joint_keys()
            .filter(|(_, w)| solution.values[w.index()])
            .map(|(key, _)| *key)
            .collect();
        assigned.sort_by_key(|k| (k.group, k.course, k.slot, k.teacher, k.room));

        let mut units: BTreeMap<_, u32> = BTreeMap::new();
        let mut entries: Vec<TimetableEntry> = assigned
            .into_iter()
            .map(|k| {
                let unit = units.entry((k.group, k.course)).or_insert(0);
                *unit += 1;
                TimetableEntry {
                    group: k.group,
                    course: k.course,
                    unit: *unit,
                    teacher: k.teacher,
                    room: k.room,
                    slot: k.slot,
                }
            })
            .collect();
        entries.sort();

        Ok(TimetableSolution {
            entries,
            status: solution.status,
            objective_value: solution.objective_value,
        })
    }

    fn check(&self, solution: &CpSolution) -> Result<(), ExtractError> {
        if !solution.is_solution_found() {
            return Err(ExtractError::NoSolution(solution.status.to_string()));
        }
        let expected = self.model.variable_count();
        if solution.values.len() != expected {
            return Err(ExtractError::LengthMismatch {
                expected,
                found: solution.values.len(),
            });
        }
        Ok(())
    }
}
