//! CP model definition.

use super::variables::{BoolVar, Term, VarId};
use std::fmt;

/// The rule a constraint encodes. Used for counting and diagnostics only;
/// solvers treat every constraint as a plain linear (in)equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintFamily {
    /// Exact weekly hours per (group, course) and per (teacher, specialization).
    UnitTotal,
    /// Occupancy variables equal the sum of their joint assignments.
    Linking,
    /// At most one class per (room, slot).
    RoomConflict,
    /// At most one class per (group, slot).
    GroupConflict,
    /// At most one class per (teacher, slot).
    TeacherConflict,
    /// No class on an entity's rest day.
    RestDay,
    /// No run of occupied hours longer than the configured maximum.
    ContinuousRun,
    /// Occupied hours per (entity, day) under the configured cap.
    DailyLoad,
    /// Excludes a previously found solution during enumeration.
    Exclusion,
}

impl ConstraintFamily {
    /// Every family, in assembly order.
    pub const ALL: [ConstraintFamily; 9] = [
        ConstraintFamily::UnitTotal,
        ConstraintFamily::Linking,
        ConstraintFamily::RoomConflict,
        ConstraintFamily::GroupConflict,
        ConstraintFamily::TeacherConflict,
        ConstraintFamily::RestDay,
        ConstraintFamily::ContinuousRun,
        ConstraintFamily::DailyLoad,
        ConstraintFamily::Exclusion,
    ];
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintFamily::UnitTotal => "unit-total",
            ConstraintFamily::Linking => "linking",
            ConstraintFamily::RoomConflict => "room-conflict",
            ConstraintFamily::GroupConflict => "group-conflict",
            ConstraintFamily::TeacherConflict => "teacher-conflict",
            ConstraintFamily::RestDay => "rest-day",
            ConstraintFamily::ContinuousRun => "continuous-run",
            ConstraintFamily::DailyLoad => "daily-load",
            ConstraintFamily::Exclusion => "exclusion",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparison {
    Eq,
    Le,
    Ge,
}

/// A linear constraint over boolean variables: `Σ coeff·var  cmp  rhs`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    pub family: ConstraintFamily,
    /// Names the entities involved, e.g. `room Classroom A d0 h8`.
    pub label: String,
    pub terms: Vec<Term>,
    pub cmp: Comparison,
    pub rhs: i64,
}

impl Constraint {
    /// Inclusive `(lower, upper)` bounds on the left-hand side.
    pub fn bounds(&self) -> (i64, i64) {
        match self.cmp {
            Comparison::Eq => (self.rhs, self.rhs),
            Comparison::Le => (i64::MIN, self.rhs),
            Comparison::Ge => (self.rhs, i64::MAX),
        }
    }

    /// Left-hand side under a complete assignment.
    pub fn evaluate(&self, values: &[bool]) -> i64 {
        self.terms
            .iter()
            .filter(|t| values[t.var.index()])
            .map(|t| t.coeff)
            .sum()
    }

    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        let (lo, hi) = self.bounds();
        let lhs = self.evaluate(values);
        lo <= lhs && lhs <= hi
    }
}

/// Objective function for the CP model.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Objective {
    Minimize { terms: Vec<Term> },
    Maximize { terms: Vec<Term> },
}

impl Objective {
    pub fn terms(&self) -> &[Term] {
        match self {
            Objective::Minimize { terms } | Objective::Maximize { terms } => terms,
        }
    }

    pub fn evaluate(&self, values: &[bool]) -> i64 {
        self.terms()
            .iter()
            .filter(|t| values[t.var.index()])
            .map(|t| t.coeff)
            .sum()
    }
}

/// A constraint programming model over boolean variables.
///
/// Contains variables, linear constraints and an optional objective. It is a
/// plain data structure: solving is the job of a [`CpSolver`](super::CpSolver).
///
/// # Examples
///
/// ```
/// use u_timetable::cp::{Comparison, ConstraintFamily, CpModel, Term};
///
/// let mut model = CpModel::new("example");
/// let a = model.add_bool_var("a");
/// let b = model.add_bool_var("b");
/// model.add_linear(
///     ConstraintFamily::RoomConflict,
///     "room R1 d0 h8",
///     vec![Term::unit(a), Term::unit(b)],
///     Comparison::Le,
///     1,
/// );
/// assert!(model.validate().is_ok());
/// assert_eq!(model.constraint_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpModel {
    /// Model name.
    pub name: String,
    /// Boolean variables, indexed by [`VarId`].
    pub variables: Vec<BoolVar>,
    /// Constraints.
    pub constraints: Vec<Constraint>,
    /// Objective function.
    pub objective: Option<Objective>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a boolean variable and returns its handle.
    pub fn add_bool_var(&mut self, name: impl Into<String>) -> VarId {
        let id = VarId(self.variables.len() as u32);
        self.variables.push(BoolVar::new(name));
        id
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: add a linear constraint.
    pub fn add_linear(
        &mut self,
        family: ConstraintFamily,
        label: impl Into<String>,
        terms: Vec<Term>,
        cmp: Comparison,
        rhs: i64,
    ) {
        self.constraints.push(Constraint {
            family,
            label: label.into(),
            terms,
            cmp,
            rhs,
        });
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    pub fn variable(&self, id: VarId) -> &BoolVar {
        &self.variables[id.index()]
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced variable exists.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.variables.len();
        for constraint in &self.constraints {
            if let Some(t) = constraint.terms.iter().find(|t| t.var.index() >= n) {
                return Err(format!(
                    "{} constraint '{}' references undefined variable {}",
                    constraint.family, constraint.label, t.var
                ));
            }
        }
        if let Some(objective) = &self.objective {
            if let Some(t) = objective.terms().iter().find(|t| t.var.index() >= n) {
                return Err(format!("objective references undefined variable {}", t.var));
            }
        }
        Ok(())
    }

    /// Indices of the constraints violated by a complete assignment.
    pub fn violated(&self, values: &[bool]) -> Vec<usize> {
        self.constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_satisfied_by(values))
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns the number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Number of constraints belonging to `family`.
    pub fn family_count(&self, family: ConstraintFamily) -> usize {
        self.constraints.iter().filter(|c| c.family == family).count()
    }

    pub fn constraints_of(&self, family: ConstraintFamily) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(move |c| c.family == family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_model() -> (CpModel, VarId, VarId) {
        let mut model = CpModel::new("test");
        let a = model.add_bool_var("a");
        let b = model.add_bool_var("b");
        (model, a, b)
    }

    #[test]
    fn test_model_creation() {
        let (mut model, a, b) = pair_model();
        model.add_linear(
            ConstraintFamily::UnitTotal,
            "g c",
            vec![Term::unit(a), Term::unit(b)],
            Comparison::Eq,
            1,
        );
        model.set_objective(Objective::Maximize {
            terms: vec![Term::unit(a)],
        });

        assert_eq!(model.variable_count(), 2);
        assert_eq!(model.constraint_count(), 1);
        assert_eq!(model.family_count(ConstraintFamily::UnitTotal), 1);
        assert_eq!(model.family_count(ConstraintFamily::Linking), 0);
        assert_eq!(model.variable(b).name, "b");
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_undefined_variable() {
        let mut model = CpModel::new("test");
        model.add_linear(
            ConstraintFamily::RoomConflict,
            "room",
            vec![Term::unit(VarId(3))],
            Comparison::Le,
            1,
        );
        let err = model.validate().unwrap_err();
        assert!(err.contains("v3"));
    }

    #[test]
    fn test_undefined_objective_variable() {
        let mut model = CpModel::new("test");
        model.set_objective(Objective::Minimize {
            terms: vec![Term::unit(VarId(0))],
        });
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_bounds_and_satisfaction() {
        let (_, a, b) = pair_model();
        let le = Constraint {
            family: ConstraintFamily::RoomConflict,
            label: "le".into(),
            terms: vec![Term::unit(a), Term::unit(b)],
            cmp: Comparison::Le,
            rhs: 1,
        };
        assert_eq!(le.bounds(), (i64::MIN, 1));
        assert!(le.is_satisfied_by(&[true, false]));
        assert!(!le.is_satisfied_by(&[true, true]));

        let link = Constraint {
            family: ConstraintFamily::Linking,
            label: "link".into(),
            terms: vec![Term::unit(a), Term::new(b, -1)],
            cmp: Comparison::Eq,
            rhs: 0,
        };
        assert!(link.is_satisfied_by(&[true, true]));
        assert!(!link.is_satisfied_by(&[true, false]));
    }

    #[test]
    fn test_violated() {
        let (mut model, a, b) = pair_model();
        model.add_linear(
            ConstraintFamily::UnitTotal,
            "exactly one",
            vec![Term::unit(a), Term::unit(b)],
            Comparison::Eq,
            1,
        );
        model.add_linear(
            ConstraintFamily::RestDay,
            "a off",
            vec![Term::unit(a)],
            Comparison::Eq,
            0,
        );
        assert!(model.violated(&[false, true]).is_empty());
        assert_eq!(model.violated(&[true, false]), vec![1]);
        assert_eq!(model.violated(&[false, false]), vec![0]);
    }

    #[test]
    fn test_objective_evaluate() {
        let (_, a, b) = pair_model();
        let obj = Objective::Minimize {
            terms: vec![Term::new(a, 2), Term::new(b, 3)],
        };
        assert_eq!(obj.evaluate(&[true, true]), 5);
        assert_eq!(obj.evaluate(&[false, true]), 3);
    }

    #[test]
    fn test_family_display() {
        assert_eq!(ConstraintFamily::ContinuousRun.to_string(), "continuous-run");
        assert_eq!(ConstraintFamily::ALL.len(), 9);
    }
}
