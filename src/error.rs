//! Error types for every stage of the pipeline.
//!
//! Solver verdicts (infeasible, timeout) are not errors: they are reported
//! through [`SolverStatus`](crate::cp::SolverStatus) and
//! [`SolveOutcome`](crate::scheduler::SolveOutcome). The types here cover
//! bad input, structurally impossible models and misuse of the API.

use thiserror::Error;

/// Rejected input detected while building the [`Catalog`](crate::catalog::Catalog).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("course '{code}': units '{value}' is not a positive integer")]
    InvalidUnits { code: String, value: String },

    #[error("{entity} record has an empty {field}")]
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("course '{code}' is defined twice with different units or type")]
    ConflictingCourse { code: String },

    #[error("duplicate student group '{id}'")]
    DuplicateGroup { id: String },

    #[error("duplicate teacher '{id}'")]
    DuplicateTeacher { id: String },

    #[error("duplicate room '{id}'")]
    DuplicateRoom { id: String },

    #[error("student group '{group}' enrolls in course '{code}' more than once")]
    DuplicateEnrollment { group: String, code: String },

    #[error("teacher '{teacher}' lists course '{code}' more than once")]
    DuplicateSpecialization { teacher: String, code: String },

    #[error("teacher '{teacher}' is specialized in unknown course '{code}'")]
    DanglingSpecialization { teacher: String, code: String },

    #[error("teacher '{teacher}' specialization '{code}' has type '{found}', course is '{expected}'")]
    SpecializationKindMismatch {
        teacher: String,
        code: String,
        expected: String,
        found: String,
    },

    #[error("invalid time grid: {0}")]
    InvalidGrid(String),
}

/// A reason the variable space cannot possibly satisfy the unit totals.
///
/// Detected before the solver is invoked, so the caller gets the offending
/// entity instead of an opaque infeasible verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralIssue {
    #[error("group '{group}' course '{course}': no room of type '{kind}'")]
    NoCompatibleRoom {
        group: String,
        course: String,
        kind: String,
    },

    #[error("group '{group}' course '{course}': no qualified teacher")]
    NoQualifiedTeacher { group: String, course: String },

    #[error("course '{course}': groups demand {demanded} hours, teachers offer {offered}")]
    UnitMismatch {
        course: String,
        demanded: u64,
        offered: u64,
    },
}

/// Failure while turning a catalog into a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("structurally infeasible ({} issue(s)): {}", .0.len(), join_issues(.0))]
    StructuralInfeasibility(Vec<StructuralIssue>),

    #[error("invalid assembly config: {0}")]
    InvalidConfig(String),

    #[error("rest-day policy chose day {day} for '{entity}', grid has {days} day(s)")]
    InvalidRestDay {
        entity: String,
        day: u32,
        days: u32,
    },
}

impl AssemblyError {
    /// Structural issues carried by this error, if any.
    pub fn issues(&self) -> &[StructuralIssue] {
        match self {
            AssemblyError::StructuralInfeasibility(issues) => issues,
            _ => &[],
        }
    }
}

fn join_issues(issues: &[StructuralIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure while decoding a solver assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("solver returned {found} values for a model with {expected} variables")]
    LengthMismatch { expected: usize, found: usize },

    #[error("solver reported no solution (status {0})")]
    NoSolution(String),
}

/// Umbrella error returned by the [`Scheduler`](crate::scheduler::Scheduler).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimetableError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("solver rejected the model: {0}")]
    InvalidModel(String),
}
