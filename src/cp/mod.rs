//! Constraint Programming (CP) model container and solver seam.
//!
//! Provides a solver-agnostic model of boolean decision variables with
//! linear (in)equality constraints and an optional linear objective.
//!
//! # Key Components
//!
//! - **Variables**: [`BoolVar`], addressed by dense [`VarId`] handles
//! - **Constraints**: [`Constraint`], tagged with the [`ConstraintFamily`] it encodes
//! - **Model**: [`CpModel`], the container handed to the solving engine
//! - **Solver**: [`CpSolver`] trait, the interface for solver implementations
//!
//! # Design
//!
//! This module defines the modeling layer only. [`SimpleCpSolver`] is a
//! small depth-first search used by tests and tiny instances; real runs
//! plug an external engine (OR-Tools CP-SAT, a MaxSAT solver, ...) in
//! behind the [`CpSolver`] trait.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod model;
mod solver;
mod variables;

pub use model::{Comparison, Constraint, ConstraintFamily, CpModel, Objective};
pub use solver::{CpSolution, CpSolver, SimpleCpSolver, SolverConfig, SolverStatus};
pub use variables::{BoolVar, Term, VarId};
