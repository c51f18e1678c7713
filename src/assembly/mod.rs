//! Constraint assembly and the model container.
//!
//! Emits every rule of the timetabling problem as linear constraints over the
//! [`VariableSpace`](crate::space::VariableSpace):
//!
//! | Family | Form |
//! |--------|------|
//! | unit total | `Σ X[g,c,·,·] = units(c)`, `Σ Y[t,c,·,·] = units(t,c)` |
//! | linking | `X = Σ_t W`, `Y = Σ_g W` |
//! | room / group / teacher conflict | `Σ occupancy at (entity, slot) ≤ 1` |
//! | rest day | `Σ occupancy on the rest day = 0` |
//! | continuous run | `Σ occupancy over K+1 consecutive hours ≤ K` |
//! | daily load | `Σ occupancy per (entity, day) ≤ cap` |
//!
//! Enrollments that cannot be scheduled at all are reported as
//! [`StructuralInfeasibility`](crate::error::AssemblyError::StructuralInfeasibility)
//! before any solver runs.

mod assembler;
mod config;
mod container;
mod families;
mod rest_day;

pub use assembler::ConstraintAssembler;
pub use config::{AssemblyConfig, ObjectiveKind};
pub use container::TimetableModel;
pub use rest_day::{RestDayPlan, RestDayPolicy, RestDays, RestEntity};
