//! Constraint model builder for university course timetabling.
//!
//! Turns student groups, courses, teachers, rooms and a weekly time grid into
//! a boolean constraint model whose satisfying assignments are conflict-free
//! timetables, then reads timetables back from solver assignments:
//!
//! - **Catalog** ([`catalog`]): validated, normalized entities with typed
//!   indices and compatibility lookups.
//! - **Variable space** ([`space`]): one boolean per compatible
//!   (group/teacher, course, slot, room) tuple, plus joint assignment
//!   variables tying a group, a teacher and a room together.
//! - **Assembly** ([`assembly`]): unit totals, double-booking, rest days,
//!   continuous-run and daily-load rules as linear constraints, with
//!   structural infeasibility reported before any solver runs.
//! - **CP model** ([`cp`]): the solver-agnostic container and the
//!   [`CpSolver`](cp::CpSolver) seam, with a small reference solver.
//! - **Extraction** ([`extract`]): timetable entries from assignments,
//!   deduplicated enumeration, and an independent verifier.
//! - **Scheduler** ([`scheduler`]): the whole pipeline behind one facade.
//!
//! # Architecture
//!
//! The solving engine itself is external: anything implementing
//! [`CpSolver`](cp::CpSolver) can be plugged in. Data ingestion and result
//! presentation are left to the caller.

pub mod assembly;
pub mod catalog;
pub mod cp;
pub mod error;
pub mod extract;
pub mod scheduler;
pub mod space;

pub use error::TimetableError;
