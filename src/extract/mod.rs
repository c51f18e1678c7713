//! Solution extraction and enumeration.
//!
//! - [`SolutionExtractor`]: raw solver assignment → [`TimetableSolution`]
//! - [`Enumerator`]: many distinct solutions, deduplicated canonically
//! - [`verify_solution`]: independent re-check of a timetable against the catalog

mod enumerate;
mod extractor;
mod solution;
mod verify;

pub use enumerate::{EnumerationConfig, EnumerationResult, Enumerator, StopReason};
pub use extractor::SolutionExtractor;
pub use solution::{TimetableEntry, TimetableSolution};
pub use verify::{verify_solution, Violation};
