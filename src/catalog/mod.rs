//! Entity catalog.
//!
//! Normalizes and validates raw student-group, course, teacher and room
//! records into an immutable [`Catalog`] with typed cross references.
//!
//! # Key Types
//!
//! - [`CatalogBuilder`]: collects raw records and validates them
//! - [`Catalog`]: read-only tables plus compatibility indices
//!   (rooms per type, qualified teachers per course)
//! - [`TimeGrid`] / [`TimeSlot`]: the bounded weekly grid of one-hour cells

mod builder;
mod grid;
mod records;
mod tables;
mod types;

pub use builder::{CatalogBuilder, DanglingPolicy};
pub use grid::{TimeGrid, TimeSlot};
pub use records::{CourseRecord, GroupRecord, RoomRecord, TeacherRecord};
pub use tables::Catalog;
pub use types::{
    Course, CourseIx, CourseKind, GroupIx, Room, RoomIx, Specialization, StudentGroup, Teacher,
    TeacherIx,
};
