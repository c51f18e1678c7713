//! Extracted timetable types.

use crate::catalog::{Catalog, CourseIx, GroupIx, RoomIx, TeacherIx, TimeSlot};
use crate::cp::SolverStatus;

/// One scheduled hour: a unit of a group's course, placed with a teacher in a
/// room at a slot.
///
/// Ordered by group, course, then unit, so a sorted list reads like a
/// per-group timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimetableEntry {
    pub group: GroupIx,
    pub course: CourseIx,
    /// 1-based unit index within the (group, course), in slot order.
    pub unit: u32,
    pub teacher: TeacherIx,
    pub room: RoomIx,
    pub slot: TimeSlot,
}

impl TimetableEntry {
    /// Human-readable form, e.g. `BSCS-2-1-D CS 2101 #1: Dr. Smith, Classroom A, d0 h8`.
    pub fn describe(&self, catalog: &Catalog) -> String {
        format!(
            "{} {} #{}: {}, {}, d{} h{}",
            catalog.group(self.group).label(),
            catalog.course(self.course).code,
            self.unit,
            catalog.teacher(self.teacher).name,
            catalog.room(self.room).name,
            self.slot.day,
            self.slot.hour
        )
    }
}

/// A complete timetable read back from one solver assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimetableSolution {
    pub(super) entries: Vec<TimetableEntry>,
    pub(super) status: SolverStatus,
    pub(super) objective_value: Option<i64>,
}

impl TimetableSolution {
    /// Entries in canonical (sorted) order.
    pub fn entries(&self) -> &[TimetableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn status(&self) -> SolverStatus {
        self.status
    }

    pub fn objective_value(&self) -> Option<i64> {
        self.objective_value
    }

    /// Scheduled hours of one (group, course).
    pub fn hours_for(&self, group: GroupIx, course: CourseIx) -> usize {
        self.entries
            .iter()
            .filter(|e| e.group == group && e.course == course)
            .count()
    }

    /// Scheduled hours a teacher delivers for a course.
    pub fn teacher_hours_for(&self, teacher: TeacherIx, course: CourseIx) -> usize {
        self.entries
            .iter()
            .filter(|e| e.teacher == teacher && e.course == course)
            .count()
    }

    pub fn entries_at(&self, slot: TimeSlot) -> impl Iterator<Item = &TimetableEntry> {
        self.entries.iter().filter(move |e| e.slot == slot)
    }

    pub fn entries_of_group(&self, group: GroupIx) -> impl Iterator<Item = &TimetableEntry> {
        self.entries.iter().filter(move |e| e.group == group)
    }

    /// One line per entry.
    pub fn describe(&self, catalog: &Catalog) -> Vec<String> {
        self.entries.iter().map(|e| e.describe(catalog)).collect()
    }
}
