//! The validated, read-only entity catalog.

use super::grid::TimeGrid;
use super::types::{
    Course, CourseIx, CourseKind, GroupIx, Room, RoomIx, StudentGroup, Teacher, TeacherIx,
};
use std::collections::{BTreeMap, HashMap};

/// Normalized programs, courses, teachers, rooms and the time grid.
///
/// Built once by [`CatalogBuilder`](super::CatalogBuilder) and immutable for
/// the run. Every cross reference is a typed index that is guaranteed to be
/// in range.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub(super) grid: TimeGrid,
    pub(super) courses: Vec<Course>,
    pub(super) groups: Vec<StudentGroup>,
    pub(super) teachers: Vec<Teacher>,
    pub(super) rooms: Vec<Room>,
    pub(super) course_index: HashMap<String, CourseIx>,
    pub(super) rooms_by_kind: BTreeMap<CourseKind, Vec<RoomIx>>,
    pub(super) qualified: Vec<Vec<TeacherIx>>,
    pub(super) enrolled: Vec<Vec<GroupIx>>,
}

impl Catalog {
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn courses(&self) -> impl ExactSizeIterator<Item = (CourseIx, &Course)> {
        self.courses.iter().enumerate().map(|(i, c)| (CourseIx(i), c))
    }

    pub fn groups(&self) -> impl ExactSizeIterator<Item = (GroupIx, &StudentGroup)> {
        self.groups.iter().enumerate().map(|(i, g)| (GroupIx(i), g))
    }

    pub fn teachers(&self) -> impl ExactSizeIterator<Item = (TeacherIx, &Teacher)> {
        self.teachers.iter().enumerate().map(|(i, t)| (TeacherIx(i), t))
    }

    pub fn rooms(&self) -> impl ExactSizeIterator<Item = (RoomIx, &Room)> {
        self.rooms.iter().enumerate().map(|(i, r)| (RoomIx(i), r))
    }

    pub fn course(&self, ix: CourseIx) -> &Course {
        &self.courses[ix.0]
    }

    pub fn group(&self, ix: GroupIx) -> &StudentGroup {
        &self.groups[ix.0]
    }

    pub fn teacher(&self, ix: TeacherIx) -> &Teacher {
        &self.teachers[ix.0]
    }

    pub fn room(&self, ix: RoomIx) -> &Room {
        &self.rooms[ix.0]
    }

    pub fn course_by_code(&self, code: &str) -> Option<CourseIx> {
        self.course_index.get(code).copied()
    }

    pub fn group_by_id(&self, id: &str) -> Option<GroupIx> {
        self.groups.iter().position(|g| g.id == id).map(GroupIx)
    }

    pub fn teacher_by_id(&self, id: &str) -> Option<TeacherIx> {
        self.teachers.iter().position(|t| t.id == id).map(TeacherIx)
    }

    pub fn room_by_id(&self, id: &str) -> Option<RoomIx> {
        self.rooms.iter().position(|r| r.id == id).map(RoomIx)
    }

    /// Rooms whose type equals `kind`, in catalog order.
    pub fn rooms_of_kind(&self, kind: &CourseKind) -> &[RoomIx] {
        self.rooms_by_kind
            .get(kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rooms able to host `course`.
    pub fn compatible_rooms(&self, course: CourseIx) -> &[RoomIx] {
        self.rooms_of_kind(&self.course(course).kind)
    }

    /// Teachers with a specialization for `course`, in catalog order.
    pub fn qualified_teachers(&self, course: CourseIx) -> &[TeacherIx] {
        &self.qualified[course.0]
    }

    /// Groups enrolled in `course`, in catalog order.
    pub fn enrolled_groups(&self, course: CourseIx) -> &[GroupIx] {
        &self.enrolled[course.0]
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn teacher_count(&self) -> usize {
        self.teachers.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of (student group, enrolled course) pairs.
    pub fn enrollment_count(&self) -> usize {
        self.groups.iter().map(|g| g.courses.len()).sum()
    }

    /// Number of (teacher, specialization) pairs.
    pub fn specialization_count(&self) -> usize {
        self.teachers.iter().map(|t| t.specializations.len()).sum()
    }
}
