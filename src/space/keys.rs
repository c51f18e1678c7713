//! Composite keys identifying decision variables.

use crate::catalog::{CourseIx, GroupIx, RoomIx, TeacherIx, TimeSlot};

/// Group occupancy: group `group` attends `course` in `room` at `slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupVarKey {
    pub group: GroupIx,
    pub course: CourseIx,
    pub slot: TimeSlot,
    pub room: RoomIx,
}

/// Teacher occupancy: `teacher` teaches `course` in `room` at `slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TeacherVarKey {
    pub teacher: TeacherIx,
    pub course: CourseIx,
    pub slot: TimeSlot,
    pub room: RoomIx,
}

/// Joint assignment: one full (group, course, teacher, room, slot) decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JointVarKey {
    pub group: GroupIx,
    pub course: CourseIx,
    pub teacher: TeacherIx,
    pub slot: TimeSlot,
    pub room: RoomIx,
}

impl JointVarKey {
    /// The group occupancy this assignment occupies.
    pub fn group_key(&self) -> GroupVarKey {
        GroupVarKey {
            group: self.group,
            course: self.course,
            slot: self.slot,
            room: self.room,
        }
    }

    /// The teacher occupancy this assignment occupies.
    pub fn teacher_key(&self) -> TeacherVarKey {
        TeacherVarKey {
            teacher: self.teacher,
            course: self.course,
            slot: self.slot,
            room: self.room,
        }
    }
}

/// The tuple a variable was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarOrigin {
    Group(GroupVarKey),
    Teacher(TeacherVarKey),
    Joint(JointVarKey),
}
