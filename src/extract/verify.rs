//! Independent re-check of an extracted timetable.

use super::solution::TimetableSolution;
use crate::catalog::{Catalog, CourseIx, GroupIx, RoomIx, TeacherIx, TimeSlot};
use std::collections::BTreeMap;

/// A broken timetable rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    RoomDoubleBooked { room: RoomIx, slot: TimeSlot },
    TeacherDoubleBooked { teacher: TeacherIx, slot: TimeSlot },
    GroupDoubleBooked { group: GroupIx, slot: TimeSlot },
    /// Scheduled hours of an enrollment differ from the course units.
    GroupHours {
        group: GroupIx,
        course: CourseIx,
        expected: u32,
        found: u32,
    },
    /// Hours a teacher delivers differ from their specialization units.
    TeacherHours {
        teacher: TeacherIx,
        course: CourseIx,
        expected: u32,
        found: u32,
    },
    NotEnrolled { group: GroupIx, course: CourseIx },
    UnqualifiedTeacher { teacher: TeacherIx, course: CourseIx },
    IncompatibleRoom { room: RoomIx, course: CourseIx },
    OutsideGrid { slot: TimeSlot },
}

/// Checks `solution` against the catalog and returns every violation found.
///
/// An empty result means no double booking, exact hour totals for every
/// enrollment and specialization, and only compatible rooms and qualified
/// teachers.
pub fn verify_solution(catalog: &Catalog, solution: &TimetableSolution) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut rooms: BTreeMap<(RoomIx, TimeSlot), u32> = BTreeMap::new();
    let mut teachers: BTreeMap<(TeacherIx, TimeSlot), u32> = BTreeMap::new();
    let mut groups: BTreeMap<(GroupIx, TimeSlot), u32> = BTreeMap::new();
    let mut group_hours: BTreeMap<(GroupIx, CourseIx), u32> = BTreeMap::new();
    let mut teacher_hours: BTreeMap<(TeacherIx, CourseIx), u32> = BTreeMap::new();

    for entry in solution.entries() {
        if !catalog.grid().contains(entry.slot) {
            violations.push(Violation::OutsideGrid { slot: entry.slot });
        }
        if !catalog.group(entry.group).courses.contains(&entry.course) {
            violations.push(Violation::NotEnrolled {
                group: entry.group,
                course: entry.course,
            });
        }
        if catalog.teacher(entry.teacher).specialization(entry.course).is_none() {
            violations.push(Violation::UnqualifiedTeacher {
                teacher: entry.teacher,
                course: entry.course,
            });
        }
        if catalog.room(entry.room).kind != catalog.course(entry.course).kind {
            violations.push(Violation::IncompatibleRoom {
                room: entry.room,
                course: entry.course,
            });
        }

        *rooms.entry((entry.room, entry.slot)).or_default() += 1;
        *teachers.entry((entry.teacher, entry.slot)).or_default() += 1;
        *groups.entry((entry.group, entry.slot)).or_default() += 1;
        *group_hours.entry((entry.group, entry.course)).or_default() += 1;
        *teacher_hours.entry((entry.teacher, entry.course)).or_default() += 1;
    }

    violations.extend(
        rooms
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|((room, slot), _)| Violation::RoomDoubleBooked { room, slot }),
    );
    violations.extend(
        teachers
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|((teacher, slot), _)| Violation::TeacherDoubleBooked { teacher, slot }),
    );
    violations.extend(
        groups
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|((group, slot), _)| Violation::GroupDoubleBooked { group, slot }),
    );

    for (g, group) in catalog.groups() {
        for &c in &group.courses {
            let expected = catalog.course(c).units;
            let found = group_hours.get(&(g, c)).copied().unwrap_or(0);
            if found != expected {
                violations.push(Violation::GroupHours {
                    group: g,
                    course: c,
                    expected,
                    found,
                });
            }
        }
    }
    for (t, teacher) in catalog.teachers() {
        for spec in &teacher.specializations {
            let found = teacher_hours.get(&(t, spec.course)).copied().unwrap_or(0);
            if found != spec.units {
                violations.push(Violation::TeacherHours {
                    teacher: t,
                    course: spec.course,
                    expected: spec.units,
                    found,
                });
            }
        }
    }

    violations
}
