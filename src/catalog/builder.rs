//! Validating construction of a [`Catalog`] from raw records.

use super::grid::TimeGrid;
use super::records::{CourseRecord, GroupRecord, RoomRecord, TeacherRecord};
use super::tables::Catalog;
use super::types::{
    Course, CourseIx, CourseKind, GroupIx, Room, RoomIx, Specialization, StudentGroup, Teacher,
    TeacherIx,
};
use crate::error::CatalogError;
use std::collections::{BTreeMap, HashMap, HashSet};

/// What to do with a specialization whose course code is not in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DanglingPolicy {
    /// Fail with [`CatalogError::DanglingSpecialization`].
    #[default]
    Reject,
    /// Drop the specialization and log a warning.
    Ignore,
}

/// Collects raw records and validates them into a [`Catalog`].
///
/// Courses are registered from the standalone course table first, then from
/// group enrollments in order; the same code seen twice must carry the same
/// units and type.
///
/// # Examples
///
/// ```
/// use u_timetable::catalog::{CatalogBuilder, CourseRecord, GroupRecord, RoomRecord, TeacherRecord, TimeGrid};
///
/// let intro = CourseRecord::new("CS 2101", "Introduction to Computer Science", "3", "lec");
/// let catalog = CatalogBuilder::new(TimeGrid::new(5, 8, 20))
///     .with_group(GroupRecord::new("1", "BSCS", "2", "1", "D").with_course(intro.clone()))
///     .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(intro))
///     .with_room(RoomRecord::new("1", "Classroom A", "lec"))
///     .build()
///     .unwrap();
///
/// assert_eq!(catalog.course_count(), 1);
/// assert_eq!(catalog.enrollment_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    grid: TimeGrid,
    courses: Vec<CourseRecord>,
    groups: Vec<GroupRecord>,
    teachers: Vec<TeacherRecord>,
    rooms: Vec<RoomRecord>,
    dangling: DanglingPolicy,
}

impl CatalogBuilder {
    pub fn new(grid: TimeGrid) -> Self {
        Self {
            grid,
            ..Self::default()
        }
    }

    /// Adds a course to the standalone course table.
    pub fn with_course(mut self, course: CourseRecord) -> Self {
        self.courses.push(course);
        self
    }

    pub fn with_group(mut self, group: GroupRecord) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_teacher(mut self, teacher: TeacherRecord) -> Self {
        self.teachers.push(teacher);
        self
    }

    pub fn with_room(mut self, room: RoomRecord) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn with_groups(mut self, groups: impl IntoIterator<Item = GroupRecord>) -> Self {
        self.groups.extend(groups);
        self
    }

    pub fn with_teachers(mut self, teachers: impl IntoIterator<Item = TeacherRecord>) -> Self {
        self.teachers.extend(teachers);
        self
    }

    pub fn with_rooms(mut self, rooms: impl IntoIterator<Item = RoomRecord>) -> Self {
        self.rooms.extend(rooms);
        self
    }

    pub fn with_dangling_policy(mut self, policy: DanglingPolicy) -> Self {
        self.dangling = policy;
        self
    }

    /// Validates every record and builds the catalog, failing on the first
    /// rejected record.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        self.grid.validate()?;

        let mut courses: Vec<Course> = Vec::new();
        let mut course_index: HashMap<String, CourseIx> = HashMap::new();

        for record in &self.courses {
            register_course(record, &mut courses, &mut course_index)?;
        }

        let mut groups = Vec::with_capacity(self.groups.len());
        let mut group_ids = HashSet::new();
        for record in &self.groups {
            require("student group", "id", &record.id)?;
            require("student group", "program", &record.program)?;
            if !group_ids.insert(record.id.as_str()) {
                return Err(CatalogError::DuplicateGroup {
                    id: record.id.clone(),
                });
            }

            let mut enrolled = Vec::with_capacity(record.courses.len());
            for course in &record.courses {
                let ix = register_course(course, &mut courses, &mut course_index)?;
                if enrolled.contains(&ix) {
                    return Err(CatalogError::DuplicateEnrollment {
                        group: record.id.clone(),
                        code: course.code.clone(),
                    });
                }
                enrolled.push(ix);
            }

            groups.push(StudentGroup {
                id: record.id.clone(),
                program: record.program.clone(),
                year: record.year.clone(),
                semester: record.semester.clone(),
                block: record.block.clone(),
                courses: enrolled,
            });
        }

        let mut teachers = Vec::with_capacity(self.teachers.len());
        let mut teacher_ids = HashSet::new();
        for record in &self.teachers {
            require("teacher", "id", &record.id)?;
            if !teacher_ids.insert(record.id.as_str()) {
                return Err(CatalogError::DuplicateTeacher {
                    id: record.id.clone(),
                });
            }

            let mut specializations: Vec<Specialization> = Vec::new();
            for spec in &record.specialized {
                let units = parse_units(spec)?;
                let Some(&course) = course_index.get(spec.code.trim()) else {
                    match self.dangling {
                        DanglingPolicy::Reject => {
                            return Err(CatalogError::DanglingSpecialization {
                                teacher: record.id.clone(),
                                code: spec.code.clone(),
                            })
                        }
                        DanglingPolicy::Ignore => {
                            log::warn!(
                                "ignoring specialization '{}' of teacher '{}': unknown course",
                                spec.code,
                                record.id
                            );
                            continue;
                        }
                    }
                };

                let expected = &courses[course.0].kind;
                let found = CourseKind::parse(&spec.kind);
                if &found != expected {
                    return Err(CatalogError::SpecializationKindMismatch {
                        teacher: record.id.clone(),
                        code: spec.code.clone(),
                        expected: expected.to_string(),
                        found: found.to_string(),
                    });
                }
                if specializations.iter().any(|s| s.course == course) {
                    return Err(CatalogError::DuplicateSpecialization {
                        teacher: record.id.clone(),
                        code: spec.code.clone(),
                    });
                }
                specializations.push(Specialization { course, units });
            }

            teachers.push(Teacher {
                id: record.id.clone(),
                name: record.name.clone(),
                specializations,
            });
        }

        let mut rooms = Vec::with_capacity(self.rooms.len());
        let mut room_ids = HashSet::new();
        for record in &self.rooms {
            require("room", "id", &record.id)?;
            require("room", "type", &record.kind)?;
            if !room_ids.insert(record.id.as_str()) {
                return Err(CatalogError::DuplicateRoom {
                    id: record.id.clone(),
                });
            }
            rooms.push(Room {
                id: record.id.clone(),
                name: record.name.clone(),
                kind: CourseKind::parse(&record.kind),
            });
        }

        let mut rooms_by_kind: BTreeMap<CourseKind, Vec<RoomIx>> = BTreeMap::new();
        for (i, room) in rooms.iter().enumerate() {
            rooms_by_kind.entry(room.kind.clone()).or_default().push(RoomIx(i));
        }

        let mut qualified = vec![Vec::new(); courses.len()];
        for (t, teacher) in teachers.iter().enumerate() {
            for spec in &teacher.specializations {
                qualified[spec.course.0].push(TeacherIx(t));
            }
        }

        let mut enrolled = vec![Vec::new(); courses.len()];
        for (g, group) in groups.iter().enumerate() {
            for course in &group.courses {
                enrolled[course.0].push(GroupIx(g));
            }
        }

        log::debug!(
            "catalog: {} groups, {} courses, {} teachers, {} rooms, {} slots",
            groups.len(),
            courses.len(),
            teachers.len(),
            rooms.len(),
            self.grid.slot_count()
        );

        Ok(Catalog {
            grid: self.grid,
            courses,
            groups,
            teachers,
            rooms,
            course_index,
            rooms_by_kind,
            qualified,
            enrolled,
        })
    }
}

fn require(entity: &'static str, field: &'static str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        Err(CatalogError::EmptyField { entity, field })
    } else {
        Ok(())
    }
}

fn parse_units(record: &CourseRecord) -> Result<u32, CatalogError> {
    match record.units.trim().parse::<u32>() {
        Ok(units) if units > 0 => Ok(units),
        _ => Err(CatalogError::InvalidUnits {
            code: record.code.clone(),
            value: record.units.clone(),
        }),
    }
}

/// Returns the index of the course, registering it on first sight.
fn register_course(
    record: &CourseRecord,
    courses: &mut Vec<Course>,
    index: &mut HashMap<String, CourseIx>,
) -> Result<CourseIx, CatalogError> {
    require("course", "code", &record.code)?;
    require("course", "type", &record.kind)?;
    let units = parse_units(record)?;
    let kind = CourseKind::parse(&record.kind);
    let code = record.code.trim();

    if let Some(&ix) = index.get(code) {
        let known = &courses[ix.0];
        if known.units != units || known.kind != kind {
            return Err(CatalogError::ConflictingCourse {
                code: code.to_string(),
            });
        }
        return Ok(ix);
    }

    let ix = CourseIx(courses.len());
    courses.push(Course {
        code: code.to_string(),
        description: record.description.clone(),
        units,
        kind,
    });
    index.insert(code.to_string(), ix);
    Ok(ix)
}
