//! Variable space construction.

use super::keys::{GroupVarKey, JointVarKey, TeacherVarKey, VarOrigin};
use crate::catalog::{Catalog, CourseIx, GroupIx, RoomIx, TeacherIx, TimeSlot};
use crate::cp::{BoolVar, VarId};
use std::collections::BTreeMap;

/// Every legal decision variable of a catalog, with keyed lookups.
///
/// Only compatible tuples are materialized: a room appears only for courses
/// of its type and a teacher only for courses they specialize in. Lookups
/// return `None` for tuples that have no variable, so callers must handle
/// absence explicitly instead of reading a silent zero.
///
/// Construction is deterministic: variables are numbered in catalog order
/// (group, course, slot, room; then teacher, specialization, slot, room;
/// then group, course, teacher, slot, room), so the same catalog always
/// yields the same numbering.
#[derive(Debug, Clone)]
pub struct VariableSpace {
    variables: Vec<BoolVar>,
    origins: Vec<VarOrigin>,
    group_vars: BTreeMap<GroupVarKey, VarId>,
    teacher_vars: BTreeMap<TeacherVarKey, VarId>,
    joint_vars: BTreeMap<JointVarKey, VarId>,
    by_enrollment: BTreeMap<(GroupIx, CourseIx), Vec<VarId>>,
    by_specialization: BTreeMap<(TeacherIx, CourseIx), Vec<VarId>>,
    joint_by_group_key: BTreeMap<GroupVarKey, Vec<VarId>>,
    joint_by_teacher_key: BTreeMap<TeacherVarKey, Vec<VarId>>,
    by_group_slot: BTreeMap<(GroupIx, TimeSlot), Vec<VarId>>,
    by_teacher_slot: BTreeMap<(TeacherIx, TimeSlot), Vec<VarId>>,
    by_room_slot: BTreeMap<(RoomIx, TimeSlot), Vec<VarId>>,
}

impl VariableSpace {
    /// Builds the variable space of `catalog`.
    pub fn build(catalog: &Catalog) -> Self {
        let mut space = Self {
            variables: Vec::new(),
            origins: Vec::new(),
            group_vars: BTreeMap::new(),
            teacher_vars: BTreeMap::new(),
            joint_vars: BTreeMap::new(),
            by_enrollment: BTreeMap::new(),
            by_specialization: BTreeMap::new(),
            joint_by_group_key: BTreeMap::new(),
            joint_by_teacher_key: BTreeMap::new(),
            by_group_slot: BTreeMap::new(),
            by_teacher_slot: BTreeMap::new(),
            by_room_slot: BTreeMap::new(),
        };
        let grid = catalog.grid();

        for (g, group) in catalog.groups() {
            for &c in &group.courses {
                let course = catalog.course(c);
                for slot in grid.slots() {
                    for &r in catalog.compatible_rooms(c) {
                        let key = GroupVarKey {
                            group: g,
                            course: c,
                            slot,
                            room: r,
                        };
                        let name = format!(
                            "X[{}|{}|d{}h{}|{}]",
                            group.label(),
                            course.code,
                            slot.day,
                            slot.hour,
                            catalog.room(r).name
                        );
                        let var = space.push(name, VarOrigin::Group(key));
                        space.group_vars.insert(key, var);
                        space.by_enrollment.entry((g, c)).or_default().push(var);
                        space.by_group_slot.entry((g, slot)).or_default().push(var);
                        space.by_room_slot.entry((r, slot)).or_default().push(var);
                    }
                }
            }
        }

        for (t, teacher) in catalog.teachers() {
            for spec in &teacher.specializations {
                let course = catalog.course(spec.course);
                for slot in grid.slots() {
                    for &r in catalog.compatible_rooms(spec.course) {
                        let key = TeacherVarKey {
                            teacher: t,
                            course: spec.course,
                            slot,
                            room: r,
                        };
                        let name = format!(
                            "Y[{}|{}|d{}h{}|{}]",
                            teacher.name,
                            course.code,
                            slot.day,
                            slot.hour,
                            catalog.room(r).name
                        );
                        let var = space.push(name, VarOrigin::Teacher(key));
                        space.teacher_vars.insert(key, var);
                        space
                            .by_specialization
                            .entry((t, spec.course))
                            .or_default()
                            .push(var);
                        space.by_teacher_slot.entry((t, slot)).or_default().push(var);
                    }
                }
            }
        }

        for (g, group) in catalog.groups() {
            for &c in &group.courses {
                let course = catalog.course(c);
                for &t in catalog.qualified_teachers(c) {
                    for slot in grid.slots() {
                        for &r in catalog.compatible_rooms(c) {
                            let key = JointVarKey {
                                group: g,
                                course: c,
                                teacher: t,
                                slot,
                                room: r,
                            };
                            let name = format!(
                                "W[{}|{}|{}|d{}h{}|{}]",
                                group.label(),
                                course.code,
                                catalog.teacher(t).name,
                                slot.day,
                                slot.hour,
                                catalog.room(r).name
                            );
                            let var = space.push(name, VarOrigin::Joint(key));
                            space.joint_vars.insert(key, var);
                            space
                                .joint_by_group_key
                                .entry(key.group_key())
                                .or_default()
                                .push(var);
                            space
                                .joint_by_teacher_key
                                .entry(key.teacher_key())
                                .or_default()
                                .push(var);
                        }
                    }
                }
            }
        }

        log::info!(
            "variable space: {} group, {} teacher, {} joint variables ({} total)",
            space.group_vars.len(),
            space.teacher_vars.len(),
            space.joint_vars.len(),
            space.variables.len()
        );
        space
    }

    fn push(&mut self, name: String, origin: VarOrigin) -> VarId {
        let id = VarId(self.variables.len() as u32);
        self.variables.push(BoolVar::new(name));
        self.origins.push(origin);
        id
    }

    /// All variables, indexed by [`VarId`].
    pub fn variables(&self) -> &[BoolVar] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn origin(&self, var: VarId) -> &VarOrigin {
        &self.origins[var.index()]
    }

    pub fn group_var(&self, key: &GroupVarKey) -> Option<VarId> {
        self.group_vars.get(key).copied()
    }

    pub fn teacher_var(&self, key: &TeacherVarKey) -> Option<VarId> {
        self.teacher_vars.get(key).copied()
    }

    pub fn joint_var(&self, key: &JointVarKey) -> Option<VarId> {
        self.joint_vars.get(key).copied()
    }

    /// Group occupancy variables of one enrollment, or `None` when the
    /// course has no compatible room.
    pub fn enrollment_vars(&self, group: GroupIx, course: CourseIx) -> Option<&[VarId]> {
        self.by_enrollment.get(&(group, course)).map(Vec::as_slice)
    }

    /// Teacher occupancy variables of one specialization, or `None` when the
    /// course has no compatible room.
    pub fn specialization_vars(&self, teacher: TeacherIx, course: CourseIx) -> Option<&[VarId]> {
        self.by_specialization
            .get(&(teacher, course))
            .map(Vec::as_slice)
    }

    /// Joint assignments realizing a group occupancy, one per qualified teacher.
    pub fn joint_for_group(&self, key: &GroupVarKey) -> Option<&[VarId]> {
        self.joint_by_group_key.get(key).map(Vec::as_slice)
    }

    /// Joint assignments realizing a teacher occupancy, one per enrolled group.
    pub fn joint_for_teacher(&self, key: &TeacherVarKey) -> Option<&[VarId]> {
        self.joint_by_teacher_key.get(key).map(Vec::as_slice)
    }

    /// Group occupancy variables of `group` at `slot` (every course and room).
    pub fn group_slot_vars(&self, group: GroupIx, slot: TimeSlot) -> Option<&[VarId]> {
        self.by_group_slot.get(&(group, slot)).map(Vec::as_slice)
    }

    /// Teacher occupancy variables of `teacher` at `slot`.
    pub fn teacher_slot_vars(&self, teacher: TeacherIx, slot: TimeSlot) -> Option<&[VarId]> {
        self.by_teacher_slot.get(&(teacher, slot)).map(Vec::as_slice)
    }

    /// Group occupancy variables hosted in `room` at `slot`.
    pub fn room_slot_vars(&self, room: RoomIx, slot: TimeSlot) -> Option<&[VarId]> {
        self.by_room_slot.get(&(room, slot)).map(Vec::as_slice)
    }

    pub fn group_keys(&self) -> impl Iterator<Item = (&GroupVarKey, VarId)> {
        self.group_vars.iter().map(|(k, &v)| (k, v))
    }

    pub fn teacher_keys(&self) -> impl Iterator<Item = (&TeacherVarKey, VarId)> {
        self.teacher_vars.iter().map(|(k, &v)| (k, v))
    }

    /// Joint assignments in key order. This is the projection that fully
    /// determines a timetable.
    pub fn joint_keys(&self) -> impl Iterator<Item = (&JointVarKey, VarId)> {
        self.joint_vars.iter().map(|(k, &v)| (k, v))
    }

    pub fn group_var_count(&self) -> usize {
        self.group_vars.len()
    }

    pub fn teacher_var_count(&self) -> usize {
        self.teacher_vars.len()
    }

    pub fn joint_var_count(&self) -> usize {
        self.joint_vars.len()
    }
}
