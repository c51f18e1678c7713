//! Constraint family builders.
//!
//! Each builder reads the catalog and variable space and returns the
//! constraints of one family. Builders are independent of each other so they
//! can run in any order (or concurrently) and be merged afterwards.

use super::config::AssemblyConfig;
use super::rest_day::RestDayPlan;
use crate::catalog::{Catalog, GroupIx, TeacherIx, TimeSlot};
use crate::cp::{Comparison, Constraint, ConstraintFamily, Term, VarId};
use crate::error::StructuralIssue;
use crate::space::VariableSpace;

/// Shared read-only inputs of every family builder.
pub(super) struct FamilyContext<'a> {
    pub catalog: &'a Catalog,
    pub space: &'a VariableSpace,
    pub config: &'a AssemblyConfig,
    pub rest_days: &'a RestDayPlan,
}

pub(super) type FamilyOutput = Result<Vec<Constraint>, Vec<StructuralIssue>>;
pub(super) type FamilyBuilder = fn(&FamilyContext<'_>) -> FamilyOutput;

/// Family builders in merge order.
pub(super) const FAMILIES: [(ConstraintFamily, FamilyBuilder); 8] = [
    (ConstraintFamily::UnitTotal, unit_totals),
    (ConstraintFamily::Linking, linking),
    (ConstraintFamily::RoomConflict, room_conflicts),
    (ConstraintFamily::GroupConflict, group_conflicts),
    (ConstraintFamily::TeacherConflict, teacher_conflicts),
    (ConstraintFamily::RestDay, rest_days),
    (ConstraintFamily::ContinuousRun, continuous_runs),
    (ConstraintFamily::DailyLoad, daily_loads),
];

fn unit_sum(vars: &[VarId]) -> Vec<Term> {
    vars.iter().copied().map(Term::unit).collect()
}

/// `Σ vars ≤ cap`, or `None` when the bound cannot bind.
fn at_most(
    family: ConstraintFamily,
    label: impl FnOnce() -> String,
    vars: &[VarId],
    cap: u32,
) -> Option<Constraint> {
    if vars.len() as u64 <= u64::from(cap) {
        return None;
    }
    Some(Constraint {
        family,
        label: label(),
        terms: unit_sum(vars),
        cmp: Comparison::Le,
        rhs: i64::from(cap),
    })
}

/// Whose occupancy a per-entity rule constrains.
#[derive(Clone, Copy)]
enum Occupant {
    Group(GroupIx),
    Teacher(TeacherIx),
}

impl Occupant {
    fn all(catalog: &Catalog) -> impl Iterator<Item = Occupant> + '_ {
        catalog
            .groups()
            .map(|(g, _)| Occupant::Group(g))
            .chain(catalog.teachers().map(|(t, _)| Occupant::Teacher(t)))
    }

    fn label(self, catalog: &Catalog) -> String {
        match self {
            Occupant::Group(g) => format!("group {}", catalog.group(g).label()),
            Occupant::Teacher(t) => format!("teacher {}", catalog.teacher(t).name),
        }
    }

    fn rest_day(self, plan: &RestDayPlan) -> Option<u32> {
        match self {
            Occupant::Group(g) => plan.group(g),
            Occupant::Teacher(t) => plan.teacher(t),
        }
    }

    fn slot_vars(self, space: &VariableSpace, slot: TimeSlot) -> &[VarId] {
        let vars = match self {
            Occupant::Group(g) => space.group_slot_vars(g, slot),
            Occupant::Teacher(t) => space.teacher_slot_vars(t, slot),
        };
        vars.unwrap_or(&[])
    }

    /// Occupancy variables over `hours` of `day`.
    fn window_vars(
        self,
        space: &VariableSpace,
        day: u32,
        hours: impl Iterator<Item = u32>,
    ) -> Vec<VarId> {
        hours
            .flat_map(|hour| self.slot_vars(space, TimeSlot::new(day, hour)).iter().copied())
            .collect()
    }
}

/// Exact weekly hours per enrollment and per specialization.
///
/// Also the place where structural infeasibility surfaces: an enrollment
/// without candidate variables, without a qualified teacher, or a course whose
/// enrolled demand differs from the hours its teachers offer.
fn unit_totals(ctx: &FamilyContext<'_>) -> FamilyOutput {
    let catalog = ctx.catalog;
    let mut constraints = Vec::new();
    let mut issues = Vec::new();

    for (g, group) in catalog.groups() {
        for &c in &group.courses {
            let course = catalog.course(c);
            let Some(vars) = ctx.space.enrollment_vars(g, c) else {
                issues.push(StructuralIssue::NoCompatibleRoom {
                    group: group.label(),
                    course: course.code.clone(),
                    kind: course.kind.to_string(),
                });
                continue;
            };
            if catalog.qualified_teachers(c).is_empty() {
                issues.push(StructuralIssue::NoQualifiedTeacher {
                    group: group.label(),
                    course: course.code.clone(),
                });
            }
            constraints.push(Constraint {
                family: ConstraintFamily::UnitTotal,
                label: format!("group {} course {}", group.label(), course.code),
                terms: unit_sum(vars),
                cmp: Comparison::Eq,
                rhs: i64::from(course.units),
            });
        }
    }

    for (t, teacher) in catalog.teachers() {
        for spec in &teacher.specializations {
            // roomless courses surface as NoCompatibleRoom or UnitMismatch below
            let Some(vars) = ctx.space.specialization_vars(t, spec.course) else {
                continue;
            };
            constraints.push(Constraint {
                family: ConstraintFamily::UnitTotal,
                label: format!(
                    "teacher {} course {}",
                    teacher.name,
                    catalog.course(spec.course).code
                ),
                terms: unit_sum(vars),
                cmp: Comparison::Eq,
                rhs: i64::from(spec.units),
            });
        }
    }

    for (c, course) in catalog.courses() {
        let groups = catalog.enrolled_groups(c);
        let teachers = catalog.qualified_teachers(c);
        if !groups.is_empty() && teachers.is_empty() {
            continue;
        }
        let demanded = groups.len() as u64 * u64::from(course.units);
        let offered: u64 = teachers
            .iter()
            .filter_map(|&t| catalog.teacher(t).specialization(c))
            .map(|spec| u64::from(spec.units))
            .sum();
        if demanded != offered {
            issues.push(StructuralIssue::UnitMismatch {
                course: course.code.clone(),
                demanded,
                offered,
            });
        }
    }

    if issues.is_empty() {
        Ok(constraints)
    } else {
        Err(issues)
    }
}

/// `X = Σ_t W` and `Y = Σ_g W`.
///
/// An occupancy no joint assignment can realize is pinned to zero.
fn linking(ctx: &FamilyContext<'_>) -> FamilyOutput {
    let space = ctx.space;
    let mut constraints =
        Vec::with_capacity(space.group_var_count() + space.teacher_var_count());

    for (key, x) in space.group_keys() {
        let mut terms = vec![Term::unit(x)];
        if let Some(joint) = space.joint_for_group(key) {
            terms.extend(joint.iter().map(|&w| Term::new(w, -1)));
        }
        constraints.push(Constraint {
            family: ConstraintFamily::Linking,
            label: space.variables()[x.index()].name.clone(),
            terms,
            cmp: Comparison::Eq,
            rhs: 0,
        });
    }

    for (key, y) in space.teacher_keys() {
        let mut terms = vec![Term::unit(y)];
        if let Some(joint) = space.joint_for_teacher(key) {
            terms.extend(joint.iter().map(|&w| Term::new(w, -1)));
        }
        constraints.push(Constraint {
            family: ConstraintFamily::Linking,
            label: space.variables()[y.index()].name.clone(),
            terms,
            cmp: Comparison::Eq,
            rhs: 0,
        });
    }

    Ok(constraints)
}

fn room_conflicts(ctx: &FamilyContext<'_>) -> FamilyOutput {
    let catalog = ctx.catalog;
    let mut constraints = Vec::new();
    for (r, room) in catalog.rooms() {
        for slot in catalog.grid().slots() {
            let Some(vars) = ctx.space.room_slot_vars(r, slot) else {
                continue;
            };
            constraints.extend(at_most(
                ConstraintFamily::RoomConflict,
                || format!("room {} d{} h{}", room.name, slot.day, slot.hour),
                vars,
                1,
            ));
        }
    }
    Ok(constraints)
}

fn group_conflicts(ctx: &FamilyContext<'_>) -> FamilyOutput {
    let catalog = ctx.catalog;
    let mut constraints = Vec::new();
    for (g, group) in catalog.groups() {
        for slot in catalog.grid().slots() {
            let Some(vars) = ctx.space.group_slot_vars(g, slot) else {
                continue;
            };
            constraints.extend(at_most(
                ConstraintFamily::GroupConflict,
                || format!("group {} d{} h{}", group.label(), slot.day, slot.hour),
                vars,
                1,
            ));
        }
    }
    Ok(constraints)
}

fn teacher_conflicts(ctx: &FamilyContext<'_>) -> FamilyOutput {
    let catalog = ctx.catalog;
    let mut constraints = Vec::new();
    for (t, teacher) in catalog.teachers() {
        for slot in catalog.grid().slots() {
            let Some(vars) = ctx.space.teacher_slot_vars(t, slot) else {
                continue;
            };
            constraints.extend(at_most(
                ConstraintFamily::TeacherConflict,
                || format!("teacher {} d{} h{}", teacher.name, slot.day, slot.hour),
                vars,
                1,
            ));
        }
    }
    Ok(constraints)
}

/// No occupancy on an entity's rest day.
fn rest_days(ctx: &FamilyContext<'_>) -> FamilyOutput {
    let grid = ctx.catalog.grid();
    let mut constraints = Vec::new();
    for occupant in Occupant::all(ctx.catalog) {
        let Some(day) = occupant.rest_day(ctx.rest_days) else {
            continue;
        };
        let vars = occupant.window_vars(ctx.space, day, grid.hours());
        if vars.is_empty() {
            continue;
        }
        constraints.push(Constraint {
            family: ConstraintFamily::RestDay,
            label: format!("{} rests d{}", occupant.label(ctx.catalog), day),
            terms: unit_sum(&vars),
            cmp: Comparison::Eq,
            rhs: 0,
        });
    }
    Ok(constraints)
}

/// Every window of `k + 1` consecutive hours holds at most `k` classes.
fn continuous_runs(ctx: &FamilyContext<'_>) -> FamilyOutput {
    let Some(k) = ctx.config.max_continuous_hours else {
        return Ok(Vec::new());
    };
    let grid = ctx.catalog.grid();
    let span = k + 1;
    if span > grid.hours_per_day() {
        return Ok(Vec::new());
    }

    let mut constraints = Vec::new();
    for occupant in Occupant::all(ctx.catalog) {
        let rest = occupant.rest_day(ctx.rest_days);
        for day in grid.days().filter(|&d| Some(d) != rest) {
            for start in grid.hour_start..=grid.hour_end - span {
                let vars = occupant.window_vars(ctx.space, day, start..start + span);
                constraints.extend(at_most(
                    ConstraintFamily::ContinuousRun,
                    || {
                        format!(
                            "{} d{} h{}..h{}",
                            occupant.label(ctx.catalog),
                            day,
                            start,
                            start + span
                        )
                    },
                    &vars,
                    k,
                ));
            }
        }
    }
    Ok(constraints)
}

/// Occupied hours per (entity, day) under the configured cap.
fn daily_loads(ctx: &FamilyContext<'_>) -> FamilyOutput {
    let grid = ctx.catalog.grid();
    let mut constraints = Vec::new();
    for occupant in Occupant::all(ctx.catalog) {
        let cap = match occupant {
            Occupant::Group(_) => ctx.config.max_daily_group_hours,
            Occupant::Teacher(_) => ctx.config.max_daily_teacher_hours,
        };
        let Some(cap) = cap else {
            continue;
        };
        let rest = occupant.rest_day(ctx.rest_days);
        for day in grid.days().filter(|&d| Some(d) != rest) {
            let vars = occupant.window_vars(ctx.space, day, grid.hours());
            constraints.extend(at_most(
                ConstraintFamily::DailyLoad,
                || format!("{} d{} load", occupant.label(ctx.catalog), day),
                &vars,
                cap,
            ));
        }
    }
    Ok(constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::RestDays;
    use crate::catalog::{CatalogBuilder, CourseRecord, GroupRecord, RoomRecord, TeacherRecord, TimeGrid};

    fn lecture(units: &str) -> CourseRecord {
        CourseRecord::new("CS 2101", "Introduction to Computer Science", units, "lec")
    }

    fn catalog(grid: TimeGrid) -> Catalog {
        CatalogBuilder::new(grid)
            .with_group(GroupRecord::new("1", "BSCS", "2", "1", "D").with_course(lecture("3")))
            .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(lecture("3")))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap()
    }

    fn run(catalog: &Catalog, config: &AssemblyConfig, builder: FamilyBuilder) -> FamilyOutput {
        let space = VariableSpace::build(catalog);
        let rest_days = RestDayPlan::resolve(catalog, &config.rest_days).unwrap();
        builder(&FamilyContext {
            catalog,
            space: &space,
            config,
            rest_days: &rest_days,
        })
    }

    #[test]
    fn test_unit_totals() {
        let catalog = catalog(TimeGrid::new(2, 8, 10));
        let constraints = run(&catalog, &AssemblyConfig::minimal(), unit_totals).unwrap();
        assert_eq!(constraints.len(), 2);
        for c in &constraints {
            assert_eq!(c.cmp, Comparison::Eq);
            assert_eq!(c.rhs, 3);
            assert_eq!(c.terms.len(), 4);
        }
        assert_eq!(constraints[0].label, "group BSCS-2-1-D course CS 2101");
        assert_eq!(constraints[1].label, "teacher Dr. Smith course CS 2101");
    }

    #[test]
    fn test_unit_mismatch() {
        let catalog = CatalogBuilder::new(TimeGrid::new(2, 8, 10))
            .with_group(GroupRecord::new("1", "BSCS", "2", "1", "D").with_course(lecture("3")))
            .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(lecture("3")))
            .with_teacher(TeacherRecord::new("2", "Dr. Brown").with_specialization(lecture("3")))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap();
        let issues = run(&catalog, &AssemblyConfig::minimal(), unit_totals).unwrap_err();
        assert_eq!(
            issues,
            vec![StructuralIssue::UnitMismatch {
                course: "CS 2101".into(),
                demanded: 3,
                offered: 6,
            }]
        );
    }

    #[test]
    fn test_unit_mismatch_with_large_units() {
        // 2 x 3e9 exceeds u32
        let catalog = CatalogBuilder::new(TimeGrid::new(2, 8, 10))
            .with_group(GroupRecord::new("1", "BSCS", "2", "1", "D").with_course(lecture("3000000000")))
            .with_group(GroupRecord::new("2", "BSCS", "2", "1", "E").with_course(lecture("3000000000")))
            .with_teacher(
                TeacherRecord::new("1", "Dr. Smith").with_specialization(lecture("3000000000")),
            )
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap();
        let issues = run(&catalog, &AssemblyConfig::minimal(), unit_totals).unwrap_err();
        assert_eq!(
            issues,
            vec![StructuralIssue::UnitMismatch {
                course: "CS 2101".into(),
                demanded: 6_000_000_000,
                offered: 3_000_000_000,
            }]
        );
    }

    #[test]
    fn test_no_qualified_teacher() {
        let catalog = CatalogBuilder::new(TimeGrid::new(2, 8, 10))
            .with_group(GroupRecord::new("1", "BSCS", "2", "1", "D").with_course(lecture("3")))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap();
        let issues = run(&catalog, &AssemblyConfig::minimal(), unit_totals).unwrap_err();
        assert_eq!(
            issues,
            vec![StructuralIssue::NoQualifiedTeacher {
                group: "BSCS-2-1-D".into(),
                course: "CS 2101".into(),
            }]
        );
    }

    #[test]
    fn test_linking_pins_unrealizable_occupancy() {
        // teacher specialized in a course nobody takes: Y has no joint partner
        let extra = CourseRecord::new("CS 3101", "Automata", "2", "lec");
        let catalog = CatalogBuilder::new(TimeGrid::new(1, 8, 9))
            .with_course(extra.clone())
            .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(extra))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap();
        let constraints = run(&catalog, &AssemblyConfig::minimal(), linking).unwrap();
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].terms.len(), 1);
        assert_eq!(constraints[0].rhs, 0);
    }

    #[test]
    fn test_linking_shape() {
        let catalog = catalog(TimeGrid::new(1, 8, 10));
        let constraints = run(&catalog, &AssemblyConfig::minimal(), linking).unwrap();
        // 2 X + 2 Y, each linked to exactly one W
        assert_eq!(constraints.len(), 4);
        for c in &constraints {
            assert_eq!(c.terms.len(), 2);
            assert_eq!(c.terms[0].coeff, 1);
            assert_eq!(c.terms[1].coeff, -1);
        }
    }

    #[test]
    fn test_conflicts_skip_single_candidates() {
        let catalog = catalog(TimeGrid::new(1, 8, 10));
        let config = AssemblyConfig::minimal();
        // one candidate per slot everywhere: nothing can double-book
        assert!(run(&catalog, &config, room_conflicts).unwrap().is_empty());
        assert!(run(&catalog, &config, group_conflicts).unwrap().is_empty());
        assert!(run(&catalog, &config, teacher_conflicts).unwrap().is_empty());
    }

    #[test]
    fn test_room_conflicts() {
        let catalog = CatalogBuilder::new(TimeGrid::new(1, 8, 10))
            .with_group(GroupRecord::new("1", "BSCS", "1", "1", "A").with_course(lecture("1")))
            .with_group(GroupRecord::new("2", "BSCS", "1", "1", "B").with_course(lecture("1")))
            .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(lecture("2")))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap();
        let constraints = run(&catalog, &AssemblyConfig::minimal(), room_conflicts).unwrap();
        assert_eq!(constraints.len(), 2);
        assert_eq!(constraints[0].label, "room Classroom A d0 h8");
        assert_eq!(constraints[0].terms.len(), 2);
        assert_eq!(constraints[0].rhs, 1);
    }

    #[test]
    fn test_rest_days() {
        let catalog = catalog(TimeGrid::new(3, 8, 10));
        let config = AssemblyConfig::minimal().with_rest_days(RestDays::Fixed(1));
        let constraints = run(&catalog, &config, rest_days).unwrap();
        // one group and one teacher, two hours each
        assert_eq!(constraints.len(), 2);
        for c in &constraints {
            assert_eq!(c.terms.len(), 2);
            assert_eq!(c.cmp, Comparison::Eq);
            assert_eq!(c.rhs, 0);
        }
        assert_eq!(constraints[0].label, "group BSCS-2-1-D rests d1");
    }

    #[test]
    fn test_continuous_runs() {
        let catalog = catalog(TimeGrid::new(1, 8, 13));
        let config = AssemblyConfig::minimal().with_max_continuous_hours(2);
        let constraints = run(&catalog, &config, continuous_runs).unwrap();
        // windows of 3 over 5 hours: 3 per entity
        assert_eq!(constraints.len(), 6);
        for c in &constraints {
            assert_eq!(c.terms.len(), 3);
            assert_eq!(c.rhs, 2);
        }
        assert_eq!(constraints[0].label, "group BSCS-2-1-D d0 h8..h11");
    }

    #[test]
    fn test_continuous_runs_skip_rest_day_and_short_days() {
        let catalog = catalog(TimeGrid::new(2, 8, 10));
        let config = AssemblyConfig::minimal()
            .with_max_continuous_hours(3)
            .with_rest_days(RestDays::Fixed(0));
        assert!(run(&catalog, &config, continuous_runs).unwrap().is_empty());

        let config = AssemblyConfig::minimal()
            .with_max_continuous_hours(1)
            .with_rest_days(RestDays::Fixed(0));
        let constraints = run(&catalog, &config, continuous_runs).unwrap();
        assert_eq!(constraints.len(), 2);
        assert!(constraints.iter().all(|c| c.label.contains("d1")));
    }

    #[test]
    fn test_daily_loads() {
        let catalog = catalog(TimeGrid::new(2, 8, 12));
        let config = AssemblyConfig::minimal()
            .with_max_daily_group_hours(2)
            .with_max_daily_teacher_hours(4);
        let constraints = run(&catalog, &config, daily_loads).unwrap();
        // group cap binds on both days, teacher cap equals the day length
        assert_eq!(constraints.len(), 2);
        assert!(constraints.iter().all(|c| c.rhs == 2 && c.terms.len() == 4));
    }
}
