//! End-to-end timetabling pipeline.
//!
//! [`Scheduler`] runs catalog → variable space → constraints → solver →
//! extraction, keeping the distinct outcomes apart: structural problems and
//! invalid models are errors, while infeasibility and timeouts are verdicts
//! in [`SolveOutcome`].

use crate::assembly::{AssemblyConfig, ConstraintAssembler, TimetableModel};
use crate::catalog::Catalog;
use crate::cp::{CpSolver, SolverConfig, SolverStatus};
use crate::error::TimetableError;
use crate::extract::{
    EnumerationConfig, EnumerationResult, Enumerator, SolutionExtractor, TimetableSolution,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Verdict of a single solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(TimetableSolution),
    /// Proven: no timetable satisfies the model.
    Infeasible,
    /// The budget ran out before a verdict.
    Timeout,
    /// The solver stopped without a verdict.
    Unknown,
}

impl SolveOutcome {
    pub fn solution(&self) -> Option<&TimetableSolution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }
}

/// Timetabling pipeline over one catalog.
///
/// # Examples
///
/// ```
/// use u_timetable::assembly::AssemblyConfig;
/// use u_timetable::catalog::{CatalogBuilder, CourseRecord, GroupRecord, RoomRecord, TeacherRecord, TimeGrid};
/// use u_timetable::cp::{SimpleCpSolver, SolverConfig};
/// use u_timetable::scheduler::Scheduler;
///
/// let intro = CourseRecord::new("CS 2101", "Introduction to Computer Science", "2", "lec");
/// let catalog = CatalogBuilder::new(TimeGrid::new(2, 8, 11))
///     .with_group(GroupRecord::new("1", "BSCS", "2", "1", "D").with_course(intro.clone()))
///     .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(intro))
///     .with_room(RoomRecord::new("1", "Classroom A", "lec"))
///     .build()
///     .unwrap();
///
/// let scheduler = Scheduler::new(&catalog, AssemblyConfig::default());
/// let outcome = scheduler.solve(&SimpleCpSolver::new(), &SolverConfig::default()).unwrap();
/// assert_eq!(outcome.solution().unwrap().len(), 2);
/// ```
pub struct Scheduler<'a> {
    catalog: &'a Catalog,
    config: AssemblyConfig,
}

impl<'a> Scheduler<'a> {
    pub fn new(catalog: &'a Catalog, config: AssemblyConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    /// Assembles the model without solving it.
    pub fn build_model(&self) -> Result<TimetableModel, TimetableError> {
        Ok(ConstraintAssembler::new(self.catalog, self.config.clone()).assemble()?)
    }

    /// Builds the model and asks `solver` for one timetable.
    pub fn solve<S: CpSolver + ?Sized>(
        &self,
        solver: &S,
        config: &SolverConfig,
    ) -> Result<SolveOutcome, TimetableError> {
        let model = self.build_model()?;
        self.solve_model(&model, solver, config)
    }

    /// Asks `solver` for one timetable of an already assembled model.
    pub fn solve_model<S: CpSolver + ?Sized>(
        &self,
        model: &TimetableModel,
        solver: &S,
        config: &SolverConfig,
    ) -> Result<SolveOutcome, TimetableError> {
        let raw = solver.solve(model.cp(), config);
        log::debug!(
            "solve: {} in {} ms ({} nodes)",
            raw.status,
            raw.solve_time_ms,
            raw.nodes
        );
        match raw.status {
            SolverStatus::Optimal | SolverStatus::Feasible => {
                let solution = SolutionExtractor::new(model).extract(&raw)?;
                Ok(SolveOutcome::Solved(solution))
            }
            SolverStatus::Infeasible => Ok(SolveOutcome::Infeasible),
            SolverStatus::Timeout => Ok(SolveOutcome::Timeout),
            SolverStatus::Unknown => Ok(SolveOutcome::Unknown),
            SolverStatus::ModelInvalid => Err(TimetableError::InvalidModel(format!(
                "solver rejected model '{}'",
                model.cp().name
            ))),
        }
    }

    /// Builds the model and collects distinct timetables.
    pub fn enumerate<S: CpSolver + ?Sized>(
        &self,
        solver: &S,
        config: EnumerationConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EnumerationResult, TimetableError> {
        let model = self.build_model()?;
        model.cp().validate().map_err(TimetableError::InvalidModel)?;
        Ok(Enumerator::new(&model, solver, config).run_with_cancel(cancel)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::RestDays;
    use crate::catalog::{
        CatalogBuilder, CourseRecord, GroupIx, GroupRecord, RoomRecord, TeacherRecord, TimeGrid,
    };
    use crate::cp::{CpModel, CpSolution, SimpleCpSolver};
    use crate::error::{AssemblyError, StructuralIssue};
    use crate::extract::{verify_solution, StopReason};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn lecture(units: &str) -> CourseRecord {
        CourseRecord::new("CS 2101", "Introduction to Computer Science", units, "lec")
    }

    #[test]
    fn test_single_lecture_scenario() {
        let catalog = CatalogBuilder::new(TimeGrid::new(5, 8, 20))
            .with_group(GroupRecord::new("1", "BSCS", "2", "1", "D").with_course(lecture("3")))
            .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(lecture("3")))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap();
        let scheduler = Scheduler::new(&catalog, AssemblyConfig::default());
        let model = scheduler.build_model().unwrap();
        let outcome = scheduler
            .solve_model(&model, &SimpleCpSolver::new(), &SolverConfig::default())
            .unwrap();

        let solution = outcome.solution().unwrap();
        let course = catalog.course_by_code("CS 2101").unwrap();
        assert_eq!(solution.len(), 3);
        assert_eq!(solution.hours_for(GroupIx(0), course), 3);
        let rest = model.rest_days().group(GroupIx(0)).unwrap();
        assert!(solution.entries().iter().all(|e| e.slot.day != rest));
        assert!(verify_solution(&catalog, solution).is_empty());
    }

    #[test]
    fn test_roomless_course_scenario() {
        let pe = CourseRecord::new("PE 1", "Physical Education", "2", "gym");
        let catalog = CatalogBuilder::new(TimeGrid::new(5, 8, 20))
            .with_group(GroupRecord::new("1", "BSCS", "2", "1", "D").with_course(pe.clone()))
            .with_teacher(TeacherRecord::new("1", "Coach Cruz").with_specialization(pe))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap();

        /// Fails the test if the pipeline ever reaches the solver.
        struct Unreachable;
        impl CpSolver for Unreachable {
            fn solve(&self, _model: &CpModel, _config: &SolverConfig) -> CpSolution {
                panic!("solver invoked on a structurally infeasible catalog")
            }
        }

        let err = Scheduler::new(&catalog, AssemblyConfig::default())
            .solve(&Unreachable, &SolverConfig::default())
            .unwrap_err();
        match err {
            TimetableError::Assembly(AssemblyError::StructuralInfeasibility(issues)) => {
                assert!(matches!(
                    &issues[..],
                    [StructuralIssue::NoCompatibleRoom { course, .. }] if course == "PE 1"
                ));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_overbooked_room_scenario() {
        // 2 + 2 hours needed, one room with 3 hours
        let catalog = CatalogBuilder::new(TimeGrid::new(1, 8, 11))
            .with_group(GroupRecord::new("1", "BSCS", "1", "1", "A").with_course(lecture("2")))
            .with_group(GroupRecord::new("2", "BSCS", "1", "1", "B").with_course(lecture("2")))
            .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(lecture("2")))
            .with_teacher(TeacherRecord::new("2", "Dr. Brown").with_specialization(lecture("2")))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap();
        let outcome = Scheduler::new(&catalog, AssemblyConfig::minimal())
            .solve(&SimpleCpSolver::new(), &SolverConfig::default())
            .unwrap();
        assert_eq!(outcome, SolveOutcome::Infeasible);
    }

    #[test]
    fn test_timeout_is_distinct_from_infeasible() {
        let catalog = CatalogBuilder::new(TimeGrid::new(1, 8, 11))
            .with_group(GroupRecord::new("1", "BSCS", "1", "1", "A").with_course(lecture("2")))
            .with_group(GroupRecord::new("2", "BSCS", "1", "1", "B").with_course(lecture("2")))
            .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(lecture("4")))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap();
        let outcome = Scheduler::new(&catalog, AssemblyConfig::minimal())
            .solve(&SimpleCpSolver::new(), &SolverConfig::default().with_node_limit(0))
            .unwrap();
        assert_eq!(outcome, SolveOutcome::Timeout);
    }

    #[test]
    fn test_invalid_model_is_an_error() {
        struct Rejecting;
        impl CpSolver for Rejecting {
            fn solve(&self, _model: &CpModel, _config: &SolverConfig) -> CpSolution {
                CpSolution::empty(SolverStatus::ModelInvalid)
            }
        }
        let catalog = CatalogBuilder::new(TimeGrid::new(1, 8, 11))
            .with_group(GroupRecord::new("1", "BSCS", "1", "1", "A").with_course(lecture("1")))
            .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(lecture("1")))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap();
        let err = Scheduler::new(&catalog, AssemblyConfig::minimal())
            .solve(&Rejecting, &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, TimetableError::InvalidModel(_)));
    }

    #[test]
    fn test_round_trip_hour_totals() {
        // two groups, a lecture and a lab each, with a known feasible timetable
        let lab = CourseRecord::new("CS 2102", "Programming Fundamentals", "1", "lab");
        let catalog = CatalogBuilder::new(TimeGrid::new(2, 8, 11))
            .with_group(
                GroupRecord::new("1", "BSCS", "1", "1", "A")
                    .with_course(lecture("2"))
                    .with_course(lab.clone()),
            )
            .with_group(
                GroupRecord::new("2", "BSCS", "1", "1", "B")
                    .with_course(lecture("2"))
                    .with_course(lab.clone()),
            )
            .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(lecture("4")))
            .with_teacher(TeacherRecord::new("2", "Prof. Johnson").with_specialization(
                CourseRecord::new("CS 2102", "Programming Fundamentals", "2", "lab"),
            ))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .with_room(RoomRecord::new("2", "Lab 1", "lab"))
            .build()
            .unwrap();
        let config = AssemblyConfig::minimal().with_max_continuous_hours(2);
        let outcome = Scheduler::new(&catalog, config)
            .solve(&SimpleCpSolver::new(), &SolverConfig::default())
            .unwrap();

        let solution = outcome.solution().unwrap();
        assert!(verify_solution(&catalog, solution).is_empty());
        for (g, group) in catalog.groups() {
            for &c in &group.courses {
                assert_eq!(solution.hours_for(g, c), catalog.course(c).units as usize);
            }
        }
        let smith = catalog.teacher_by_id("1").unwrap();
        let course = catalog.course_by_code("CS 2101").unwrap();
        assert_eq!(solution.teacher_hours_for(smith, course), 4);
    }

    #[test]
    fn test_enumerate_distinct() {
        let catalog = CatalogBuilder::new(TimeGrid::new(1, 8, 11))
            .with_group(GroupRecord::new("1", "BSCS", "1", "1", "A").with_course(lecture("1")))
            .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(lecture("1")))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .with_room(RoomRecord::new("2", "Classroom B", "lec"))
            .build()
            .unwrap();
        let scheduler = Scheduler::new(&catalog, AssemblyConfig::minimal());

        let all = scheduler
            .enumerate(&SimpleCpSolver::new(), EnumerationConfig::default(), None)
            .unwrap();
        // 3 hours x 2 rooms
        assert_eq!(all.stop_reason, StopReason::Exhausted);
        assert_eq!(all.solutions.len(), 6);

        let some = scheduler
            .enumerate(
                &SimpleCpSolver::new(),
                EnumerationConfig::default().with_max_solutions(4),
                None,
            )
            .unwrap();
        assert_eq!(some.stop_reason, StopReason::LimitReached);
        assert_eq!(some.solutions.len(), 4);
    }

    #[test]
    fn test_enumerate_follows_enrollment_order() {
        // programming is enrolled first but registered after the lecture
        let catalog = CatalogBuilder::new(TimeGrid::new(1, 8, 11))
            .with_course(lecture("1"))
            .with_group(
                GroupRecord::new("1", "BSCS", "1", "1", "A")
                    .with_course(programming("1"))
                    .with_course(lecture("1")),
            )
            .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(lecture("1")))
            .with_teacher(
                TeacherRecord::new("2", "Prof. Johnson").with_specialization(programming("1")),
            )
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap();
        let result = Scheduler::new(&catalog, AssemblyConfig::minimal())
            .enumerate(&SimpleCpSolver::new(), EnumerationConfig::default(), None)
            .unwrap();

        // two distinct hours out of three, ordered
        assert_eq!(result.stop_reason, StopReason::Exhausted);
        assert_eq!(result.solutions.len(), 6);
        assert_eq!(result.duplicates, 0);
        for solution in &result.solutions {
            assert!(verify_solution(&catalog, solution).is_empty());
        }
    }

    fn department_sample(johnson_units: &str) -> Catalog {
        let course = |code: &str, description: &str, units: &str, kind: &str| {
            CourseRecord::new(code, description, units, kind)
        };
        CatalogBuilder::new(TimeGrid::new(6, 8, 20))
            .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(course(
                "CS 2101",
                "Introduction to Computer Science",
                "3",
                "lec",
            )))
            .with_teacher(TeacherRecord::new("2", "Prof. Johnson").with_specialization(course(
                "CS 2102",
                "Programming Fundamentals",
                johnson_units,
                "lab",
            )))
            .with_teacher(TeacherRecord::new("3", "Dr. Williams").with_specialization(course(
                "IT 3205",
                "Web Development",
                "3",
                "lec",
            )))
            .with_teacher(TeacherRecord::new("4", "Prof. Davis").with_specialization(course(
                "IT 3206",
                "Database Management",
                "3",
                "lab",
            )))
            .with_group(
                GroupRecord::new("1", "BSCS", "2", "1", "D")
                    .with_course(course("CS 2101", "Introduction to Computer Science", "3", "lec"))
                    .with_course(course("CS 2102", "Programming Fundamentals", "3", "lab")),
            )
            .with_group(
                GroupRecord::new("2", "BSIT", "4", "1", "D")
                    .with_course(course("IT 3205", "Web Development", "3", "lec"))
                    .with_course(course("IT 3206", "Database Management", "3", "lab"))
                    .with_course(course("CS 2102", "Programming Fundamentals", "3", "lab")),
            )
            .with_room(RoomRecord::new("1", "Classroom 1", "lab"))
            .with_room(RoomRecord::new("2", "Classroom A", "lec"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_department_sample_needs_teacher_hours_for_every_group() {
        // CS 2102 is taken by two groups, but its only teacher offers 3 hours
        let err = Scheduler::new(&department_sample("3"), AssemblyConfig::default())
            .build_model()
            .unwrap_err();
        match err {
            TimetableError::Assembly(AssemblyError::StructuralInfeasibility(issues)) => {
                assert_eq!(
                    issues,
                    vec![StructuralIssue::UnitMismatch {
                        course: "CS 2102".into(),
                        demanded: 6,
                        offered: 3,
                    }]
                );
            }
            other => panic!("unexpected error {other:?}"),
        }

        let model = Scheduler::new(&department_sample("6"), AssemblyConfig::default())
            .build_model()
            .unwrap();
        assert!(model.cp().validate().is_ok());
    }

    #[test]
    fn test_enumerate_structural_error() {
        let catalog = CatalogBuilder::new(TimeGrid::new(1, 8, 11))
            .with_group(GroupRecord::new("1", "BSCS", "1", "1", "A").with_course(lecture("1")))
            .with_room(RoomRecord::new("1", "Classroom A", "lec"))
            .build()
            .unwrap();
        let err = Scheduler::new(&catalog, AssemblyConfig::minimal())
            .enumerate(&SimpleCpSolver::new(), EnumerationConfig::default(), None)
            .unwrap_err();
        assert!(matches!(err, TimetableError::Assembly(_)));
    }

    fn programming(units: &str) -> CourseRecord {
        CourseRecord::new("CS 2102", "Programming Fundamentals", units, "lec")
    }

    /// Groups enroll either the lecture alone or programming then lecture,
    /// so enrollment order can disagree with catalog order.
    fn small_catalog() -> impl Strategy<Value = (Catalog, u64)> {
        (1usize..3, 1u32..3, 1u32..3, any::<bool>(), 0u64..4).prop_map(
            |(groups, units, rooms, both, seed)| {
                let total = (units * groups as u32).to_string();
                let mut builder = CatalogBuilder::new(TimeGrid::new(2, 8, 11))
                    .with_course(lecture(&units.to_string()))
                    .with_teacher(
                        TeacherRecord::new("1", "Dr. Smith").with_specialization(lecture(&total)),
                    );
                if both {
                    builder = builder.with_teacher(
                        TeacherRecord::new("2", "Prof. Johnson")
                            .with_specialization(programming(&total)),
                    );
                }
                for g in 0..groups {
                    let mut group = GroupRecord::new(g.to_string(), "BSCS", "1", "1", "A");
                    if both {
                        group = group.with_course(programming(&units.to_string()));
                    }
                    builder = builder.with_group(group.with_course(lecture(&units.to_string())));
                }
                for r in 0..rooms {
                    builder =
                        builder.with_room(RoomRecord::new(r.to_string(), format!("Room {r}"), "lec"));
                }
                (builder.build().unwrap(), seed)
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_solutions_respect_invariants((catalog, seed) in small_catalog()) {
            let config = AssemblyConfig::minimal().with_rest_days(RestDays::Seeded(seed));
            let solver_config = SolverConfig::default().with_node_limit(20_000);
            let outcome = Scheduler::new(&catalog, config)
                .solve(&SimpleCpSolver::new(), &solver_config)
                .unwrap();
            if let SolveOutcome::Solved(solution) = outcome {
                prop_assert!(verify_solution(&catalog, &solution).is_empty());
                let mut occupied = HashSet::new();
                for entry in solution.entries() {
                    prop_assert!(occupied.insert((entry.room, entry.slot)));
                }
            }
        }

        #[test]
        fn prop_enumeration_never_repeats((catalog, _seed) in small_catalog()) {
            let config = EnumerationConfig::default()
                .with_max_solutions(5)
                .with_solver_config(SolverConfig::default().with_node_limit(20_000));
            let result = Scheduler::new(&catalog, AssemblyConfig::minimal())
                .enumerate(&SimpleCpSolver::new(), config, None)
                .unwrap();
            let distinct: HashSet<_> = result.solutions.iter().map(|s| s.entries().to_vec()).collect();
            prop_assert_eq!(distinct.len(), result.solutions.len());
            prop_assert!(result.solutions.len() <= 5);
            prop_assert_ne!(result.stop_reason, StopReason::Stalled);
            prop_assert_eq!(result.duplicates, 0);
            if result.stop_reason == StopReason::LimitReached {
                prop_assert_eq!(result.solutions.len(), 5);
            }
        }
    }
}
