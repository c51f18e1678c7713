//! Constraint assembly.
//!
//! [`ConstraintAssembler`] turns a [`Catalog`] into a [`TimetableModel`]:
//! variable space → structural check → constraint families → model.

use super::config::{AssemblyConfig, ObjectiveKind};
use super::container::TimetableModel;
use super::families::{FamilyContext, FamilyOutput, FAMILIES};
use super::rest_day::{RestDayPlan, RestDayPolicy};
use crate::catalog::Catalog;
use crate::cp::{CpModel, Objective, Term};
use crate::error::AssemblyError;
use crate::space::VariableSpace;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Builds the constraint model of a catalog.
///
/// # Examples
///
/// ```
/// use u_timetable::assembly::{AssemblyConfig, ConstraintAssembler};
/// use u_timetable::catalog::{CatalogBuilder, CourseRecord, GroupRecord, RoomRecord, TeacherRecord, TimeGrid};
/// use u_timetable::cp::ConstraintFamily;
///
/// let intro = CourseRecord::new("CS 2101", "Introduction to Computer Science", "3", "lec");
/// let catalog = CatalogBuilder::new(TimeGrid::new(5, 8, 20))
///     .with_group(GroupRecord::new("1", "BSCS", "2", "1", "D").with_course(intro.clone()))
///     .with_teacher(TeacherRecord::new("1", "Dr. Smith").with_specialization(intro))
///     .with_room(RoomRecord::new("1", "Classroom A", "lec"))
///     .build()
///     .unwrap();
///
/// let model = ConstraintAssembler::new(&catalog, AssemblyConfig::default())
///     .assemble()
///     .unwrap();
/// assert_eq!(model.cp().family_count(ConstraintFamily::UnitTotal), 2);
/// ```
pub struct ConstraintAssembler<'a> {
    catalog: &'a Catalog,
    config: AssemblyConfig,
    policy: Option<Box<dyn RestDayPolicy + 'a>>,
}

impl<'a> ConstraintAssembler<'a> {
    pub fn new(catalog: &'a Catalog, config: AssemblyConfig) -> Self {
        Self {
            catalog,
            config,
            policy: None,
        }
    }

    /// Replaces the configured [`RestDays`](super::RestDays) with a custom policy.
    pub fn with_rest_day_policy(mut self, policy: impl RestDayPolicy + 'a) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Assembles the model.
    ///
    /// # Errors
    ///
    /// - [`AssemblyError::InvalidConfig`] for a zero limit in the config.
    /// - [`AssemblyError::InvalidRestDay`] when the rest-day policy picks a
    ///   day outside the grid.
    /// - [`AssemblyError::StructuralInfeasibility`] with every issue found
    ///   when some enrollment cannot be scheduled at all. No model is built
    ///   in that case.
    pub fn assemble(&self) -> Result<TimetableModel, AssemblyError> {
        self.config.validate()?;

        let rest_days = match &self.policy {
            Some(policy) => RestDayPlan::resolve(self.catalog, policy.as_ref())?,
            None => RestDayPlan::resolve(self.catalog, &self.config.rest_days)?,
        };
        let space = VariableSpace::build(self.catalog);

        let ctx = FamilyContext {
            catalog: self.catalog,
            space: &space,
            config: &self.config,
            rest_days: &rest_days,
        };
        let outputs = run_families(&ctx, self.config.parallel);

        let mut constraints = Vec::new();
        let mut issues = Vec::new();
        for ((family, _), output) in FAMILIES.iter().zip(outputs) {
            match output {
                Ok(built) => {
                    log::info!("{family}: {} constraints", built.len());
                    constraints.extend(built);
                }
                Err(found) => issues.extend(found),
            }
        }
        if !issues.is_empty() {
            log::info!("structurally infeasible: {} issue(s)", issues.len());
            return Err(AssemblyError::StructuralInfeasibility(issues));
        }

        let mut cp = CpModel::new("timetable");
        cp.variables = space.variables().to_vec();
        cp.constraints = constraints;
        if let Some(kind) = self.config.objective {
            let terms = space.joint_keys().map(|(_, w)| Term::unit(w)).collect();
            cp.set_objective(match kind {
                ObjectiveKind::MaximizeAssignments => Objective::Maximize { terms },
                ObjectiveKind::MinimizeAssignments => Objective::Minimize { terms },
            });
        }

        log::info!(
            "model '{}': {} variables, {} constraints",
            cp.name,
            cp.variable_count(),
            cp.constraint_count()
        );

        Ok(TimetableModel {
            cp,
            space,
            rest_days,
        })
    }
}

#[cfg(feature = "parallel")]
fn run_families(ctx: &FamilyContext<'_>, parallel: bool) -> Vec<FamilyOutput> {
    if parallel {
        FAMILIES[..]
            .par_iter()
            .map(|(_, build)| build(ctx))
            .collect()
    } else {
        FAMILIES.iter().map(|(_, build)| build(ctx)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn run_families(ctx: &FamilyContext<'_>, _parallel: bool) -> Vec<FamilyOutput> {
    FAMILIES.iter().map(|(_, build)| build(ctx)).collect()
}
