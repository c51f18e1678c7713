//! Rest-day selection.
//!
//! Each group and teacher gets at most one day per week with no classes.
//! The choice is an injectable policy resolved once per run into a
//! [`RestDayPlan`], so every constraint of an entity sees the same day.

use crate::catalog::{Catalog, GroupIx, StudentGroup, Teacher, TeacherIx, TimeGrid};
use crate::error::AssemblyError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The entity a rest day is being chosen for.
#[derive(Debug, Clone, Copy)]
pub enum RestEntity<'a> {
    Group {
        ix: GroupIx,
        group: &'a StudentGroup,
    },
    Teacher {
        ix: TeacherIx,
        teacher: &'a Teacher,
    },
}

impl RestEntity<'_> {
    /// Position of the entity in its catalog table.
    pub fn position(&self) -> usize {
        match self {
            RestEntity::Group { ix, .. } => ix.index(),
            RestEntity::Teacher { ix, .. } => ix.index(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            RestEntity::Group { group, .. } => group.label(),
            RestEntity::Teacher { teacher, .. } => teacher.name.clone(),
        }
    }
}

/// Chooses an entity's weekly rest day.
///
/// Must be a pure function of its inputs: the assembler calls it once per
/// entity and assumes the answer is reproducible.
pub trait RestDayPolicy: Send + Sync {
    /// The rest day (`0..grid.days`), or `None` for no rest day.
    fn rest_day(&self, entity: &RestEntity<'_>, grid: &TimeGrid) -> Option<u32>;
}

/// Built-in rest-day policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestDays {
    /// No rest days.
    Disabled,
    /// The same day for everyone.
    Fixed(u32),
    /// Entity `i` rests on day `i % days`.
    Rotating,
    /// A reproducible pseudo-random day per entity, derived from the seed and
    /// the entity's label.
    Seeded(u64),
}

impl RestDayPolicy for RestDays {
    fn rest_day(&self, entity: &RestEntity<'_>, grid: &TimeGrid) -> Option<u32> {
        match *self {
            RestDays::Disabled => None,
            RestDays::Fixed(day) => Some(day),
            RestDays::Rotating => Some((entity.position() % grid.days as usize) as u32),
            RestDays::Seeded(seed) => {
                let tag = match entity {
                    RestEntity::Group { .. } => b'g',
                    RestEntity::Teacher { .. } => b't',
                };
                let label = entity.label();
                let mut rng = StdRng::seed_from_u64(seed ^ fnv1a(&[&[tag], label.as_bytes()]));
                Some(rng.random_range(0..grid.days))
            }
        }
    }
}

/// 64-bit FNV-1a over `chunks`, stable across toolchains and platforms.
fn fnv1a(chunks: &[&[u8]]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    chunks
        .iter()
        .flat_map(|chunk| chunk.iter())
        .fold(OFFSET, |hash, &byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// Resolved rest day of every group and teacher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RestDayPlan {
    groups: Vec<Option<u32>>,
    teachers: Vec<Option<u32>>,
}

impl RestDayPlan {
    /// Asks `policy` once per entity and checks every answer against the grid.
    ///
    /// A rest day on a single-day grid leaves no teaching day at all and is
    /// rejected as [`AssemblyError::InvalidConfig`].
    pub fn resolve(catalog: &Catalog, policy: &dyn RestDayPolicy) -> Result<Self, AssemblyError> {
        let grid = catalog.grid();
        let check = |entity: RestEntity<'_>| -> Result<Option<u32>, AssemblyError> {
            let day = policy.rest_day(&entity, grid);
            if day.is_some() && grid.days < 2 {
                return Err(AssemblyError::InvalidConfig(format!(
                    "rest day for '{}' leaves no teaching day in a {}-day grid",
                    entity.label(),
                    grid.days
                )));
            }
            match day {
                Some(day) if day >= grid.days => Err(AssemblyError::InvalidRestDay {
                    entity: entity.label(),
                    day,
                    days: grid.days,
                }),
                _ => Ok(day),
            }
        };

        let groups = catalog
            .groups()
            .map(|(ix, group)| check(RestEntity::Group { ix, group }))
            .collect::<Result<Vec<_>, _>>()?;
        let teachers = catalog
            .teachers()
            .map(|(ix, teacher)| check(RestEntity::Teacher { ix, teacher }))
            .collect::<Result<Vec<_>, _>>()?;

        let plan = Self { groups, teachers };
        log::debug!("rest days: groups {:?}, teachers {:?}", plan.groups, plan.teachers);
        Ok(plan)
    }

    pub fn group(&self, ix: GroupIx) -> Option<u32> {
        self.groups.get(ix.index()).copied().flatten()
    }

    pub fn teacher(&self, ix: TeacherIx) -> Option<u32> {
        self.teachers.get(ix.index()).copied().flatten()
    }
}
