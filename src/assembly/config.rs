//! Assembly configuration.
//!
//! [`AssemblyConfig`] selects which optional rules are emitted and with
//! which limits.

use super::rest_day::RestDays;
use crate::error::AssemblyError;

/// What the optional objective counts over the joint assignment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveKind {
    /// Maximize the number of assigned (group, course, teacher, room, slot) tuples.
    MaximizeAssignments,
    /// Minimize the number of assigned tuples.
    MinimizeAssignments,
}

/// Configuration for the constraint assembler.
///
/// # Defaults
///
/// ```
/// use u_timetable::assembly::{AssemblyConfig, RestDays};
///
/// let config = AssemblyConfig::default();
/// assert_eq!(config.max_continuous_hours, Some(3));
/// assert_eq!(config.max_daily_teacher_hours, Some(6));
/// assert_eq!(config.rest_days, RestDays::Rotating);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::assembly::{AssemblyConfig, RestDays};
///
/// let config = AssemblyConfig::default()
///     .with_max_continuous_hours(2)
///     .with_rest_days(RestDays::Fixed(5))
///     .without_daily_teacher_cap();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyConfig {
    /// Longest allowed run of consecutive occupied hours within a day,
    /// applied to groups and teachers alike.
    ///
    /// `Some(k)` forbids runs of `k + 1` hours: every window of `k + 1`
    /// consecutive hours holds at most `k` classes. `Some(1)` is the strict
    /// variant that forbids any two adjacent hours. `None` disables the rule.
    pub max_continuous_hours: Option<u32>,

    /// Cap on a group's occupied hours per day. `None` disables the cap.
    pub max_daily_group_hours: Option<u32>,

    /// Cap on a teacher's occupied hours per day. `None` disables the cap.
    pub max_daily_teacher_hours: Option<u32>,

    /// How each group's and teacher's weekly rest day is chosen.
    pub rest_days: RestDays,

    /// Optional objective over the joint assignment variables.
    pub objective: Option<ObjectiveKind>,

    /// Whether to assemble constraint families on the rayon pool.
    ///
    /// Only effective with the `parallel` feature; the output is identical
    /// either way.
    pub parallel: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            max_continuous_hours: Some(3),
            max_daily_group_hours: None,
            max_daily_teacher_hours: Some(6),
            rest_days: RestDays::Rotating,
            objective: None,
            parallel: true,
        }
    }
}

impl AssemblyConfig {
    /// Only the mandatory families: unit totals, linking and double-booking.
    pub fn minimal() -> Self {
        Self {
            max_continuous_hours: None,
            max_daily_group_hours: None,
            max_daily_teacher_hours: None,
            rest_days: RestDays::Disabled,
            objective: None,
            parallel: true,
        }
    }

    pub fn with_max_continuous_hours(mut self, hours: u32) -> Self {
        self.max_continuous_hours = Some(hours);
        self
    }

    pub fn without_continuous_limit(mut self) -> Self {
        self.max_continuous_hours = None;
        self
    }

    pub fn with_max_daily_group_hours(mut self, hours: u32) -> Self {
        self.max_daily_group_hours = Some(hours);
        self
    }

    pub fn with_max_daily_teacher_hours(mut self, hours: u32) -> Self {
        self.max_daily_teacher_hours = Some(hours);
        self
    }

    pub fn without_daily_teacher_cap(mut self) -> Self {
        self.max_daily_teacher_hours = None;
        self
    }

    pub fn with_rest_days(mut self, rest_days: RestDays) -> Self {
        self.rest_days = rest_days;
        self
    }

    pub fn with_objective(mut self, objective: ObjectiveKind) -> Self {
        self.objective = Some(objective);
        self
    }

    /// Enables or disables parallel assembly.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AssemblyError> {
        if self.max_continuous_hours == Some(0) {
            return Err(AssemblyError::InvalidConfig(
                "max_continuous_hours must be at least 1 or None".into(),
            ));
        }
        if self.max_daily_group_hours == Some(0) {
            return Err(AssemblyError::InvalidConfig(
                "max_daily_group_hours must be at least 1 or None".into(),
            ));
        }
        if self.max_daily_teacher_hours == Some(0) {
            return Err(AssemblyError::InvalidConfig(
                "max_daily_teacher_hours must be at least 1 or None".into(),
            ));
        }
        Ok(())
    }
}
