//! Enumeration of distinct timetables.
//!
//! Uses the solver's native enumeration when it has one, otherwise repeats
//! [`CpSolver::solve`] on a working copy of the model, adding after each
//! solution an exclusion cut over the joint variables:
//!
//! ```text
//! Σ_{w set} (1 - w) + Σ_{w unset} w ≥ 1
//! ```
//!
//! Every solution is canonicalized to its set of joint variables before it is
//! counted, so two reports of the same timetable count once.

use super::extractor::SolutionExtractor;
use super::solution::TimetableSolution;
use crate::assembly::TimetableModel;
use crate::cp::{
    Comparison, Constraint, ConstraintFamily, CpSolution, CpSolver, SolverConfig, SolverStatus,
    Term, VarId,
};
use crate::error::ExtractError;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Configuration for [`Enumerator`].
///
/// # Examples
///
/// ```
/// use u_timetable::cp::SolverConfig;
/// use u_timetable::extract::EnumerationConfig;
///
/// let config = EnumerationConfig::default()
///     .with_max_solutions(5)
///     .with_solver_config(SolverConfig::default().with_time_limit_ms(1_000));
/// assert_eq!(config.max_solutions, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationConfig {
    /// Stop once this many distinct solutions were collected.
    pub max_solutions: usize,
    /// Budget applied to every solver call.
    pub solver: SolverConfig,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            max_solutions: 10,
            solver: SolverConfig::default(),
        }
    }
}

impl EnumerationConfig {
    pub fn with_max_solutions(mut self, n: usize) -> Self {
        self.max_solutions = n;
        self
    }

    pub fn with_solver_config(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }
}

/// Why enumeration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// `max_solutions` distinct solutions were collected.
    LimitReached,
    /// No further distinct solution exists.
    Exhausted,
    /// A solver call ran out of budget.
    Timeout,
    /// The cancellation flag was raised.
    Cancelled,
    /// The solver returned a solution it had already been told to exclude.
    Stalled,
    /// The solver gave up without a verdict or rejected the model.
    Unknown,
}

/// Outcome of an enumeration run.
#[derive(Debug, Clone)]
pub struct EnumerationResult {
    /// Distinct solutions, in discovery order.
    pub solutions: Vec<TimetableSolution>,
    pub stop_reason: StopReason,
    /// Solver invocations (1 when native enumeration was used).
    pub solver_calls: usize,
    /// Raw solutions dropped as canonical duplicates.
    pub duplicates: usize,
}

/// Collects distinct timetables from repeated solver calls.
pub struct Enumerator<'a, S: CpSolver + ?Sized> {
    model: &'a TimetableModel,
    solver: &'a S,
    config: EnumerationConfig,
}

impl<'a, S: CpSolver + ?Sized> Enumerator<'a, S> {
    pub fn new(model: &'a TimetableModel, solver: &'a S, config: EnumerationConfig) -> Self {
        Self {
            model,
            solver,
            config,
        }
    }

    /// Runs until the limit, exhaustion or a solver verdict without solution.
    pub fn run(&self) -> Result<EnumerationResult, ExtractError> {
        self.run_with_cancel(None)
    }

    /// Runs with an optional cancellation token, checked before every solver
    /// call and after every collected solution.
    pub fn run_with_cancel(
        &self,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EnumerationResult, ExtractError> {
        let mut state = Collected::default();
        let is_cancelled = || cancel.as_ref().is_some_and(|c| c.load(Ordering::Relaxed));

        if self.config.max_solutions == 0 {
            return Ok(state.finish(StopReason::LimitReached));
        }
        if is_cancelled() {
            return Ok(state.finish(StopReason::Cancelled));
        }

        if let Some(reason) = self.run_native(&mut state, &is_cancelled)? {
            return Ok(state.finish(reason));
        }

        let reason = self.run_with_cuts(&mut state, &is_cancelled)?;
        Ok(state.finish(reason))
    }

    /// `None` when the solver has no native enumeration.
    fn run_native(
        &self,
        state: &mut Collected,
        is_cancelled: &dyn Fn() -> bool,
    ) -> Result<Option<StopReason>, ExtractError> {
        let extractor = SolutionExtractor::new(self.model);
        let max = self.config.max_solutions;
        let mut failure = None;
        let mut cancelled = false;

        let status = self.solver.enumerate(
            self.model.cp(),
            &self.config.solver,
            &mut |raw: &CpSolution| {
                match state.offer(&extractor, raw) {
                    Ok(_) => {}
                    Err(e) => {
                        failure = Some(e);
                        return false;
                    }
                }
                if is_cancelled() {
                    cancelled = true;
                    return false;
                }
                state.solutions.len() < max
            },
        );
        let Some(status) = status else {
            return Ok(None);
        };
        state.solver_calls += 1;
        if let Some(e) = failure {
            return Err(e);
        }

        let reason = if state.solutions.len() >= max {
            StopReason::LimitReached
        } else if cancelled {
            StopReason::Cancelled
        } else {
            match status {
                SolverStatus::Optimal | SolverStatus::Feasible | SolverStatus::Infeasible => {
                    StopReason::Exhausted
                }
                SolverStatus::Timeout => StopReason::Timeout,
                SolverStatus::ModelInvalid | SolverStatus::Unknown => StopReason::Unknown,
            }
        };
        Ok(Some(reason))
    }

    fn run_with_cuts(
        &self,
        state: &mut Collected,
        is_cancelled: &dyn Fn() -> bool,
    ) -> Result<StopReason, ExtractError> {
        let extractor = SolutionExtractor::new(self.model);
        let mut joint: Vec<VarId> = self.model.space().joint_keys().map(|(_, w)| w).collect();
        joint.sort_unstable();
        let mut working = self.model.cp().clone();

        loop {
            if is_cancelled() {
                return Ok(StopReason::Cancelled);
            }

            let raw = self.solver.solve(&working, &self.config.solver);
            state.solver_calls += 1;
            match raw.status {
                SolverStatus::Optimal | SolverStatus::Feasible => {}
                SolverStatus::Infeasible => return Ok(StopReason::Exhausted),
                SolverStatus::Timeout => return Ok(StopReason::Timeout),
                SolverStatus::ModelInvalid | SolverStatus::Unknown => {
                    return Ok(StopReason::Unknown)
                }
            }

            let Some(key) = state.offer(&extractor, &raw)? else {
                return Ok(StopReason::Stalled);
            };
            if state.solutions.len() >= self.config.max_solutions {
                return Ok(StopReason::LimitReached);
            }
            working.add_constraint(exclusion_cut(&joint, &key, state.solutions.len()));
        }
    }
}

/// Forbids exactly the joint assignment `set` (sorted) over `joint` (sorted).
fn exclusion_cut(joint: &[VarId], set: &[VarId], ordinal: usize) -> Constraint {
    let terms = joint
        .iter()
        .map(|&w| {
            let coeff = if set.binary_search(&w).is_ok() { -1 } else { 1 };
            Term::new(w, coeff)
        })
        .collect();
    Constraint {
        family: ConstraintFamily::Exclusion,
        label: format!("exclude solution {ordinal}"),
        terms,
        cmp: Comparison::Ge,
        rhs: 1 - set.len() as i64,
    }
}

#[derive(Default)]
struct Collected {
    seen: HashSet<Vec<VarId>>,
    solutions: Vec<TimetableSolution>,
    solver_calls: usize,
    duplicates: usize,
}

impl Collected {
    /// Records `raw` if it is new. Returns its canonical key, or `None` for
    /// a duplicate.
    fn offer(
        &mut self,
        extractor: &SolutionExtractor<'_>,
        raw: &CpSolution,
    ) -> Result<Option<Vec<VarId>>, ExtractError> {
        let key = extractor.canonical_key(raw)?;
        if self.seen.contains(&key) {
            self.duplicates += 1;
            log::trace!("duplicate solution dropped ({} so far)", self.duplicates);
            return Ok(None);
        }
        self.solutions.push(extractor.extract(raw)?);
        self.seen.insert(key.clone());
        log::trace!(
            "solution {} collected ({} ms)",
            self.solutions.len(),
            raw.solve_time_ms
        );
        Ok(Some(key))
    }

    fn finish(self, stop_reason: StopReason) -> EnumerationResult {
        log::debug!(
            "enumeration stopped ({stop_reason:?}): {} solutions, {} duplicates, {} solver calls",
            self.solutions.len(),
            self.duplicates,
            self.solver_calls
        );
        EnumerationResult {
            solutions: self.solutions,
            stop_reason,
            solver_calls: self.solver_calls,
            duplicates: self.duplicates,
        }
    }
}
