//! CP solver interface and basic implementation.

use super::model::{Constraint, CpModel};
use std::fmt;
use std::time::Instant;

/// Status of the solver after execution.
///
/// `Infeasible` is a proof; `Timeout` only means the budget ran out.
/// Callers must never treat one as the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible (but not necessarily optimal) solution found.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Solver exhausted its time or node budget.
    Timeout,
    /// No solution found for unknown reasons.
    Unknown,
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverStatus::Optimal => "OPTIMAL",
            SolverStatus::Feasible => "FEASIBLE",
            SolverStatus::Infeasible => "INFEASIBLE",
            SolverStatus::ModelInvalid => "MODEL_INVALID",
            SolverStatus::Timeout => "TIMEOUT",
            SolverStatus::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Solution from a CP solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective function value (if the model has one and a solution was found).
    pub objective_value: Option<i64>,
    /// Value of every variable, indexed by [`VarId`](super::VarId).
    /// Empty unless a solution was found.
    pub values: Vec<bool>,
    /// Solve time in milliseconds.
    pub solve_time_ms: u64,
    /// Search nodes explored, if the solver reports them.
    pub nodes: u64,
}

impl CpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            values: Vec::new(),
            solve_time_ms: 0,
            nodes: 0,
        }
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }
}

/// Solver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum wall-clock time per solve call in milliseconds.
    ///
    /// `None` disables the time budget.
    pub time_limit_ms: Option<u64>,
    /// Maximum number of search nodes per solve call.
    pub node_limit: Option<u64>,
    /// Number of parallel workers, for solvers that support them.
    pub num_workers: usize,
    /// Stop after finding the first feasible solution instead of optimizing.
    pub stop_after_first: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: Some(60_000),
            node_limit: None,
            num_workers: 1,
            stop_after_first: false,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn without_time_limit(mut self) -> Self {
        self.time_limit_ms = None;
        self
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = Some(nodes);
        self
    }

    pub fn with_num_workers(mut self, n: usize) -> Self {
        self.num_workers = n.max(1);
        self
    }

    pub fn with_stop_after_first(mut self, stop: bool) -> Self {
        self.stop_after_first = stop;
        self
    }
}

/// Trait for CP solver implementations.
///
/// Implementors provide the actual constraint solving logic. This can wrap
/// external solvers (e.g., OR-Tools CP-SAT) or provide custom search.
/// The call blocks until a verdict is reached or the budget in
/// [`SolverConfig`] is spent.
pub trait CpSolver {
    /// Solves the model and returns a solution.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;

    /// Native solution enumeration, for engines that offer a callback API.
    ///
    /// Calls `on_solution` for each solution found; returning `false` from the
    /// callback stops the search. Returns the final status, or `None` when the
    /// engine has no native enumeration (the default), in which case callers
    /// fall back to repeated [`solve`](Self::solve) calls with exclusions.
    fn enumerate(
        &self,
        _model: &CpModel,
        _config: &SolverConfig,
        _on_solution: &mut dyn FnMut(&CpSolution) -> bool,
    ) -> Option<SolverStatus> {
        None
    }
}

/// A simple depth-first CP solver for testing and small instances.
///
/// Branches on variables in index order (true first) and propagates the
/// bounds of every linear constraint to a fixpoint after each decision.
///
/// # Limitations
///
/// - Does not optimize: the objective is evaluated, not minimized/maximized
/// - No learning or restarts; hard instances will hit the budget
pub struct SimpleCpSolver;

impl SimpleCpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimpleCpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CpSolver for SimpleCpSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        if let Err(reason) = model.validate() {
            log::debug!("model '{}' rejected: {reason}", model.name);
            return CpSolution::empty(SolverStatus::ModelInvalid);
        }

        let start_time = Instant::now();
        let mut search = Search::new(model, config, start_time);

        let all: Vec<usize> = (0..model.constraints.len()).collect();
        let outcome = if search.propagate(all) {
            search.run()
        } else {
            Ok(false)
        };

        let mut solution = match outcome {
            Ok(true) => {
                let values: Vec<bool> = search.values.iter().map(|v| v.unwrap_or(false)).collect();
                CpSolution {
                    status: SolverStatus::Feasible,
                    objective_value: model.objective.as_ref().map(|o| o.evaluate(&values)),
                    values,
                    solve_time_ms: 0,
                    nodes: 0,
                }
            }
            Ok(false) => CpSolution::empty(SolverStatus::Infeasible),
            Err(Interrupted) => CpSolution::empty(SolverStatus::Timeout),
        };
        solution.nodes = search.nodes;
        solution.solve_time_ms = start_time.elapsed().as_millis() as u64;

        log::debug!(
            "model '{}': {} after {} nodes in {} ms",
            model.name,
            solution.status,
            solution.nodes,
            solution.solve_time_ms
        );
        solution
    }
}

/// The search budget ran out.
struct Interrupted;

struct Search<'m> {
    model: &'m CpModel,
    /// Constraints mentioning each variable.
    watches: Vec<Vec<usize>>,
    values: Vec<Option<bool>>,
    trail: Vec<usize>,
    nodes: u64,
    node_limit: Option<u64>,
    time_limit_ms: Option<u64>,
    started: Instant,
}

impl<'m> Search<'m> {
    fn new(model: &'m CpModel, config: &SolverConfig, started: Instant) -> Self {
        let mut watches = vec![Vec::new(); model.variables.len()];
        for (ci, constraint) in model.constraints.iter().enumerate() {
            for term in &constraint.terms {
                let list = &mut watches[term.var.index()];
                if list.last() != Some(&ci) {
                    list.push(ci);
                }
            }
        }
        Self {
            model,
            watches,
            values: vec![None; model.variables.len()],
            trail: Vec::new(),
            nodes: 0,
            node_limit: config.node_limit,
            time_limit_ms: config.time_limit_ms,
            started,
        }
    }

    fn run(&mut self) -> Result<bool, Interrupted> {
        let Some(var) = self.values.iter().position(Option::is_none) else {
            return Ok(true);
        };

        self.nodes += 1;
        self.check_budget()?;

        for value in [true, false] {
            let mark = self.trail.len();
            self.assign(var, value);
            if self.propagate(self.watches[var].clone()) && self.run()? {
                return Ok(true);
            }
            self.undo(mark);
        }
        Ok(false)
    }

    fn check_budget(&self) -> Result<(), Interrupted> {
        if let Some(limit) = self.node_limit {
            if self.nodes > limit {
                return Err(Interrupted);
            }
        }
        if let Some(limit) = self.time_limit_ms {
            if self.nodes % 256 == 0 && self.started.elapsed().as_millis() as u64 >= limit {
                return Err(Interrupted);
            }
        }
        Ok(())
    }

    fn assign(&mut self, var: usize, value: bool) {
        self.values[var] = Some(value);
        self.trail.push(var);
    }

    fn undo(&mut self, mark: usize) {
        for var in self.trail.drain(mark..) {
            self.values[var] = None;
        }
    }

    /// Propagates bounds until fixpoint. Returns `false` on conflict.
    fn propagate(&mut self, mut queue: Vec<usize>) -> bool {
        let model = self.model;
        while let Some(ci) = queue.pop() {
            let constraint = &model.constraints[ci];
            let Some(forced) = self.implied(constraint) else {
                return false;
            };
            for (var, value) in forced {
                match self.values[var] {
                    Some(current) if current != value => return false,
                    Some(_) => {}
                    None => {
                        self.assign(var, value);
                        queue.extend_from_slice(&self.watches[var]);
                    }
                }
            }
        }
        true
    }

    /// Values forced on unassigned variables by one constraint, or `None`
    /// if the constraint can no longer be satisfied.
    fn implied(&self, constraint: &Constraint) -> Option<Vec<(usize, bool)>> {
        let (lo, hi) = constraint.bounds();
        let mut min = 0i64;
        let mut max = 0i64;
        for term in &constraint.terms {
            match self.values[term.var.index()] {
                Some(true) => {
                    min += term.coeff;
                    max += term.coeff;
                }
                Some(false) => {}
                None => {
                    min += term.coeff.min(0);
                    max += term.coeff.max(0);
                }
            }
        }
        if min > hi || max < lo {
            return None;
        }

        let mut forced = Vec::new();
        for term in &constraint.terms {
            let var = term.var.index();
            if self.values[var].is_some() {
                continue;
            }
            let rest_min = min - term.coeff.min(0);
            let rest_max = max - term.coeff.max(0);
            let true_ok = rest_min + term.coeff <= hi && rest_max + term.coeff >= lo;
            let false_ok = rest_min <= hi && rest_max >= lo;
            match (true_ok, false_ok) {
                (false, false) => return None,
                (true, false) => forced.push((var, true)),
                (false, true) => forced.push((var, false)),
                (true, true) => {}
            }
        }
        Some(forced)
    }
}
