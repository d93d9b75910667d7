use itertools::Itertools;

use crate::problem::{MilpOutcome, MilpProblem};
use crate::simplex::{self, LpOutcome, LpProblem};

/// The external MILP solver contract (§6): given an encoded relaxation
/// problem, find the minimal-cost assignment of relaxation amounts
/// satisfying every disjunction, or report infeasibility. A production
/// deployment would implement this trait over an external solver; this
/// crate ships [`BnbMilpSolver`] as a self-contained reference backend.
pub trait MilpSolver {
    fn solve(&mut self, problem: &MilpProblem) -> MilpOutcome;
}

/// Reference backend: since no binary indicator appears in the objective,
/// and activating more than one alternative of a disjunction can only
/// shrink the feasible region left for the continuous variables (hence
/// only raise, never lower, the achievable minimum), an optimal solution
/// always activates exactly one alternative per disjunction. This reduces
/// the conceptual big-M MILP (`compute_relaxation.py`'s
/// `add_conflicts_to_model`) to enumerating, for every disjunction, which
/// single alternative is enforced, and solving the resulting pure linear
/// program with [`crate::simplex`]. The enumeration is exhaustive, so the
/// result is exact, not a heuristic branch-and-bound relaxation.
#[derive(Default)]
pub struct BnbMilpSolver;

impl BnbMilpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for BnbMilpSolver {
    fn solve(&mut self, problem: &MilpProblem) -> MilpOutcome {
        let n = problem.num_vars();
        let mut base_constraints: Vec<(Vec<f64>, f64)> = Vec::with_capacity(problem.upper_bounds.len());
        for (i, &ub) in problem.upper_bounds.iter().enumerate() {
            let mut row = vec![0.0; n];
            row[i] = 1.0;
            base_constraints.push((row, ub));
        }

        if problem.disjunctions.iter().any(|d| d.alternatives.is_empty()) {
            return MilpOutcome::Infeasible;
        }
        if problem.disjunctions.is_empty() {
            return match simplex::solve(&LpProblem {
                num_vars: n,
                objective: problem.objective.clone(),
                constraints: base_constraints,
            }) {
                LpOutcome::Optimal { values, objective } => MilpOutcome::Optimal { values, objective },
                LpOutcome::Infeasible | LpOutcome::Unbounded => MilpOutcome::Infeasible,
            };
        }

        let choice_ranges = problem.disjunctions.iter().map(|d| 0..d.alternatives.len());
        let mut best: Option<(Vec<f64>, f64)> = None;
        for combo in choice_ranges.multi_cartesian_product() {
            let mut constraints = base_constraints.clone();
            for (disjunction, &alt) in problem.disjunctions.iter().zip(combo.iter()) {
                let chosen = &disjunction.alternatives[alt];
                constraints.push((chosen.coeffs.clone(), chosen.rhs));
            }
            let lp = LpProblem {
                num_vars: n,
                objective: problem.objective.clone(),
                constraints,
            };
            match simplex::solve(&lp) {
                LpOutcome::Optimal { values, objective } => {
                    if best.as_ref().map(|(_, o)| objective < *o).unwrap_or(true) {
                        best = Some((values, objective));
                    }
                }
                LpOutcome::Infeasible => {}
                LpOutcome::Unbounded => {
                    tracing::warn!("relaxation sub-problem unbounded for one alternative combination; skipping");
                }
            }
        }
        match best {
            Some((values, objective)) => MilpOutcome::Optimal { values, objective },
            None => MilpOutcome::Infeasible,
        }
    }
}
