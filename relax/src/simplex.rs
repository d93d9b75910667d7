//! A small two-phase primal simplex method over a dense tableau, used by
//! [`crate::solver::BnbMilpSolver`] to solve the continuous sub-problem left
//! after a [`crate::problem::Disjunction`] has picked an alternative. Not
//! meant to scale past the handful of relaxation-amount variables a single
//! conflict resolution involves; see `compute_relaxation.py` for the
//! reference this crate's encoding is grounded on. A production deployment
//! would plug in an external MILP solver behind [`crate::solver::MilpSolver`]
//! instead.

const TOLERANCE: f64 = 1e-7;

/// `minimize objective . x` subject to `constraints[i].0 . x <= constraints[i].1`
/// and `0 <= x`. Callers fold variable upper bounds in as ordinary rows.
pub struct LpProblem {
    pub num_vars: usize,
    pub objective: Vec<f64>,
    pub constraints: Vec<(Vec<f64>, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LpOutcome {
    Optimal { values: Vec<f64>, objective: f64 },
    Infeasible,
    Unbounded,
}

/// Dense simplex tableau: `m` constraint rows plus one objective row, over
/// `num_vars` structural variables, `m` slacks and `m` artificials (always
/// allocated, per row, regardless of the row's rhs sign: a row is negated
/// before the artificial is added so every row's rhs is nonnegative and its
/// artificial can serve as that row's initial basic variable).
struct Tableau {
    rows: Vec<Vec<f64>>,
    obj: Vec<f64>,
    basis: Vec<usize>,
    num_vars: usize,
    num_slacks: usize,
}

impl Tableau {
    fn total_cols(&self) -> usize {
        self.num_vars + 2 * self.num_slacks + 1
    }

    fn rhs_col(&self) -> usize {
        self.total_cols() - 1
    }

    fn artificial_col(&self, row: usize) -> usize {
        self.num_vars + self.num_slacks + row
    }

    fn slack_col(&self, row: usize) -> usize {
        self.num_vars + row
    }

    /// Zeroes the reduced cost of every basic column by subtracting a
    /// multiple of its row from the objective row; restores the invariant
    /// `obj[basis[i]] == 0` that the pivot loop relies on.
    fn canonicalize_objective(&mut self) {
        for (i, &b) in self.basis.iter().enumerate() {
            let c = self.obj[b];
            if c.abs() > TOLERANCE {
                for col in 0..self.obj.len() {
                    self.obj[col] -= c * self.rows[i][col];
                }
            }
        }
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let pivot_val = self.rows[row][col];
        for v in self.rows[row].iter_mut() {
            *v /= pivot_val;
        }
        for r in 0..self.rows.len() {
            if r == row {
                continue;
            }
            let factor = self.rows[r][col];
            if factor.abs() > TOLERANCE {
                for c in 0..self.total_cols() {
                    self.rows[r][c] -= factor * self.rows[row][c];
                }
            }
        }
        self.basis[row] = col;
    }

    /// Bland's-rule pivoting: smallest-index negative-reduced-cost column
    /// enters, ties in the ratio test broken by smallest basis index. Avoids
    /// cycling without needing perturbation or lexicographic bookkeeping.
    /// `eligible` restricts which columns may enter (phase 2 excludes
    /// artificials).
    fn run(&mut self, eligible: impl Fn(usize) -> bool) -> Result<(), ()> {
        loop {
            let entering = (0..self.total_cols() - 1)
                .filter(|&c| eligible(c))
                .find(|&c| self.obj[c] < -TOLERANCE);
            let Some(col) = entering else {
                return Ok(());
            };
            let mut leaving_row = None;
            let mut best_ratio = f64::INFINITY;
            for (i, row) in self.rows.iter().enumerate() {
                if row[col] > TOLERANCE {
                    let ratio = row[self.rhs_col()] / row[col];
                    if ratio < best_ratio - TOLERANCE
                        || (ratio < best_ratio + TOLERANCE
                            && leaving_row.map(|r| self.basis[r] > self.basis[i]).unwrap_or(true))
                    {
                        best_ratio = ratio;
                        leaving_row = Some(i);
                    }
                }
            }
            let Some(row) = leaving_row else {
                return Err(());
            };
            self.pivot(row, col);
        }
    }
}

pub fn solve(problem: &LpProblem) -> LpOutcome {
    let n = problem.num_vars;
    let m = problem.constraints.len();
    if m == 0 {
        // Unconstrained below: minimal feasible point is the origin, which
        // is optimal whenever every cost coefficient is nonnegative (always
        // true for this crate's encodings, whose costs are linear costs of
        // widening a bound).
        return LpOutcome::Optimal {
            values: vec![0.0; n],
            objective: 0.0,
        };
    }
    let total_cols = n + 2 * m + 1;
    let mut rows = Vec::with_capacity(m);
    let mut basis = Vec::with_capacity(m);
    for (i, (coeffs, rhs)) in problem.constraints.iter().enumerate() {
        let mut row = vec![0.0; total_cols];
        let sign = if *rhs < 0.0 { -1.0 } else { 1.0 };
        for (j, &a) in coeffs.iter().enumerate() {
            row[j] = sign * a;
        }
        row[n + i] = sign; // slack
        row[n + m + i] = 1.0; // artificial, always the row's initial basic var
        row[total_cols - 1] = sign * rhs;
        basis.push(n + m + i);
        rows.push(row);
    }

    let mut phase1_obj = vec![0.0; total_cols];
    for i in 0..m {
        phase1_obj[n + m + i] = 1.0;
    }
    let mut tableau = Tableau {
        rows,
        obj: phase1_obj,
        basis,
        num_vars: n,
        num_slacks: m,
    };
    tableau.canonicalize_objective();
    if tableau
        .run(|c| c < n + m) // artificials never re-enter, even in phase 1's own search
        .is_err()
    {
        // An unbounded phase-1 objective cannot happen: it is a sum of
        // variables individually bounded below by 0 and above by the
        // row's own feasibility, so treat a stalled pivot as infeasible.
        return LpOutcome::Infeasible;
    }
    let phase1_value = tableau.obj[tableau.rhs_col()];
    if phase1_value.abs() > 1e-6 {
        return LpOutcome::Infeasible;
    }

    let mut phase2_obj = vec![0.0; total_cols];
    for (j, &c) in problem.objective.iter().enumerate() {
        phase2_obj[j] = c;
    }
    tableau.obj = phase2_obj;
    tableau.canonicalize_objective();
    let eligible_cols = tableau.artificial_col(0);
    if tableau.run(|c| c < eligible_cols).is_err() {
        return LpOutcome::Unbounded;
    }

    let mut values = vec![0.0; n];
    for (row, &b) in tableau.basis.iter().enumerate() {
        if b < n {
            values[b] = tableau.rows[row][tableau.rhs_col()].max(0.0);
        }
    }
    let objective = problem.objective.iter().zip(values.iter()).map(|(c, x)| c * x).sum();
    LpOutcome::Optimal { values, objective }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimizes_single_variable_against_a_lower_bound() {
        // minimize x subject to x >= 5, i.e. -x <= -5, 0 <= x <= 100
        let problem = LpProblem {
            num_vars: 1,
            objective: vec![1.0],
            constraints: vec![(vec![-1.0], -5.0), (vec![1.0], 100.0)],
        };
        match solve(&problem) {
            LpOutcome::Optimal { values, objective } => {
                assert!((values[0] - 5.0).abs() < 1e-6);
                assert!((objective - 5.0).abs() < 1e-6);
            }
            other => panic!("expected optimal, got {other:?}"),
        }
    }

    #[test]
    fn infeasible_when_bounds_contradict() {
        // x <= 1 and x >= 5 simultaneously
        let problem = LpProblem {
            num_vars: 1,
            objective: vec![1.0],
            constraints: vec![(vec![1.0], 1.0), (vec![-1.0], -5.0)],
        };
        assert_eq!(solve(&problem), LpOutcome::Infeasible);
    }

    #[test]
    fn two_variables_share_a_coupling_constraint() {
        // minimize x + y subject to x + y >= 4, x <= 10, y <= 10
        let problem = LpProblem {
            num_vars: 2,
            objective: vec![1.0, 1.0],
            constraints: vec![(vec![-1.0, -1.0], -4.0), (vec![1.0, 0.0], 10.0), (vec![0.0, 1.0], 10.0)],
        };
        match solve(&problem) {
            LpOutcome::Optimal { objective, .. } => assert!((objective - 4.0).abs() < 1e-6),
            other => panic!("expected optimal, got {other:?}"),
        }
    }
}
