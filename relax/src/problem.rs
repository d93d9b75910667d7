use bcdr_tpn::{BoundType, ConstraintId};

/// Identifies a continuous relaxation-amount variable of a [`MilpProblem`]
/// the same way [`bcdr_tpn::Relaxation`] keys its entries: a constraint's
/// lower bound can only be *shrunk* (`LbMinus`) and its upper bound only
/// *grown* (`UbPlus`) by a nonnegative amount (§4.5).
pub type VarKey = (ConstraintId, BoundType);

/// `coeffs . x <= rhs`, over the problem's variables by index into
/// [`MilpProblem::keys`].
#[derive(Clone, Debug)]
pub struct LinearInequality {
    pub coeffs: Vec<f64>,
    pub rhs: f64,
}

/// One repair disjunction (§4.5): satisfying any single alternative resolves
/// the temporal conflict it was built from.
#[derive(Clone, Debug)]
pub struct Disjunction {
    pub alternatives: Vec<LinearInequality>,
}

/// The relaxation search problem built by [`crate::encode::encode`] (§4.5,
/// §6 "MILP solver contract"): minimize a linear cost over bounded
/// relaxation-amount variables, subject to choosing at least one
/// alternative inequality from every disjunction.
///
/// The conceptual formulation gates each alternative behind a big-M
/// indicator (`compute_relaxation.py`'s `add_conflicts_to_model`); since no
/// indicator appears in the objective, and activating more than the minimum
/// number of alternatives can only shrink the feasible region of `x`,
/// an optimal solution always activates exactly one alternative per
/// disjunction (see [`crate::solver::BnbMilpSolver`]). This representation
/// already reflects that reduction: alternatives carry no indicator, and a
/// solver picks one per [`Disjunction`] directly.
#[derive(Clone, Debug, Default)]
pub struct MilpProblem {
    pub keys: Vec<VarKey>,
    pub upper_bounds: Vec<f64>,
    pub objective: Vec<f64>,
    pub disjunctions: Vec<Disjunction>,
}

impl MilpProblem {
    pub fn num_vars(&self) -> usize {
        self.keys.len()
    }
}

/// Result of [`crate::solver::MilpSolver::solve`].
#[derive(Clone, Debug, PartialEq)]
pub enum MilpOutcome {
    Optimal { values: Vec<f64>, objective: f64 },
    Infeasible,
}
