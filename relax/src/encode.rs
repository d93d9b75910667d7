use std::collections::HashMap;

use bcdr_tpn::{BoundType, Network, TemporalConflict};

use crate::params::{BIG_M, EPSILON};
use crate::problem::{Disjunction, LinearInequality, MilpProblem, VarKey};

/// Builds the relaxation search problem for a batch of temporal conflicts
/// (§4.5), grounded on `compute_relaxation.py`'s `conflict_to_linconstr` and
/// `add_conflicts_to_model`. Each [`bcdr_tpn::TemporalInequality`] becomes
/// one [`LinearInequality`] alternative of a [`Disjunction`]; its variables
/// are the `(ConstraintId, LbMinus | UbPlus)` relaxation amounts referenced
/// by its relaxable terms.
pub fn encode(conflicts: &[TemporalConflict], network: &Network) -> MilpProblem {
    let eps = EPSILON.get();
    let big_m = BIG_M.get();

    let mut key_index: HashMap<VarKey, usize> = HashMap::new();
    let mut keys: Vec<VarKey> = Vec::new();
    let mut objective: Vec<f64> = Vec::new();

    let mut raw_disjunctions: Vec<Vec<(HashMap<VarKey, f64>, f64)>> = Vec::with_capacity(conflicts.len());
    for conflict in conflicts {
        let mut alternatives = Vec::with_capacity(conflict.len());
        for inequality in conflict {
            // One pass accumulating the constant term and each relaxable
            // term's coefficient, mirroring `conflict_to_linconstr`'s
            // `>= -total_sum + EPSILON` construction.
            let mut total_sum = 0.0;
            let mut coeffs: HashMap<VarKey, f64> = HashMap::new();
            for &(constraint_id, bound) in inequality {
                let c = network.get(constraint_id);
                match bound {
                    BoundType::UbPlus => {
                        total_sum += c.ub;
                        if c.ub_relaxable {
                            *coeffs.entry((constraint_id, BoundType::UbPlus)).or_insert(0.0) += 1.0;
                        }
                    }
                    BoundType::UbMinus => {
                        total_sum -= c.ub;
                        if c.ub_relaxable {
                            *coeffs.entry((constraint_id, BoundType::UbPlus)).or_insert(0.0) -= 1.0;
                        }
                    }
                    BoundType::LbPlus => {
                        total_sum += c.lb;
                        if c.lb_relaxable {
                            *coeffs.entry((constraint_id, BoundType::LbMinus)).or_insert(0.0) -= 1.0;
                        }
                    }
                    BoundType::LbMinus => {
                        total_sum -= c.lb;
                        if c.lb_relaxable {
                            *coeffs.entry((constraint_id, BoundType::LbMinus)).or_insert(0.0) += 1.0;
                        }
                    }
                }
            }
            for key in coeffs.keys().copied() {
                key_index.entry(key).or_insert_with(|| {
                    let idx = keys.len();
                    keys.push(key);
                    let c = network.get(key.0);
                    objective.push(match key.1 {
                        BoundType::LbMinus => c.lb_lin_cost,
                        BoundType::UbPlus => c.ub_lin_cost,
                        BoundType::LbPlus | BoundType::UbMinus => 0.0,
                    });
                    idx
                });
            }
            // `LinearConstraint::canonicalize`: a `>=` constraint becomes
            // `<=` by negating both sides.
            let rhs = total_sum - eps;
            alternatives.push((coeffs, rhs));
        }
        raw_disjunctions.push(alternatives);
    }

    let num_vars = keys.len();
    let disjunctions = raw_disjunctions
        .into_iter()
        .map(|alternatives| Disjunction {
            alternatives: alternatives
                .into_iter()
                .map(|(coeffs, rhs)| {
                    let mut vec_coeffs = vec![0.0; num_vars];
                    for (key, value) in coeffs {
                        vec_coeffs[key_index[&key]] = -value;
                    }
                    LinearInequality { coeffs: vec_coeffs, rhs }
                })
                .collect(),
        })
        .collect();

    MilpProblem {
        upper_bounds: vec![big_m; num_vars],
        objective,
        disjunctions,
        keys,
    }
}
