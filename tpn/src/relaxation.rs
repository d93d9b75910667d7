use std::collections::{HashMap, HashSet};

use crate::constraint::{BoundType, ConstraintId};
use crate::network::Network;

/// A mapping `(TPNConstraint, {LB-, UB+}) -> non-negative real` plus the
/// resulting objective value (§3 glossary): how much to shrink a lower
/// bound or expand an upper bound, and the summed `amount * lin_cost`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Relaxation {
    amounts: HashMap<(ConstraintId, BoundType), f64>,
    pub objective: f64,
}

impl Relaxation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, constraint: ConstraintId, bound: BoundType, amount: f64) {
        if amount > 0.0 {
            self.amounts.insert((constraint, bound), amount);
        }
    }

    pub fn get(&self, constraint: ConstraintId, bound: BoundType) -> f64 {
        self.amounts.get(&(constraint, bound)).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(ConstraintId, BoundType), &f64)> {
        self.amounts.iter()
    }

    /// Composes two relaxations by taking the element-wise max of deltas,
    /// then recomputing the objective from `network`'s linear costs. The
    /// reference implementation's composition indexes the right-hand side
    /// through the left-hand side's keys (apparently a copy-paste bug); this
    /// implements the corrected element-wise max over the union of keys.
    pub fn compose(&self, other: &Relaxation, network: &Network) -> Relaxation {
        let mut merged = Relaxation::new();
        let keys: HashSet<(ConstraintId, BoundType)> = self
            .amounts
            .keys()
            .chain(other.amounts.keys())
            .copied()
            .collect();
        for (constraint, bound) in keys {
            let amount = self.get(constraint, bound).max(other.get(constraint, bound));
            merged.set(constraint, bound, amount);
        }
        merged.objective = merged
            .amounts
            .iter()
            .map(|(&(constraint, bound), &amount)| {
                let c = network.get(constraint);
                let cost = match bound {
                    BoundType::LbMinus => c.lb_lin_cost,
                    BoundType::UbPlus => c.ub_lin_cost,
                    BoundType::LbPlus | BoundType::UbMinus => 0.0,
                };
                amount * cost
            })
            .sum();
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::TpnConstraint;
    use crate::event::EventId;

    fn sample_network() -> (Network, ConstraintId) {
        let mut n = Network::new();
        let s = EventId::from_u32(0);
        let e = EventId::from_u32(1);
        let id = n.add_constraint(TpnConstraint::new(s, e, None, 1.0, 10.0, "c", true, true, 2.0, 3.0));
        (n, id)
    }

    #[test]
    fn composition_takes_element_wise_max_and_recomputes_objective() {
        let (network, id) = sample_network();
        let mut a = Relaxation::new();
        a.set(id, BoundType::LbMinus, 1.0);
        let mut b = Relaxation::new();
        b.set(id, BoundType::LbMinus, 3.0);
        b.set(id, BoundType::UbPlus, 2.0);
        let composed = a.compose(&b, &network);
        assert_eq!(composed.get(id, BoundType::LbMinus), 3.0);
        assert_eq!(composed.get(id, BoundType::UbPlus), 2.0);
        assert_eq!(composed.objective, 3.0 * 2.0 + 2.0 * 3.0);
    }
}
