use bcdr_tpn::{Network, Relaxation, TemporalConflict};

use crate::encode::encode;
use crate::params::ROUND_DIGITS;
use crate::problem::MilpOutcome;
use crate::solver::MilpSolver;

/// Solves for a minimal-cost relaxation resolving every given conflict
/// (§4.5, §6), rounding amounts to [`ROUND_DIGITS`] decimal places
/// (`compute_relaxation.py`'s `ROUND_DIGITS`). `None` means no relaxation
/// satisfies every conflict: the encoded linear program is infeasible.
pub fn compute_relaxation(
    conflicts: &[TemporalConflict],
    network: &Network,
    solver: &mut dyn MilpSolver,
) -> Option<Relaxation> {
    if conflicts.is_empty() {
        return Some(Relaxation::new());
    }
    let problem = encode(conflicts, network);
    match solver.solve(&problem) {
        MilpOutcome::Infeasible => None,
        MilpOutcome::Optimal { values, objective } => {
            let scale = 10f64.powi(ROUND_DIGITS.get());
            let mut relaxation = Relaxation::new();
            for (key, value) in problem.keys.iter().zip(values.iter()) {
                relaxation.set(key.0, key.1, (value * scale).round() / scale);
            }
            relaxation.objective = (objective * scale).round() / scale;
            Some(relaxation)
        }
    }
}

#[cfg(test)]
mod tests {
    use bcdr_dc::BellmanFordDcChecker;
    use bcdr_model::PartialAssignment;
    use bcdr_tpn::{BoundType, DcChecker, EventId, TpnConstraint};

    use super::*;
    use crate::solver::BnbMilpSolver;

    /// The same triangle-inequality violation as `bcdr_dc`'s own test: two
    /// tight legs (`0..10`) and a closing edge whose lower bound (`30`) is
    /// too large to be consistent with them, yielding a real negative-cycle
    /// conflict rather than a hand-built one.
    fn triangle_network(ac_lb_relaxable: bool) -> Network {
        let mut network = Network::new();
        let e1 = EventId::from_u32(0);
        let e2 = EventId::from_u32(1);
        let e3 = EventId::from_u32(2);
        network.add_constraint(TpnConstraint::new(e1, e2, None, 0.0, 10.0, "ab", false, false, 0.0, 0.0));
        network.add_constraint(TpnConstraint::new(e2, e3, None, 0.0, 10.0, "bc", false, false, 0.0, 0.0));
        network.add_constraint(TpnConstraint::new(
            e1,
            e3,
            None,
            30.0,
            1000.0,
            "ac",
            ac_lb_relaxable,
            false,
            1.0,
            0.0,
        ));
        network
    }

    #[test]
    fn relaxes_a_violated_lower_bound() {
        let network = triangle_network(true);
        let mut checker = BellmanFordDcChecker::new();
        let (ok, conflicts) = checker.is_controllable(&network, &PartialAssignment::new());
        assert!(!ok);
        let mut solver = BnbMilpSolver::new();
        let relaxation = compute_relaxation(&conflicts, &network, &mut solver).expect("feasible");
        let ac = network.iter().find(|(_, c)| c.name == "ac").unwrap().0;
        assert!(relaxation.get(ac, BoundType::LbMinus) >= 10.0);
    }

    #[test]
    fn no_conflicts_is_the_empty_relaxation() {
        let network = Network::new();
        let mut solver = BnbMilpSolver::new();
        let relaxation = compute_relaxation(&[], &network, &mut solver).expect("trivially feasible");
        assert!(relaxation.is_empty());
    }

    #[test]
    fn no_relaxable_bound_is_infeasible() {
        let network = triangle_network(false);
        let mut checker = BellmanFordDcChecker::new();
        let (ok, conflicts) = checker.is_controllable(&network, &PartialAssignment::new());
        assert!(!ok);
        let mut solver = BnbMilpSolver::new();
        assert!(compute_relaxation(&conflicts, &network, &mut solver).is_none());
    }
}
