use bcdr_model::PartialAssignment;
use bcdr_tpn::{DcChecker, Network, TemporalConflict};

use crate::stn::{build_graph, cycle_to_inequality, find_negative_cycle};

/// Reference Dynamic Controllability checker (§4.6, §9 "Open question" on
/// DC reduction). This specification's `TPNConstraint` never introduces a
/// contingent (uncontrollable-duration) link, so Dynamic Controllability
/// reduces to ordinary Simple Temporal Network consistency: no wait/label
/// guards beyond the propositional activation already handled by
/// [`bcdr_tpn::TpnConstraint::is_activated`]. Builds a fresh distance graph
/// per call and runs Bellman-Ford negative-cycle detection, grounded on
/// `stn/src/cesta.rs`'s incremental Cesta & Oddi propagation (here run
/// non-incrementally, since each call checks a freshly projected network).
///
/// Reports at most one conflict per call: the first negative cycle found,
/// as a single-alternative [`TemporalConflict`]. A solver that searched for
/// several edge-disjoint negative cycles could report more (richer
/// disjunctions help the relaxation engine), which this reference backend
/// does not attempt.
#[derive(Default)]
pub struct BellmanFordDcChecker;

impl BellmanFordDcChecker {
    pub fn new() -> Self {
        Self
    }
}

impl DcChecker for BellmanFordDcChecker {
    fn is_controllable(
        &mut self,
        network: &Network,
        assignment: &PartialAssignment,
    ) -> (bool, Vec<TemporalConflict>) {
        let (num_events, edges) = build_graph(network, assignment);
        match find_negative_cycle(num_events, &edges) {
            None => (true, Vec::new()),
            Some(cycle) => {
                let inequality = cycle_to_inequality(&edges, &cycle);
                tracing::debug!(terms = inequality.len(), "negative cycle makes network uncontrollable");
                (false, vec![vec![inequality]])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcdr_tpn::{EventId, TpnConstraint};

    #[test]
    fn consistent_network_reports_controllable() {
        let mut n = Network::new();
        n.add_constraint(TpnConstraint::new(
            EventId::from_u32(0),
            EventId::from_u32(1),
            None,
            0.0,
            10.0,
            "c",
            false,
            false,
            0.0,
            0.0,
        ));
        let mut checker = BellmanFordDcChecker::new();
        let (ok, conflicts) = checker.is_controllable(&n, &PartialAssignment::new());
        assert!(ok);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn triangle_inequality_violation_is_detected() {
        let mut n = Network::new();
        let e1 = EventId::from_u32(0);
        let e2 = EventId::from_u32(1);
        let e3 = EventId::from_u32(2);
        n.add_constraint(TpnConstraint::new(e1, e2, None, 0.0, 10.0, "a", false, false, 0.0, 0.0));
        n.add_constraint(TpnConstraint::new(e2, e3, None, 0.0, 10.0, "b", false, false, 0.0, 0.0));
        n.add_constraint(TpnConstraint::new(e1, e3, None, 30.0, 1000.0, "c", false, false, 0.0, 0.0));
        let mut checker = BellmanFordDcChecker::new();
        let (ok, conflicts) = checker.is_controllable(&n, &PartialAssignment::new());
        assert!(!ok);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].len(), 1);
        assert!(!conflicts[0][0].is_empty());
    }

    #[test]
    fn inactive_constraint_is_excluded_from_the_check() {
        use bcdr_model::{Assignment, Problem, VarKind};

        let mut p = Problem::new();
        p.add_variable("choice", VarKind::FiniteDomain, Some(vec!["a".into(), "b".into()]), true)
            .unwrap();
        let label = p.parse_expression("choice=b").unwrap();

        let mut n = Network::new();
        let e1 = EventId::from_u32(0);
        let e2 = EventId::from_u32(1);
        n.add_constraint(TpnConstraint::new(
            e1,
            e2,
            Some(label),
            1000.0,
            1000.0,
            "never",
            false,
            false,
            0.0,
            0.0,
        ));
        let var = p.variable_id("choice").unwrap();
        let mut assignment = PartialAssignment::new();
        assignment.insert(Assignment::new(var, "a"));

        let mut checker = BellmanFordDcChecker::new();
        let (ok, conflicts) = checker.is_controllable(&n, &assignment);
        assert!(ok);
        assert!(conflicts.is_empty());
    }
}
