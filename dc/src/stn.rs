use std::collections::HashMap;

use bcdr_model::PartialAssignment;
use bcdr_tpn::{BoundType, ConstraintId, EventId, Network, TemporalInequality};

/// A directed edge of the STN distance graph, tagged with the
/// `(ConstraintId, BoundType)` term it represents, so a negative cycle found
/// over these edges can be reported back as a [`bcdr_tpn::TemporalConflict`].
pub(crate) struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
    pub term: (ConstraintId, BoundType),
}

/// Builds the distance graph for the constraints of `network` active under
/// `assignment`: the standard two-edge encoding of `lb <= end - start <=
/// ub` used by Cesta & Oddi's incremental propagation (`stn/src/cesta.rs`):
/// `start -> end` weighted `ub` (term `UB+`), `end -> start` weighted `-lb`
/// (term `LB-`).
pub(crate) fn build_graph(network: &Network, assignment: &PartialAssignment) -> (usize, Vec<Edge>) {
    let mut index_of: HashMap<EventId, usize> = HashMap::new();
    let mut next_index = |ev: EventId, index_of: &mut HashMap<EventId, usize>| -> usize {
        let n = index_of.len();
        *index_of.entry(ev).or_insert(n)
    };
    let mut edges = Vec::new();
    for (id, c) in network.iter() {
        if !c.is_activated(assignment) {
            continue;
        }
        let s = next_index(c.start, &mut index_of);
        let e = next_index(c.end, &mut index_of);
        edges.push(Edge {
            from: s,
            to: e,
            weight: c.ub,
            term: (id, BoundType::UbPlus),
        });
        edges.push(Edge {
            from: e,
            to: s,
            weight: -c.lb,
            term: (id, BoundType::LbMinus),
        });
    }
    (index_of.len(), edges)
}

/// Bellman-Ford negative-cycle detection. Runs `n` relaxation passes; if the
/// `n`-th pass still relaxes an edge, the relaxed node is reachable from a
/// negative cycle. Walking `n` predecessor steps back from it is guaranteed
/// to land strictly inside the cycle (it has at most `n` nodes), after which
/// following predecessors collects the cycle's edges.
pub(crate) fn find_negative_cycle(n: usize, edges: &[Edge]) -> Option<Vec<usize>> {
    if n == 0 {
        return None;
    }
    let mut dist = vec![0.0_f64; n];
    let mut pred_edge: Vec<Option<usize>> = vec![None; n];
    let mut last_relaxed = None;
    for _ in 0..n {
        last_relaxed = None;
        for (ei, edge) in edges.iter().enumerate() {
            let candidate = dist[edge.from] + edge.weight;
            if candidate < dist[edge.to] {
                dist[edge.to] = candidate;
                pred_edge[edge.to] = Some(ei);
                last_relaxed = Some(edge.to);
            }
        }
        if last_relaxed.is_none() {
            return None;
        }
    }
    let mut v = last_relaxed.expect("loop only exits early when no relaxation happened");
    for _ in 0..n {
        v = edges[pred_edge[v].expect("a node reached by relaxation has a predecessor edge")].from;
    }
    let start = v;
    let mut cycle = Vec::new();
    loop {
        let ei = pred_edge[v].expect("cycle node has a predecessor edge");
        cycle.push(ei);
        v = edges[ei].from;
        if v == start {
            break;
        }
    }
    cycle.reverse();
    Some(cycle)
}

pub(crate) fn cycle_to_inequality(edges: &[Edge], cycle: &[usize]) -> TemporalInequality {
    cycle.iter().map(|&ei| edges[ei].term).collect()
}
