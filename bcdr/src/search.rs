use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashSet};

use bcdr_model::{manifests, Assignment, PartialAssignment, VarId};
use bcdr_relax::{compute_relaxation, MilpSolver};
use bcdr_tpn::{DcChecker, Relaxation, TemporalConflict};

use crate::conflicts::{constituent_kernels, learn_conflict, propositional_conflict};
use crate::outcome::Outcome;
use crate::problem::Problem;

/// One frontier node (§4.7): a partial assignment, the relaxation committed
/// to so far, and which Known Conflicts have already been resolved along
/// this branch (so a conflict doesn't trigger [`crate::conflicts`] splitting
/// twice for the same node).
#[derive(Clone, Debug)]
struct QueueEntry {
    priority: f64,
    assignment: PartialAssignment,
    relaxation: Relaxation,
    resolved_conflicts: Vec<PartialAssignment>,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}
impl Eq for QueueEntry {}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueueEntry {
    // BinaryHeap is a max-heap, so the highest-priority node pops first --
    // no negation trick needed (unlike a `heapq`-based min-heap).
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.total_cmp(&other.priority)
    }
}

/// `sum(rewards[var][value] for var=value in assignment) - relaxation.objective`
/// (§4.7). Doubles as the best-first admissible heuristic: unassigned
/// decision variables contribute nothing yet, and committing to more
/// relaxation can only lower this value, so it never underestimates what a
/// completion of `assignment` could still achieve.
fn reward(problem: &Problem, assignment: &PartialAssignment, relaxation: &Relaxation) -> f64 {
    let mut total = 0.0;
    for a in assignment {
        if let Some(values) = problem.rewards.get(&a.var) {
            total += values.get(&a.value).copied().unwrap_or(0.0);
        }
    }
    total - relaxation.objective
}

fn is_complete(assignment: &PartialAssignment, decision_vars: &HashSet<VarId>) -> bool {
    let assigned: HashSet<VarId> = assignment.iter().map(|a| a.var).collect();
    &assigned == decision_vars
}

fn resolve_known_conflict<'a>(
    assignment: &PartialAssignment,
    resolved: &[PartialAssignment],
    known: &'a [PartialAssignment],
) -> Option<&'a PartialAssignment> {
    known.iter().find(|gamma| manifests(assignment, gamma) && !resolved.contains(gamma))
}

/// Outcome of trying to restore dynamic controllability by relaxation.
enum Repair {
    /// The network was already controllable; nothing needed relaxing.
    NotNeeded,
    Repaired(Relaxation),
    /// The MILP has no feasible point; these are the conflicts it failed on.
    Infeasible(Vec<TemporalConflict>),
}

/// Dynamic controllability against `network` projected through `relaxation`
/// (§4.6). When uncontrollable, looks for an additional relaxation --
/// computed against the unprojected network, the space [`bcdr_relax`]'s
/// encoding and [`bcdr_tpn::Network::project`] both expect -- and composes
/// it onto the existing one.
fn attempt_repair(
    problem: &Problem,
    assignment: &PartialAssignment,
    relaxation: &Relaxation,
    dc: &mut dyn DcChecker,
    milp: &mut dyn MilpSolver,
) -> Repair {
    let projected = problem.network.project(Some(relaxation));
    let (controllable, temporal_conflicts) = dc.is_controllable(&projected, assignment);
    if controllable {
        return Repair::NotNeeded;
    }
    match compute_relaxation(&temporal_conflicts, &problem.network, milp) {
        Some(additional) => Repair::Repaired(relaxation.compose(&additional, &problem.network)),
        None => Repair::Infeasible(temporal_conflicts),
    }
}

/// Composes a relaxation against already-known `temporal_conflicts`,
/// skipping the redundant DC-check [`attempt_repair`] would otherwise make.
fn repair_from_conflicts(
    problem: &Problem,
    relaxation: &Relaxation,
    temporal_conflicts: &[TemporalConflict],
    milp: &mut dyn MilpSolver,
) -> Option<Relaxation> {
    let additional = compute_relaxation(temporal_conflicts, &problem.network, milp)?;
    Some(relaxation.compose(&additional, &problem.network))
}

pub(crate) struct SearchStats {
    /// Size of the Known Conflict Set antichain once the frontier emptied or
    /// a solution was accepted.
    pub known_conflicts: usize,
    /// Number of *distinct* complete assignments ever pushed onto the
    /// frontier -- bounded by `|domain|^|decision_vars|` as long as a given
    /// complete assignment is never re-derived via a different branch once
    /// it has already been explored (§7).
    pub distinct_complete_assignments: usize,
}

pub(crate) fn run(problem: &Problem, dc: &mut dyn DcChecker, milp: &mut dyn MilpSolver) -> Outcome {
    run_instrumented(problem, dc, milp).0
}

/// Core search loop, returning bookkeeping alongside the [`Outcome`] so unit
/// tests can assert on the Known Conflict Set and the number of distinct
/// complete assignments explored without needing visibility `Problem::run`
/// doesn't expose.
pub(crate) fn run_instrumented(problem: &Problem, dc: &mut dyn DcChecker, milp: &mut dyn MilpSolver) -> (Outcome, SearchStats) {
    let decision_vars: HashSet<VarId> = problem.model.get_decision_variables().into_iter().collect();
    let cnf = bcdr_cnf::to_cnf(&problem.model.all_constraints());

    let mut known_conflicts: Vec<PartialAssignment> = Vec::new();
    let mut residual_conflicts: BTreeMap<PartialAssignment, Vec<TemporalConflict>> = BTreeMap::new();
    // Every assignment ever generated by SPLIT-ON-VARIABLE or
    // SPLIT-ON-CONFLICT, so a later constituent-kernel split can never
    // regenerate a sibling branch already sitting in (or already popped
    // from) the frontier. Without this, two independently-learned,
    // non-relaxable conflicts on a small domain can bounce a kernel split
    // back and forth between each other's alternatives forever.
    let mut branched: BTreeSet<PartialAssignment> = BTreeSet::new();
    let mut distinct_complete_assignments = 0usize;
    let mut frontier = BinaryHeap::new();
    frontier.push(QueueEntry {
        priority: reward(problem, &PartialAssignment::new(), &Relaxation::new()),
        assignment: PartialAssignment::new(),
        relaxation: Relaxation::new(),
        resolved_conflicts: Vec::new(),
    });

    // Pushes a SPLIT-ON-VARIABLE or SPLIT-ON-CONFLICT child, skipping it if
    // that exact assignment has already been branched to before.
    let push_branch = |frontier: &mut BinaryHeap<QueueEntry>,
                            branched: &mut BTreeSet<PartialAssignment>,
                            distinct_complete_assignments: &mut usize,
                            assignment: PartialAssignment,
                            relaxation: Relaxation,
                            resolved_conflicts: Vec<PartialAssignment>| {
        if !branched.insert(assignment.clone()) {
            return;
        }
        if is_complete(&assignment, &decision_vars) {
            *distinct_complete_assignments += 1;
        }
        frontier.push(QueueEntry {
            priority: reward(problem, &assignment, &relaxation),
            assignment,
            relaxation,
            resolved_conflicts,
        });
    };

    while let Some(entry) = frontier.pop() {
        tracing::debug!(assignment = ?entry.assignment, priority = entry.priority, "popped search node");

        if let Some(conflict) = resolve_known_conflict(&entry.assignment, &entry.resolved_conflicts, &known_conflicts) {
            let conflict = conflict.clone();
            // SPLIT-ON-CONFLICT: reassign a member variable to any other
            // domain value (§4.3 "constituent kernel").
            for kernel in constituent_kernels(&conflict, &problem.model) {
                let mut next: PartialAssignment = entry.assignment.iter().filter(|a| a.var != kernel.var).cloned().collect();
                next.insert(kernel);
                push_branch(
                    &mut frontier,
                    &mut branched,
                    &mut distinct_complete_assignments,
                    next,
                    entry.relaxation.clone(),
                    entry.resolved_conflicts.clone(),
                );
            }
            // Additionally, try to repair the conflict by relaxation (§4.6):
            // if the network is already controllable or a relaxation
            // restores it, this node's conflict is resolved and it's
            // requeued with the same assignment; if no relaxation can fix
            // it, the conflicts are recorded as residual and no repair
            // child is emitted.
            match attempt_repair(problem, &entry.assignment, &entry.relaxation, dc, milp) {
                Repair::NotNeeded => {}
                Repair::Repaired(relaxed) => {
                    let mut resolved = entry.resolved_conflicts.clone();
                    resolved.push(conflict);
                    frontier.push(QueueEntry {
                        priority: reward(problem, &entry.assignment, &relaxed),
                        assignment: entry.assignment.clone(),
                        relaxation: relaxed,
                        resolved_conflicts: resolved,
                    });
                }
                Repair::Infeasible(temporal_conflicts) => {
                    residual_conflicts.entry(entry.assignment.clone()).or_default().extend(temporal_conflicts);
                }
            }
            continue;
        }

        if !is_complete(&entry.assignment, &decision_vars) {
            let assigned: HashSet<VarId> = entry.assignment.iter().map(|a| a.var).collect();
            let var = *decision_vars
                .difference(&assigned)
                .min()
                .expect("is_complete is false, so at least one decision variable remains unassigned");
            for value in problem.model.variable(var).domain.clone() {
                let mut next = entry.assignment.clone();
                next.insert(Assignment::new(var, value));
                push_branch(
                    &mut frontier,
                    &mut branched,
                    &mut distinct_complete_assignments,
                    next,
                    entry.relaxation.clone(),
                    entry.resolved_conflicts.clone(),
                );
            }
            continue;
        }

        match bcdr_sat::check_consistency(&cnf, &entry.assignment, &decision_vars) {
            Err(err) => {
                tracing::warn!(%err, "unit propagation re-assigned a literal; dropping node");
            }
            Ok(bcdr_sat::SatOutcome::Unsatisfiable { conflict }) => {
                // An empty conflict would mean the propositional model is
                // unsatisfiable on its own, independent of any assignment;
                // nothing would ever change it, so drop the node instead of
                // looping on it forever.
                if !conflict.is_empty() {
                    learn_conflict(&mut known_conflicts, conflict);
                    frontier.push(entry);
                }
            }
            Ok(bcdr_sat::SatOutcome::Satisfiable { .. }) => {
                let projected = problem.network.project(Some(&entry.relaxation));
                let (controllable, temporal_conflicts) = dc.is_controllable(&projected, &entry.assignment);
                if controllable {
                    return (
                        Outcome::Solved {
                            reward: reward(problem, &entry.assignment, &entry.relaxation),
                            assignment: entry.assignment,
                            relaxation: entry.relaxation,
                        },
                        SearchStats {
                            known_conflicts: known_conflicts.len(),
                            distinct_complete_assignments,
                        },
                    );
                }

                // Project each temporal conflict to the decision-variable
                // assignment that caused it and learn it (§4.6 -> §4.3);
                // the actual repair-by-relaxation attempt happens the next
                // time this assignment is popped, now matching a known
                // conflict.
                let mut attributable = false;
                for temporal_conflict in &temporal_conflicts {
                    let conflict = propositional_conflict(temporal_conflict, &problem.network, &entry.assignment);
                    if !conflict.is_empty() {
                        attributable = true;
                        learn_conflict(&mut known_conflicts, conflict);
                    }
                }
                if attributable {
                    frontier.push(entry);
                } else {
                    // No decision variable could ever change this
                    // constraint's activation, so it can never become a
                    // known conflict and never gets a second chance through
                    // the branch above; only relaxation could still help,
                    // and this is the only place that will ever try.
                    match repair_from_conflicts(problem, &entry.relaxation, &temporal_conflicts, milp) {
                        Some(relaxed) => {
                            frontier.push(QueueEntry {
                                priority: reward(problem, &entry.assignment, &relaxed),
                                assignment: entry.assignment.clone(),
                                relaxation: relaxed,
                                resolved_conflicts: entry.resolved_conflicts.clone(),
                            });
                        }
                        None => {
                            residual_conflicts.entry(entry.assignment.clone()).or_default().extend(temporal_conflicts);
                        }
                    }
                }
            }
        }
    }

    (
        Outcome::Unsolvable { residual_conflicts },
        SearchStats {
            known_conflicts: known_conflicts.len(),
            distinct_complete_assignments,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcdr_dc::BellmanFordDcChecker;
    use bcdr_model::VarKind;
    use bcdr_relax::BnbMilpSolver;

    /// Two decision variables linked by a single biconditional: every
    /// completion other than the two that satisfy it hits the same Boolean
    /// conflict restated over different concrete values. A correct antichain
    /// learns it exactly once, and a correctly deduplicated frontier never
    /// re-derives a complete assignment it has already branched to, so the
    /// number of distinct complete assignments explored stays within
    /// `|domain|^|decision_vars| = 2^2 = 4`.
    #[test]
    fn conflict_learned_once_and_frontier_stays_within_the_domain_product() {
        let mut p = Problem::new();
        let a = p.add_variable("a", VarKind::FiniteDomain, Some(vec!["x".into(), "y".into()]), true).unwrap();
        let b = p.add_variable("b", VarKind::FiniteDomain, Some(vec!["x".into(), "y".into()]), true).unwrap();
        p.add_constraint("a=x <=> b=x").unwrap();
        p.set_reward(a, "x", 1.0);
        p.set_reward(b, "y", 1.0);

        let mut dc = BellmanFordDcChecker::new();
        let mut milp = BnbMilpSolver::new();
        let (outcome, stats) = run_instrumented(&p, &mut dc, &mut milp);

        assert!(matches!(outcome, Outcome::Solved { .. }), "a=y,b=y (or a=x,b=x) satisfies the biconditional");
        assert_eq!(stats.known_conflicts, 1);
        assert!(
            stats.distinct_complete_assignments <= 4,
            "expected at most |domain|^|decision_vars| = 4 distinct complete assignments, got {}",
            stats.distinct_complete_assignments
        );
    }
}
