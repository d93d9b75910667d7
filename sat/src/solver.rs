use std::collections::{BTreeSet, HashMap, HashSet};

use bcdr_cnf::{Clause, ClauseId, ClausePool, Literal};
use bcdr_model::{Assignment, PartialAssignment, VarId};

use crate::error::LogicError;

/// Result of [`check_consistency`] (§4.3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SatOutcome {
    /// The positive decision-variable literals of a satisfying model.
    Satisfiable { model: PartialAssignment },
    /// A minimal-effort assignment conflict: a set of decision-variable
    /// assignments whose joint presence was proved infeasible.
    Unsatisfiable { conflict: PartialAssignment },
}

/// DPLL with unit propagation over a fixed clause pool (§4.3), grounded on
/// `cda_star/sat_solver.py`'s propagate-then-branch structure and on the
/// teacher's `Clause`/original-literal-set provenance scheme
/// (`sat/src/clause.rs`).
///
/// `current_assignments` are asserted as axioms (no supporting clause);
/// `decision_vars` restricts conflict and model extraction to assignments of
/// decision variables, per the returned-conflict contract.
pub fn check_consistency(
    pool: &ClausePool,
    current_assignments: &PartialAssignment,
    decision_vars: &HashSet<VarId>,
) -> Result<SatOutcome, LogicError> {
    let mut assigned = BTreeSet::new();
    let mut support: HashMap<Literal, Option<ClauseId>> = HashMap::new();
    for a in current_assignments {
        let lit = Literal::positive(a.clone());
        assigned.insert(lit.clone());
        support.insert(lit, None);
    }
    let active: HashMap<ClauseId, Clause> = pool.iter().map(|(id, c)| (id, c.clone())).collect();
    search(pool, active, assigned, support, decision_vars, current_assignments)
}

enum PropagateResult {
    Conflict(ClauseId),
    Exhausted,
}

/// Runs unit propagation to a fixed point. Equivalent to the FIFO-queue
/// formulation of §4.3 (seed on unit clauses, enqueue clauses whose
/// complement was just falsified): a queue only ever re-examines clauses
/// whose literal set could have shrunk, which is exactly what a full rescan
/// achieves a pass later. A queue would converge in fewer scans; this
/// full-rescan form is simpler to get right and is not on a hot path here.
fn propagate(
    active: &mut HashMap<ClauseId, Clause>,
    assigned: &mut BTreeSet<Literal>,
    support: &mut HashMap<Literal, Option<ClauseId>>,
) -> Result<PropagateResult, LogicError> {
    loop {
        let mut satisfied = Vec::new();
        let mut derived: Vec<(Literal, ClauseId)> = Vec::new();
        for (&id, clause) in active.iter_mut() {
            if clause.is_satisfied_by(assigned) {
                satisfied.push(id);
                continue;
            }
            clause.remove_false_literals(assigned);
            if clause.is_empty() {
                return Ok(PropagateResult::Conflict(id));
            }
            if clause.len() == 1 {
                let lit = clause.literals.iter().next().cloned().expect("len == 1");
                if assigned.contains(&lit.negate()) {
                    return Err(LogicError::LiteralReassigned(lit.to_string()));
                }
                if !assigned.contains(&lit) {
                    derived.push((lit, id));
                }
            }
        }
        for id in satisfied {
            active.remove(&id);
        }
        if derived.is_empty() {
            return Ok(PropagateResult::Exhausted);
        }
        for (lit, supporting_clause) in derived {
            if assigned.contains(&lit) {
                continue;
            }
            assigned.insert(lit.clone());
            support.insert(lit, Some(supporting_clause));
        }
    }
}

fn search(
    pool: &ClausePool,
    mut active: HashMap<ClauseId, Clause>,
    mut assigned: BTreeSet<Literal>,
    mut support: HashMap<Literal, Option<ClauseId>>,
    decision_vars: &HashSet<VarId>,
    root_assignments: &PartialAssignment,
) -> Result<SatOutcome, LogicError> {
    match propagate(&mut active, &mut assigned, &mut support)? {
        PropagateResult::Conflict(empty_clause) => Ok(SatOutcome::Unsatisfiable {
            conflict: trace_conflict(empty_clause, pool, &support, decision_vars),
        }),
        PropagateResult::Exhausted => {
            if active.is_empty() {
                return Ok(SatOutcome::Satisfiable {
                    model: extract_model(&assigned, decision_vars),
                });
            }
            let atom = pick_unassigned_atom(&active)
                .expect("a non-empty active clause always has an unassigned literal after propagation");
            for polarity in [false, true] {
                let lit = Literal::new(atom.clone(), polarity);
                let mut branch_assigned = assigned.clone();
                let mut branch_support = support.clone();
                branch_assigned.insert(lit.clone());
                branch_support.insert(lit, None);
                match search(
                    pool,
                    active.clone(),
                    branch_assigned,
                    branch_support,
                    decision_vars,
                    root_assignments,
                )? {
                    sat @ SatOutcome::Satisfiable { .. } => return Ok(sat),
                    SatOutcome::Unsatisfiable { .. } => continue,
                }
            }
            Ok(SatOutcome::Unsatisfiable {
                conflict: root_assignments
                    .iter()
                    .filter(|a| decision_vars.contains(&a.var))
                    .cloned()
                    .collect(),
            })
        }
    }
}

fn pick_unassigned_atom(active: &HashMap<ClauseId, Clause>) -> Option<Assignment> {
    active
        .values()
        .find_map(|c| c.literals.iter().next().map(|l| l.atom.clone()))
}

fn extract_model(assigned: &BTreeSet<Literal>, decision_vars: &HashSet<VarId>) -> PartialAssignment {
    assigned
        .iter()
        .filter(|l| l.positive && decision_vars.contains(&l.atom.var))
        .map(|l| l.atom.clone())
        .collect()
}

/// Walks supports from an empty clause's original literal set back to their
/// forcing clauses, accumulating positive decision-variable assignments
/// (§4.3). `support` maps a forced-true literal to the clause that derived
/// it, or `None` for an axiom (asserted input or DPLL decision).
fn trace_conflict(
    empty_clause: ClauseId,
    pool: &ClausePool,
    support: &HashMap<Literal, Option<ClauseId>>,
    decision_vars: &HashSet<VarId>,
) -> PartialAssignment {
    let mut conflict = PartialAssignment::new();
    let mut seen: HashSet<Literal> = HashSet::new();
    let mut stack: Vec<Literal> = pool.get(empty_clause).literals_original.iter().cloned().collect();
    while let Some(falsified) = stack.pop() {
        let forced = falsified.negate();
        if !seen.insert(forced.clone()) {
            continue;
        }
        if forced.positive && decision_vars.contains(&forced.atom.var) {
            conflict.insert(forced.atom.clone());
        }
        if let Some(Some(supporting_clause)) = support.get(&forced) {
            stack.extend(pool.get(*supporting_clause).literals_original.iter().cloned());
        }
    }
    conflict
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcdr_cnf::to_cnf;
    use bcdr_model::{Problem, VarKind};

    fn binary_problem(names: &[&str]) -> (Problem, HashSet<VarId>) {
        let mut p = Problem::new();
        let mut decision_vars = HashSet::new();
        for n in names {
            let id = p.add_variable(*n, VarKind::Binary, None, true).unwrap();
            decision_vars.insert(id);
        }
        (p, decision_vars)
    }

    #[test]
    fn unit_propagation_alone_proves_satisfiability() {
        let (mut p, decision_vars) = binary_problem(&["x", "y"]);
        p.add_constraint("x => y").unwrap();
        let pool = to_cnf(&p.all_constraints());
        let mut current = PartialAssignment::new();
        current.insert(Assignment::new(p.variable_id("x").unwrap(), "True"));
        let outcome = check_consistency(&pool, &current, &decision_vars).unwrap();
        match outcome {
            SatOutcome::Satisfiable { model } => {
                assert!(model.contains(&Assignment::new(p.variable_id("y").unwrap(), "True")));
            }
            SatOutcome::Unsatisfiable { .. } => panic!("expected satisfiable"),
        }
    }

    #[test]
    fn contradictory_assignment_is_unsatisfiable_with_traced_conflict() {
        let (mut p, decision_vars) = binary_problem(&["x", "y"]);
        p.add_constraint("x => y").unwrap();
        let pool = to_cnf(&p.all_constraints());
        let mut current = PartialAssignment::new();
        let x = p.variable_id("x").unwrap();
        let y = p.variable_id("y").unwrap();
        current.insert(Assignment::new(x, "True"));
        current.insert(Assignment::new(y, "False"));
        let outcome = check_consistency(&pool, &current, &decision_vars).unwrap();
        match outcome {
            SatOutcome::Unsatisfiable { conflict } => {
                assert!(conflict.contains(&Assignment::new(x, "True")));
            }
            SatOutcome::Satisfiable { .. } => panic!("expected unsatisfiable"),
        }
    }

    #[test]
    fn structural_exactly_one_constraint_rejects_two_values_at_once() {
        let mut p = Problem::new();
        let v = p
            .add_variable("v", VarKind::FiniteDomain, Some(vec!["a".into(), "b".into(), "c".into()]), true)
            .unwrap();
        let mut decision_vars = HashSet::new();
        decision_vars.insert(v);
        let pool = to_cnf(&p.all_constraints());
        let mut current = PartialAssignment::new();
        current.insert(Assignment::new(v, "a"));
        current.insert(Assignment::new(v, "b"));
        let outcome = check_consistency(&pool, &current, &decision_vars).unwrap();
        assert!(matches!(outcome, SatOutcome::Unsatisfiable { .. }));
    }

    #[test]
    fn empty_pool_and_no_assignments_is_trivially_satisfiable() {
        let pool = ClausePool::new();
        let outcome = check_consistency(&pool, &PartialAssignment::new(), &HashSet::new()).unwrap();
        assert_eq!(
            outcome,
            SatOutcome::Satisfiable {
                model: PartialAssignment::new()
            }
        );
    }
}
