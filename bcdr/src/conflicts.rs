use std::collections::HashSet;

use bcdr_model::{Assignment, Expr, PartialAssignment, VarId};
use bcdr_tpn::{Network, TemporalConflict};

/// Every decision variable an activation label mentions, walked directly
/// over the typed expression tree (the teacher's `TPNConstraint.get_variables`
/// instead walks a compiled CNF, an equivalent but pricier route since the
/// label is already kept as an [`Expr`] here).
fn variables_in(expr: &Expr, out: &mut HashSet<VarId>) {
    match expr {
        Expr::Var(v) => {
            out.insert(*v);
        }
        Expr::Assignment(a) => {
            out.insert(a.var);
        }
        Expr::Not(e) => variables_in(e, out),
        Expr::And(es) | Expr::Or(es) | Expr::Xor(es) => es.iter().for_each(|e| variables_in(e, out)),
        Expr::Implies(a, b) | Expr::Iff(a, b) => {
            variables_in(a, out);
            variables_in(b, out);
        }
    }
}

/// Maps a [`TemporalConflict`] back to the propositional conflict set it
/// manifests (§4.6 -> §4.3 bridge): the subset of `assignment` naming a
/// decision variable referenced by the activation label of any constraint
/// the conflict's inequalities mention. An unlabelled constraint (always
/// active) contributes no assignment — it can't be voted away by any choice.
pub fn propositional_conflict(conflict: &TemporalConflict, network: &Network, assignment: &PartialAssignment) -> PartialAssignment {
    let mut vars = HashSet::new();
    for inequality in conflict {
        for &(constraint_id, _bound) in inequality {
            if let Some(label) = &network.get(constraint_id).label {
                variables_in(label, &mut vars);
            }
        }
    }
    assignment.iter().filter(|a| vars.contains(&a.var)).cloned().collect()
}

/// The alternative assignments that would each, on their own, falsify
/// `conflict`'s shared cause (§4.3 "constituent kernel"): for every
/// assignment in the conflict, every other value its variable could take.
pub fn constituent_kernels(conflict: &PartialAssignment, model: &bcdr_model::Problem) -> Vec<Assignment> {
    let mut kernels = Vec::new();
    for assignment in conflict {
        let domain = &model.variable(assignment.var).domain;
        for value in domain {
            if *value != assignment.value {
                kernels.push(Assignment::new(assignment.var, value.clone()));
            }
        }
    }
    kernels
}

/// Learns `conflict` into the Known Conflict Set, maintained as an antichain
/// of inclusion-minimal conflicts (§4.3): a new conflict that is a superset
/// of one already known is redundant (dropped); a new conflict that is a
/// subset of previously known ones supersedes them (they are dropped in its
/// favor).
pub fn learn_conflict(known: &mut Vec<PartialAssignment>, conflict: PartialAssignment) {
    if known.iter().any(|gamma| gamma.is_subset(&conflict)) {
        return;
    }
    known.retain(|gamma| !conflict.is_subset(gamma));
    known.push(conflict);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcdr_model::{Problem, VarKind};

    fn sample_model() -> (Problem, VarId) {
        let mut p = Problem::new();
        let v = p
            .add_variable("choice", VarKind::FiniteDomain, Some(vec!["a".into(), "b".into(), "c".into()]), true)
            .unwrap();
        (p, v)
    }

    #[test]
    fn constituent_kernels_excludes_the_conflicting_value() {
        let (model, v) = sample_model();
        let mut conflict = PartialAssignment::new();
        conflict.insert(Assignment::new(v, "a"));
        let kernels = constituent_kernels(&conflict, &model);
        assert_eq!(kernels, vec![Assignment::new(v, "b"), Assignment::new(v, "c")]);
    }

    /// A conflict spanning two variables yields every other value of each,
    /// minus the value that caused the conflict in the first place.
    #[test]
    fn constituent_kernels_covers_every_member_variable() {
        let mut model = Problem::new();
        let a = model
            .add_variable("A", VarKind::FiniteDomain, Some(vec!["1".into(), "2".into(), "3".into()]), true)
            .unwrap();
        let b = model
            .add_variable("B", VarKind::FiniteDomain, Some(vec!["1".into(), "2".into(), "3".into()]), true)
            .unwrap();
        let mut conflict = PartialAssignment::new();
        conflict.insert(Assignment::new(a, "1"));
        conflict.insert(Assignment::new(b, "1"));

        let kernels = constituent_kernels(&conflict, &model);
        let expected = [
            Assignment::new(a, "2"),
            Assignment::new(a, "3"),
            Assignment::new(b, "2"),
            Assignment::new(b, "3"),
        ];
        assert_eq!(kernels.len(), expected.len());
        for e in &expected {
            assert!(kernels.contains(e), "missing kernel {e:?}");
        }
    }

    #[test]
    fn learning_a_subset_drops_existing_supersets() {
        let (_, v) = sample_model();
        let mut other = Problem::new();
        let w = other.add_variable("second", VarKind::Binary, None, true).unwrap();
        let mut known = Vec::new();
        let mut big = PartialAssignment::new();
        big.insert(Assignment::new(v, "a"));
        big.insert(Assignment::new(w, "True"));
        learn_conflict(&mut known, big.clone());
        assert_eq!(known, vec![big]);

        let mut small = PartialAssignment::new();
        small.insert(Assignment::new(v, "a"));
        learn_conflict(&mut known, small.clone());
        assert_eq!(known, vec![small]);
    }

    #[test]
    fn learning_a_redundant_superset_is_a_no_op() {
        let (_, v) = sample_model();
        let mut known = Vec::new();
        let mut small = PartialAssignment::new();
        small.insert(Assignment::new(v, "a"));
        learn_conflict(&mut known, small.clone());

        let mut big = small.clone();
        big.insert(Assignment::new(v, "b")); // not self-consistent, but fine for set-inclusion testing
        learn_conflict(&mut known, big);
        assert_eq!(known, vec![small]);
    }
}
