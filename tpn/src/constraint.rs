use bcdr_cnf::{to_cnf, ClausePool, Literal};
use bcdr_collections::create_id_type;
use bcdr_model::{Expr, PartialAssignment};

use crate::event::EventId;

create_id_type!(
    /// Stable index of a [`TpnConstraint`] within a [`crate::Network`];
    /// referenced from [`TemporalTerm`]s and from a [`crate::Relaxation`].
    ConstraintId
);

/// Which bound of a constraint a relaxation or conflict term refers to
/// (§3 glossary). Only `LbMinus`/`UbPlus` ever carry a non-zero amount in a
/// [`crate::Relaxation`] (the two directions a bound can be *widened*);
/// all four appear as conflict terms (§4.5).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BoundType {
    LbPlus,
    LbMinus,
    UbPlus,
    UbMinus,
}

impl std::fmt::Display for BoundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BoundType::LbPlus => "LB+",
            BoundType::LbMinus => "LB-",
            BoundType::UbPlus => "UB+",
            BoundType::UbMinus => "UB-",
        };
        write!(f, "{s}")
    }
}

/// One term of a [`TemporalInequality`]: a constraint's bound, signed by
/// [`BoundType`].
pub type TemporalTerm = (ConstraintId, BoundType);

/// A sum of [`TemporalTerm`]s whose bounds, combined, certify a contradiction
/// in the STN projection (§3 glossary).
pub type TemporalInequality = Vec<TemporalTerm>;

/// A disjunction of alternative [`TemporalInequality`] repairs: satisfying
/// any one of them resolves the conflict (§3 glossary).
pub type TemporalConflict = Vec<TemporalInequality>;

/// A labelled temporal constraint (§3, §4.4): `ub >= end - start >= lb` when
/// `label` (if any) is entailed by the current assignment.
#[derive(Clone, Debug)]
pub struct TpnConstraint {
    pub start: EventId,
    pub end: EventId,
    pub label: Option<Expr>,
    label_cnf: Option<ClausePool>,
    pub lb: f64,
    pub ub: f64,
    pub name: String,
    pub lb_relaxable: bool,
    pub ub_relaxable: bool,
    pub lb_lin_cost: f64,
    pub ub_lin_cost: f64,
}

impl TpnConstraint {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start: EventId,
        end: EventId,
        label: Option<Expr>,
        lb: f64,
        ub: f64,
        name: impl Into<String>,
        lb_relaxable: bool,
        ub_relaxable: bool,
        lb_lin_cost: f64,
        ub_lin_cost: f64,
    ) -> Self {
        // The label is compiled to CNF once at construction time (§4.4), not
        // on every `is_activated` call.
        let label_cnf = label.as_ref().map(|l| to_cnf(std::slice::from_ref(l)));
        TpnConstraint {
            start,
            end,
            label,
            label_cnf,
            lb,
            ub,
            name: name.into(),
            lb_relaxable,
            ub_relaxable,
            lb_lin_cost,
            ub_lin_cost,
        }
    }

    /// Active iff every clause of the (precomputed) label CNF is satisfied
    /// by some literal in `{(a, True) : a in assignment}`; unconditionally
    /// active with no label (§4.4).
    pub fn is_activated(&self, assignment: &PartialAssignment) -> bool {
        match &self.label_cnf {
            None => true,
            Some(cnf) => {
                let assigned: std::collections::BTreeSet<Literal> =
                    assignment.iter().cloned().map(Literal::positive).collect();
                cnf.iter().all(|(_, clause)| clause.is_satisfied_by(&assigned))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcdr_model::{Assignment, Problem, VarKind};

    #[test]
    fn unlabelled_constraint_is_always_active() {
        let c = TpnConstraint::new(
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
        );
        assert!(c.is_activated(&PartialAssignment::new()));
    }

    #[test]
    fn labelled_constraint_requires_entailment() {
        let mut p = Problem::new();
        p.add_variable("path_choice", VarKind::FiniteDomain, Some(vec!["one".into(), "two".into()]), true)
            .unwrap();
        let label = p.parse_expression("path_choice=one").unwrap();
        let c = TpnConstraint::new(
            EventId::from_u32(0),
            EventId::from_u32(1),
            Some(label),
            405.0,
            486.0,
            "c",
            false,
            false,
            0.0,
            0.0,
        );
        let var = p.variable_id("path_choice").unwrap();
        let mut active = PartialAssignment::new();
        active.insert(Assignment::new(var, "one"));
        assert!(c.is_activated(&active));

        let mut inactive = PartialAssignment::new();
        inactive.insert(Assignment::new(var, "two"));
        assert!(!c.is_activated(&inactive));
    }
}
