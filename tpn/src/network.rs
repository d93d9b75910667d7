use bcdr_collections::Store;
use bcdr_model::PartialAssignment;

use crate::constraint::{ConstraintId, TemporalConflict, TpnConstraint};
use crate::relaxation::Relaxation;

/// A Temporal Plan Network: a set of labelled temporal constraints over
/// events (§3). Grounded structurally on the teacher's `IncSTN` (an arena of
/// constraints indexed by stable ids, `stn/src/cesta.rs`), but holding
/// `TpnConstraint`s rather than STN edges — the STN itself is built fresh by
/// the DC checker from a network's currently-activated constraints.
#[derive(Clone, Debug, Default)]
pub struct Network {
    constraints: Store<ConstraintId, TpnConstraint>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_constraint(&mut self, constraint: TpnConstraint) -> ConstraintId {
        self.constraints.push(constraint)
    }

    pub fn get(&self, id: ConstraintId) -> &TpnConstraint {
        self.constraints.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConstraintId, &TpnConstraint)> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// The constraints active under `assignment` (§4.4).
    pub fn activated(&self, assignment: &PartialAssignment) -> Vec<(ConstraintId, &TpnConstraint)> {
        self.constraints
            .iter()
            .filter(|(_, c)| c.is_activated(assignment))
            .collect()
    }

    /// Produces a relaxed clone: `lb -= R[(c, LB-)]`, `ub += R[(c, UB+)]` for
    /// every constraint with a defined term in `relaxation` (§4.4). Iterates
    /// constraints in insertion order, so every `ConstraintId` in the
    /// returned network names the same constraint as in `self` — conflicts
    /// and relaxations computed against one are valid against the other.
    pub fn project(&self, relaxation: Option<&Relaxation>) -> Network {
        let mut projected = Network::new();
        for (id, c) in self.constraints.iter() {
            let mut clone = c.clone();
            if let Some(r) = relaxation {
                clone.lb -= r.get(id, crate::constraint::BoundType::LbMinus);
                clone.ub += r.get(id, crate::constraint::BoundType::UbPlus);
            }
            let new_id = projected.add_constraint(clone);
            debug_assert_eq!(
                usize::from(new_id),
                usize::from(id),
                "projection must preserve constraint ids"
            );
        }
        projected
    }
}

/// The external Dynamic Controllability checker contract (§6): `bool` plus
/// the list of temporal conflicts found when uncontrollable. Stateless
/// reference implementations (and incremental ones, which may cache state
/// between calls) both fit behind `&mut self`.
///
/// The conceptual contract is `is_controllable(activated_network)`; rather
/// than materialising a separate "activated network" value (which would
/// need to renumber `ConstraintId`s, breaking the identity a caller relies
/// on to re-apply a computed [`Relaxation`] via [`Network::project`]), the
/// assignment is passed alongside the full network and activation is
/// applied internally per constraint.
pub trait DcChecker {
    fn is_controllable(
        &mut self,
        network: &Network,
        assignment: &PartialAssignment,
    ) -> (bool, Vec<TemporalConflict>);
}
