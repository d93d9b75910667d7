use std::collections::BTreeMap;

use bcdr_model::PartialAssignment;
use bcdr_tpn::{Relaxation, TemporalConflict};

/// Result of [`crate::Problem::run`] (§4.7, §6): either a complete,
/// self-consistent, boolean- and temporally-consistent assignment together
/// with the relaxation it required and the reward it earns, or a witness
/// that none exists.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Solved {
        assignment: PartialAssignment,
        relaxation: Relaxation,
        reward: f64,
    },
    /// The frontier emptied without finding a consistent, controllable
    /// completion. `residual_conflicts` is keyed by the assignment each
    /// group of temporal conflicts was recorded against (§6): the witnesses
    /// that, for that particular completion, no further relaxation could
    /// have restored controllability.
    Unsolvable {
        residual_conflicts: BTreeMap<PartialAssignment, Vec<TemporalConflict>>,
    },
}
