//! Best-first, conflict-directed hybrid search over a propositional problem
//! coupled to a temporal network (§4.7, §6), grounded on `bcdr.py`'s
//! `BCDRSolver` and `tpnsolver.py`'s base `TPNSolver`.
//!
//! [`Problem`] is the single entry point: build it up with variables,
//! propositional constraints, temporal constraints and rewards, then call
//! [`Problem::run`].

mod conflicts;
mod error;
mod outcome;
mod problem;
mod search;

pub use bcdr_model::{PartialAssignment, VarId, VarKind};
pub use bcdr_relax::MilpSolver;
pub use bcdr_tpn::{ConstraintId, DcChecker, EventId, Relaxation};

pub use error::BuildError;
pub use outcome::Outcome;
pub use problem::Problem;
