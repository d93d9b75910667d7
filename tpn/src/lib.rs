//! The Temporal Plan Network model: labelled constraints, activation,
//! relaxation and projection (§3, §4.4). Grounded structurally on the
//! teacher's STN arena (`stn/src/cesta.rs`'s stable-id constraint store) and
//! semantically on `tpnsolver.py`'s `TPNConstraint`.

pub mod constraint;
pub mod event;
pub mod network;
pub mod relaxation;

pub use constraint::{BoundType, ConstraintId, TemporalConflict, TemporalInequality, TemporalTerm, TpnConstraint};
pub use event::EventId;
pub use network::{DcChecker, Network};
pub use relaxation::Relaxation;
