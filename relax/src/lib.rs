//! Relaxation engine (§4.5, §6 "MILP solver contract"), grounded on
//! `compute_relaxation.py`: encodes a batch of temporal conflicts as a
//! disjunctive linear program over bound-widening amounts and solves it for
//! a minimal-cost [`bcdr_tpn::Relaxation`].

mod compute;
mod encode;
mod error;
mod params;
mod problem;
mod simplex;
mod solver;

pub use compute::compute_relaxation;
pub use encode::encode;
pub use error::SolverFailure;
pub use params::{BIG_M, EPSILON, ROUND_DIGITS};
pub use problem::{Disjunction, LinearInequality, MilpOutcome, MilpProblem, VarKey};
pub use solver::{BnbMilpSolver, MilpSolver};
