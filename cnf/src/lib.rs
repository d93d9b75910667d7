//! Conjunctive-normal-form conversion and clause storage (§4.2).
//!
//! Grounded on the teacher's clause representation (`sat/src/clause.rs`:
//! a `ClauseId` newtype plus a pool of `Clause`s) and on the CNF-conversion
//! algorithm of `cda_star/clauses.py`, rewritten against `bcdr_model`'s typed
//! [`bcdr_model::Expr`] tree instead of matching on Python class names.

pub mod clause;
pub mod convert;
pub mod literal;

pub use clause::{Clause, ClauseId, ClausePool};
pub use convert::to_cnf;
pub use literal::Literal;
