//! Small arena-ownership utilities shared by every BCDR crate.
//!
//! Variables, clauses and temporal constraints all outlive the assignments,
//! literals and conflicts built from them. Rather than borrowing references
//! into those owning collections (which would force cyclic lifetimes through
//! the search frontier) every such object is handed a stable, copyable id via
//! [`create_id_type`] and the owning collection is a [`Store`].

pub mod id;
pub mod store;

pub use id::Id;
pub use store::Store;
