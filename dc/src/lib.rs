//! Reference Dynamic Controllability checker (§4.6, §6 "DC Checker
//! contract"), grounded on the teacher's incremental STN propagation
//! (`stn/src/cesta.rs`, Cesta & Oddi 1996).

mod stn;

pub mod checker;

pub use checker::BellmanFordDcChecker;
