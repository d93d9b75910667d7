/// Fatal internal-invariant violation (§7): unit propagation tried to assign
/// a literal whose complement is already assigned. A correct CNF conversion
/// and a correct propagation loop can never trigger this; surfacing it as an
/// error rather than panicking directly lets callers log context before
/// aborting the run.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LogicError {
    #[error("literal {0} re-assigned during unit propagation")]
    LiteralReassigned(String),
}
