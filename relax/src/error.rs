/// Failure of the relaxation engine itself (as opposed to an ordinary
/// infeasible result, which is reported as `None` rather than an error).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SolverFailure {
    #[error("linear program is unbounded (variable {0} has no finite optimum)")]
    Unbounded(usize),
}
