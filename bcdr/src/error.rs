use bcdr_model::ProblemError;

/// Everything that can go wrong building a [`crate::Problem`] before search
/// even starts.
#[derive(thiserror::Error, Debug, Clone)]
pub enum BuildError {
    #[error(transparent)]
    Problem(#[from] ProblemError),
}
