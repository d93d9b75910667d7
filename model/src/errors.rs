//! Error taxonomy for the propositional model, grounded on the teacher's
//! `thiserror`-enum convention (`planning/model/src/objects.rs`): one
//! `#[error("...")]` variant per distinguishable failure mode, no
//! catch-all `String` variant.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("duplicate variable '{0}'")]
    DuplicateVariable(String),
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("domain of variable '{0}' must not be empty")]
    EmptyDomain(String),
    #[error("value '{value}' is not in the domain of variable '{var}'")]
    DomainError { var: String, value: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at offset {pos}: {message}")]
pub struct ParseError {
    pub pos: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(pos: usize, message: impl Into<String>) -> Self {
        ParseError {
            pos,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error(
        "variable '{0}' is finite_domain, not binary; use '{0}=<value>', not '{0}' alone"
    )]
    BareFiniteDomainVariable(String),
    #[error("'=' can only relate a variable name to a domain value, not a compound expression")]
    EqualsOnNonTerm,
}

/// Surfaced from `add_variable`/`add_constraint`/`add_temporal_constraint`, per
/// the failure semantics in the specification's error handling design:
/// declaration, parse and typecheck errors propagate to the caller.
#[derive(Error, Debug, Clone)]
pub enum ProblemError {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Type(#[from] TypeError),
}
