use thiserror::Error;

/// Failures reported by the remote marketplace collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Unexpected(format!("Malformed response payload: {err}"))
    }
}
