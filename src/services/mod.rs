//! Controller logic driving the storefront listing views.

use thiserror::Error;

use crate::repository::errors::RepositoryError;
use crate::services::batch::BatchAction;

pub mod batch;
pub mod favorites;
pub mod listing;

/// Failures surfaced to the listing views. None of them is fatal; the view
/// stays usable after any of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("sign in required")]
    Unauthorized,

    /// A collaborator call failed; the user may retry.
    #[error("network error: {0}")]
    Network(String),

    #[error("a batch action is already being submitted")]
    BatchInFlight,

    #[error("a favorite update is already pending")]
    FavoritePending,

    #[error("cannot {} from this view", .0.label())]
    UnsupportedAction(BatchAction),

    #[error("invalid value: {0}")]
    TypeConstraint(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Whether repeating the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Network(_))
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        ServiceError::Network(err.to_string())
    }
}
