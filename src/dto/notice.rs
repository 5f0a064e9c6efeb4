use serde::Serialize;

use crate::services::ServiceError;
use crate::services::batch::{BatchAction, BatchOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Error,
    Warning,
    Success,
    Info,
}

impl NoticeLevel {
    /// CSS class used by the alert banner.
    pub const fn as_css(self) -> &'static str {
        match self {
            NoticeLevel::Error => "danger",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
        }
    }
}

/// Message shown to the shopper after an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Offer a retry control next to the message.
    pub retryable: bool,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn css_class(&self) -> &'static str {
        self.level.as_css()
    }

    pub fn from_outcome(outcome: &BatchOutcome) -> Self {
        let skipped = match outcome.ineligible() {
            0 => String::new(),
            count => format!(", {count} skipped"),
        };
        match outcome {
            BatchOutcome::NothingEligible { action, .. } => Notice::new(
                NoticeLevel::Info,
                match action {
                    BatchAction::AddToCart => "None of the selected items can be added to the cart",
                    BatchAction::Remove => "None of the selected items can be removed",
                },
            ),
            BatchOutcome::Succeeded {
                action, succeeded, ..
            } => Notice::new(
                NoticeLevel::Success,
                format!("{} {} item(s){skipped}", past_tense(*action), succeeded.len()),
            ),
            BatchOutcome::PartialFailure {
                action,
                succeeded,
                failed,
                ..
            } => Notice {
                level: NoticeLevel::Warning,
                message: format!(
                    "{} {} item(s), {} failed{skipped}",
                    past_tense(*action),
                    succeeded.len(),
                    failed.len()
                ),
                retryable: true,
            },
            BatchOutcome::Failed { action, failed, .. } => Notice {
                level: NoticeLevel::Error,
                message: format!("Could not {} {} item(s){skipped}", action.label(), failed.len()),
                retryable: true,
            },
        }
    }

    pub fn from_error(err: &ServiceError) -> Self {
        match err {
            ServiceError::Network(_) => Notice {
                level: NoticeLevel::Error,
                message: "Connection problem, please try again".to_string(),
                retryable: err.is_retryable(),
            },
            ServiceError::Unauthorized => {
                Notice::new(NoticeLevel::Warning, "Please sign in to continue")
            }
            ServiceError::BatchInFlight | ServiceError::FavoritePending => {
                Notice::new(NoticeLevel::Info, "Still working on your previous request")
            }
            ServiceError::UnsupportedAction(action) => Notice::new(
                NoticeLevel::Warning,
                format!("Cannot {} from this list", action.label()),
            ),
            ServiceError::TypeConstraint(reason) => {
                Notice::new(NoticeLevel::Warning, format!("Invalid input: {reason}"))
            }
        }
    }
}

fn past_tense(action: BatchAction) -> &'static str {
    match action {
        BatchAction::AddToCart => "Added to cart",
        BatchAction::Remove => "Removed",
    }
}
