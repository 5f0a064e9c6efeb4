//! Batch actions over the cross-page selection.
//!
//! A batch goes `Idle -> Validating -> {NothingEligible | Submitting} ->
//! {Succeeded | Failed} -> Idle`. The selection and the working set are only
//! touched once the collaborator has answered.

use serde::Serialize;

use crate::domain::item::Listing;
use crate::domain::types::{ItemId, UserId};
use crate::projection::ViewProjector;
use crate::repository::errors::RepositoryResult;
use crate::repository::{BatchReport, CartWriter, WishlistWriter};
use crate::selection::SelectionSet;
use crate::services::{ServiceError, ServiceResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchAction {
    AddToCart,
    Remove,
}

impl BatchAction {
    /// Precondition an item must satisfy to be acted on.
    pub fn is_eligible<T: Listing + ?Sized>(self, item: &T) -> bool {
        match self {
            BatchAction::AddToCart => item.is_available(),
            BatchAction::Remove => true,
        }
    }

    /// Whether succeeded identities leave the working set.
    pub const fn removes_items(self) -> bool {
        matches!(self, BatchAction::Remove)
    }

    pub const fn label(self) -> &'static str {
        match self {
            BatchAction::AddToCart => "add to cart",
            BatchAction::Remove => "remove",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchPhase {
    Idle,
    Validating,
    Submitting(BatchAction),
}

/// Validated request waiting for the collaborator's answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub action: BatchAction,
    pub eligible: Vec<ItemId>,
    pub ineligible: Vec<ItemId>,
}

/// Caller-visible result of one batch invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    /// No selected item satisfied the precondition; nothing was sent.
    NothingEligible {
        action: BatchAction,
        ineligible: usize,
    },
    Succeeded {
        action: BatchAction,
        succeeded: Vec<ItemId>,
        ineligible: usize,
    },
    /// Some identities were accepted, others were refused.
    PartialFailure {
        action: BatchAction,
        succeeded: Vec<ItemId>,
        failed: Vec<(ItemId, String)>,
        ineligible: usize,
    },
    /// Every submitted identity was refused.
    Failed {
        action: BatchAction,
        failed: Vec<(ItemId, String)>,
        ineligible: usize,
    },
}

impl BatchOutcome {
    pub fn action(&self) -> BatchAction {
        match self {
            BatchOutcome::NothingEligible { action, .. }
            | BatchOutcome::Succeeded { action, .. }
            | BatchOutcome::PartialFailure { action, .. }
            | BatchOutcome::Failed { action, .. } => *action,
        }
    }

    pub fn succeeded(&self) -> &[ItemId] {
        match self {
            BatchOutcome::Succeeded { succeeded, .. }
            | BatchOutcome::PartialFailure { succeeded, .. } => succeeded,
            BatchOutcome::NothingEligible { .. } | BatchOutcome::Failed { .. } => &[],
        }
    }

    pub fn failed_count(&self) -> usize {
        match self {
            BatchOutcome::PartialFailure { failed, .. } | BatchOutcome::Failed { failed, .. } => {
                failed.len()
            }
            BatchOutcome::NothingEligible { .. } | BatchOutcome::Succeeded { .. } => 0,
        }
    }

    pub fn ineligible(&self) -> usize {
        match self {
            BatchOutcome::NothingEligible { ineligible, .. }
            | BatchOutcome::Succeeded { ineligible, .. }
            | BatchOutcome::PartialFailure { ineligible, .. }
            | BatchOutcome::Failed { ineligible, .. } => *ineligible,
        }
    }
}

/// Result of the validation step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validation {
    NothingEligible(BatchOutcome),
    Submit(Submission),
}

/// Per-view guard and bookkeeping for batch actions.
#[derive(Debug, Clone)]
pub struct BatchActionCoordinator {
    phase: BatchPhase,
}

impl Default for BatchActionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchActionCoordinator {
    pub fn new() -> Self {
        Self {
            phase: BatchPhase::Idle,
        }
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    /// Splits the selection into identities to submit and identities to skip.
    ///
    /// Fails with [`ServiceError::BatchInFlight`] while a previous batch of
    /// this view is still being submitted, and with
    /// [`ServiceError::UnsupportedAction`] when the view does not offer
    /// `action`.
    pub fn begin<P>(
        &mut self,
        action: BatchAction,
        selection: &SelectionSet,
        projector: &P,
    ) -> ServiceResult<Validation>
    where
        P: ViewProjector + ?Sized,
    {
        if let BatchPhase::Submitting(pending) = self.phase {
            log::warn!(
                "Rejecting {} while {} is being submitted",
                action.label(),
                pending.label()
            );
            return Err(ServiceError::BatchInFlight);
        }
        if !projector.supports(action) {
            log::warn!("Rejecting {}: not offered by this view", action.label());
            return Err(ServiceError::UnsupportedAction(action));
        }
        self.phase = BatchPhase::Validating;

        let (eligible, ineligible): (Vec<ItemId>, Vec<ItemId>) =
            selection.ids().into_iter().partition(|id| {
                projector
                    .resolve(*id)
                    .is_some_and(|item| action.is_eligible(item))
            });

        if eligible.is_empty() {
            self.phase = BatchPhase::Idle;
            log::info!(
                "Nothing eligible to {} ({} selected)",
                action.label(),
                ineligible.len()
            );
            return Ok(Validation::NothingEligible(BatchOutcome::NothingEligible {
                action,
                ineligible: ineligible.len(),
            }));
        }

        self.phase = BatchPhase::Submitting(action);
        Ok(Validation::Submit(Submission {
            action,
            eligible,
            ineligible,
        }))
    }

    /// Reconciles selection and working set with the collaborator's answer.
    ///
    /// A transport failure leaves both untouched and is returned as an error.
    pub fn complete<P>(
        &mut self,
        submission: Submission,
        result: RepositoryResult<BatchReport>,
        selection: &mut SelectionSet,
        projector: &mut P,
    ) -> ServiceResult<BatchOutcome>
    where
        P: ViewProjector + ?Sized,
    {
        self.phase = BatchPhase::Idle;
        let Submission {
            action,
            eligible,
            ineligible,
        } = submission;

        let report = result.map_err(|err| {
            log::error!("Failed to {} {} items: {err}", action.label(), eligible.len());
            ServiceError::from(err)
        })?;

        let succeeded: Vec<ItemId> = eligible
            .iter()
            .copied()
            .filter(|id| report.succeeded.contains(id))
            .collect();
        let failed: Vec<(ItemId, String)> = eligible
            .iter()
            .filter(|id| !succeeded.contains(id))
            .map(|id| {
                let reason = report
                    .failed
                    .iter()
                    .find(|(failed_id, _)| failed_id == id)
                    .map(|(_, reason)| reason.clone())
                    .unwrap_or_else(|| "no result reported".to_string());
                (*id, reason)
            })
            .collect();

        selection.prune(&succeeded);
        if action.removes_items() {
            projector.prune(&succeeded);
        }

        let ineligible = ineligible.len();
        let outcome = match (succeeded.is_empty(), failed.is_empty()) {
            (_, true) => {
                log::info!("Completed {} for {} items", action.label(), succeeded.len());
                BatchOutcome::Succeeded {
                    action,
                    succeeded,
                    ineligible,
                }
            }
            (true, false) => {
                log::warn!("All {} requests to {} failed", failed.len(), action.label());
                BatchOutcome::Failed {
                    action,
                    failed,
                    ineligible,
                }
            }
            (false, false) => {
                log::warn!(
                    "Partial {}: {} succeeded, {} failed",
                    action.label(),
                    succeeded.len(),
                    failed.len()
                );
                BatchOutcome::PartialFailure {
                    action,
                    succeeded,
                    failed,
                    ineligible,
                }
            }
        };
        Ok(outcome)
    }
}

/// Sends a validated submission to the matching collaborator.
pub fn submit<R>(repo: &R, user_id: UserId, submission: &Submission) -> RepositoryResult<BatchReport>
where
    R: CartWriter + WishlistWriter + ?Sized,
{
    match submission.action {
        BatchAction::AddToCart => repo.add_to_cart_batch(user_id, &submission.eligible),
        BatchAction::Remove => {
            let mut report = BatchReport::default();
            for id in &submission.eligible {
                report.record(*id, repo.remove_from_wishlist(user_id, *id));
            }
            Ok(report)
        }
    }
}

/// Validates, submits and reconciles one batch action end to end.
pub fn run_batch<R, P>(
    coordinator: &mut BatchActionCoordinator,
    repo: &R,
    user_id: UserId,
    action: BatchAction,
    selection: &mut SelectionSet,
    projector: &mut P,
) -> ServiceResult<BatchOutcome>
where
    R: CartWriter + WishlistWriter + ?Sized,
    P: ViewProjector + ?Sized,
{
    match coordinator.begin(action, selection, projector)? {
        Validation::NothingEligible(outcome) => Ok(outcome),
        Validation::Submit(submission) => {
            let result = submit(repo, user_id, &submission);
            coordinator.complete(submission, result, selection, projector)
        }
    }
}
