//! Derivation of the visible page from a working set and a query.
//!
//! A listing view picks one of two projectors: [`ClientProjector`] keeps the
//! full working set resident and filters it locally, [`ServerProjector`]
//! forwards the query to the remote search and shows its answer verbatim.

use serde::Serialize;

use crate::domain::item::Listing;
use crate::domain::query::{QueryState, SortBy};
use crate::domain::types::ItemId;
use crate::domain::view::DerivedView;
use crate::services::ServiceResult;
use crate::services::batch::BatchAction;

pub mod client;
pub mod server;

pub use client::ClientProjector;
pub use server::{Applied, SearchTicket, ServerProjector};

/// Loading status surfaced next to the listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Last request failed; the previous page is still shown.
    Failed { message: String },
}

/// Page state owned by a listing view's projector.
pub trait ViewProjector {
    type Item: Listing + Clone;

    fn view(&self) -> &DerivedView<Self::Item>;

    fn load_state(&self) -> &LoadState;

    /// Looks up an item that is still part of the working set.
    fn resolve(&self, id: ItemId) -> Option<&Self::Item>;

    /// Forgets items that were removed remotely.
    fn prune(&mut self, ids: &[ItemId]);

    /// Forces the next refresh to refetch from the collaborator.
    fn invalidate(&mut self) {}

    /// Whether this view offers `action` over its selection.
    fn supports(&self, _action: BatchAction) -> bool {
        true
    }
}

/// Recomputation of the visible page from the remote collaborator `R`.
pub trait Refresh<R: ?Sized>: ViewProjector {
    /// Recomputes the visible page for `query`.
    ///
    /// Returns the query that is effectively shown. It differs from `query`
    /// only when the requested page no longer exists and was clamped; the
    /// caller must adopt it so the URL matches the page on screen.
    fn refresh(&mut self, repo: &R, query: &QueryState) -> ServiceResult<QueryState>;
}

/// Stable in-place ordering; ties keep their original relative order.
pub fn sort_items<T: Listing>(items: &mut [T], sort_by: SortBy) {
    match sort_by {
        SortBy::Relevance => {}
        SortBy::PriceAsc => items.sort_by(|a, b| a.price().total_cmp(&b.price())),
        SortBy::PriceDesc => items.sort_by(|a, b| b.price().total_cmp(&a.price())),
        SortBy::Latest | SortBy::AddTime => {
            items.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        }
    }
}

/// Filters, sorts and paginates `working_set` according to `query`.
///
/// A page past the end is clamped to the last page that has items; with no
/// matches at all the first (empty) page is returned.
pub fn project<T: Listing + Clone>(working_set: &[T], query: &QueryState) -> DerivedView<T> {
    let mut matched: Vec<&T> = working_set
        .iter()
        .filter(|item| query.matches(*item))
        .collect();
    sort_items(&mut matched, query.sort_by());

    let total = matched.len();
    let page_size = query.page_size();
    let last_page = total.div_ceil(page_size).max(1);
    let page = query.page().min(last_page);

    let items = matched
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    DerivedView {
        items,
        total,
        page,
        page_size,
        requested_page: query.page(),
    }
}
