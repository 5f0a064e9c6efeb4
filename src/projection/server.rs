use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::item::{Listing, Product};
use crate::domain::query::QueryState;
use crate::domain::types::ItemId;
use crate::domain::view::DerivedView;
use crate::projection::{LoadState, Refresh, ViewProjector};
use crate::repository::errors::RepositoryResult;
use crate::repository::{CatalogReader, SearchPage};
use crate::services::batch::BatchAction;
use crate::services::{ServiceError, ServiceResult};

/// Sequence numbers are unique across projector instances, so a response
/// addressed to a view that has since been replaced can never match the
/// request a newer view is waiting for.
static NEXT_REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

/// Handle of an issued search request.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchTicket {
    seq: u64,
    query: QueryState,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }
}

/// Fate of a search response handed to [`ServerProjector::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The response answered the latest request and is now displayed.
    Fresh,
    /// A newer request superseded it; the response was dropped.
    Stale,
}

/// Projector that shows the remote search results as delivered.
///
/// Only the response to the most recently issued request is applied. Items
/// seen on any page stay resolvable for batch actions until pruned.
#[derive(Debug, Clone)]
pub struct ServerProjector<T> {
    latest: Option<SearchTicket>,
    view: DerivedView<T>,
    known: HashMap<ItemId, T>,
    state: LoadState,
}

impl<T: Listing + Clone> ServerProjector<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            latest: None,
            view: DerivedView::empty(page_size),
            known: HashMap::new(),
            state: LoadState::Idle,
        }
    }

    /// Registers a request for `query`.
    ///
    /// Returns `None` when an identical request is still outstanding, in
    /// which case its response will serve this call as well.
    pub fn issue(&mut self, query: &QueryState) -> Option<SearchTicket> {
        if let Some(pending) = &self.latest
            && pending.query == *query
        {
            log::debug!("Search #{} already in flight, not re-issuing", pending.seq);
            return None;
        }

        let ticket = SearchTicket {
            seq: NEXT_REQUEST_SEQ.fetch_add(1, Ordering::Relaxed),
            query: query.clone(),
        };
        self.latest = Some(ticket.clone());
        self.state = LoadState::Loading;
        Some(ticket)
    }

    /// Applies the outcome of the request identified by `ticket`.
    ///
    /// Outdated responses are discarded whether they succeeded or not. A
    /// failure of the latest request keeps the previous page on screen.
    pub fn apply(
        &mut self,
        ticket: &SearchTicket,
        result: RepositoryResult<SearchPage<T>>,
    ) -> ServiceResult<Applied> {
        let is_latest = self
            .latest
            .as_ref()
            .is_some_and(|pending| pending.seq == ticket.seq);
        if !is_latest {
            log::debug!("Discarding stale search response #{}", ticket.seq);
            return Ok(Applied::Stale);
        }
        self.latest = None;

        match result {
            Ok(page) => {
                for item in &page.items {
                    self.known.insert(item.id(), item.clone());
                }
                self.view = DerivedView {
                    items: page.items,
                    total: page.total,
                    page: ticket.query.page(),
                    page_size: ticket.query.page_size(),
                    requested_page: ticket.query.page(),
                };
                self.state = LoadState::Ready;
                Ok(Applied::Fresh)
            }
            Err(err) => {
                log::error!("Search #{} failed: {err}", ticket.seq);
                self.state = LoadState::Failed {
                    message: err.to_string(),
                };
                Err(ServiceError::from(err))
            }
        }
    }

    /// Returns `true` while a request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.latest.is_some()
    }
}

impl ViewProjector for ServerProjector<Product> {
    type Item = Product;

    fn view(&self) -> &DerivedView<Product> {
        &self.view
    }

    fn load_state(&self) -> &LoadState {
        &self.state
    }

    fn resolve(&self, id: ItemId) -> Option<&Product> {
        self.known.get(&id)
    }

    fn prune(&mut self, ids: &[ItemId]) {
        for id in ids {
            self.known.remove(id);
        }
        let before = self.view.items.len();
        self.view.items.retain(|item| !ids.contains(&item.id));
        let removed = before - self.view.items.len();
        self.view.total = self.view.total.saturating_sub(removed);
    }

    /// Catalog rows are not owned by the shopper, so nothing can be removed.
    fn supports(&self, action: BatchAction) -> bool {
        !action.removes_items()
    }
}

impl<R> Refresh<R> for ServerProjector<Product>
where
    R: CatalogReader + ?Sized,
{
    fn refresh(&mut self, repo: &R, query: &QueryState) -> ServiceResult<QueryState> {
        let Some(ticket) = self.issue(query) else {
            return Ok(query.clone());
        };
        let result = repo.search_products(ticket.query());
        self.apply(&ticket, result)?;
        Ok(query.clone())
    }
}
