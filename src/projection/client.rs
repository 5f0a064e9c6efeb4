use crate::domain::item::{Listing, WishlistEntry};
use crate::domain::query::QueryState;
use crate::domain::types::{ItemId, UserId};
use crate::domain::view::DerivedView;
use crate::projection::{LoadState, Refresh, ViewProjector, project};
use crate::repository::WishlistReader;
use crate::services::{ServiceError, ServiceResult};

/// Projector over a working set fetched once and kept in memory.
#[derive(Debug, Clone)]
pub struct ClientProjector<T> {
    owner: UserId,
    working_set: Option<Vec<T>>,
    stale: bool,
    view: DerivedView<T>,
    state: LoadState,
}

impl<T: Listing + Clone> ClientProjector<T> {
    pub fn new(owner: UserId, page_size: usize) -> Self {
        Self {
            owner,
            working_set: None,
            stale: false,
            view: DerivedView::empty(page_size),
            state: LoadState::Idle,
        }
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn working_set(&self) -> &[T] {
        self.working_set.as_deref().unwrap_or_default()
    }

    /// Swaps in a freshly fetched working set as a whole.
    pub fn replace_working_set(&mut self, items: Vec<T>) {
        self.working_set = Some(items);
        self.stale = false;
        self.state = LoadState::Ready;
    }

    fn needs_fetch(&self) -> bool {
        self.working_set.is_none() || self.stale
    }

    /// Projects the resident working set, returning the effective query.
    fn reproject(&mut self, query: &QueryState) -> QueryState {
        let view = project(self.working_set(), query);
        let effective = query.clone().with_page(view.page);
        if view.was_clamped() {
            log::debug!(
                "Clamped page {} to {} ({} matching items)",
                view.requested_page,
                view.page,
                view.total
            );
        }
        self.view = view;
        effective
    }
}

impl ViewProjector for ClientProjector<WishlistEntry> {
    type Item = WishlistEntry;

    fn view(&self) -> &DerivedView<WishlistEntry> {
        &self.view
    }

    fn load_state(&self) -> &LoadState {
        &self.state
    }

    fn resolve(&self, id: ItemId) -> Option<&WishlistEntry> {
        self.working_set().iter().find(|entry| entry.id() == id)
    }

    fn prune(&mut self, ids: &[ItemId]) {
        if let Some(items) = self.working_set.as_mut() {
            items.retain(|item| !ids.contains(&item.id()));
        }
        let before = self.view.items.len();
        self.view.items.retain(|item| !ids.contains(&item.id()));
        let removed = before - self.view.items.len();
        self.view.total = self.view.total.saturating_sub(removed);
    }

    fn invalidate(&mut self) {
        self.stale = true;
    }
}

impl<R> Refresh<R> for ClientProjector<WishlistEntry>
where
    R: WishlistReader + ?Sized,
{
    fn refresh(&mut self, repo: &R, query: &QueryState) -> ServiceResult<QueryState> {
        if self.needs_fetch() {
            self.state = LoadState::Loading;
            let entries = repo.list_wishlist(self.owner).map_err(|err| {
                log::error!("Failed to load wishlist for user {}: {err}", self.owner);
                self.state = LoadState::Failed {
                    message: err.to_string(),
                };
                ServiceError::from(err)
            })?;
            self.replace_working_set(entries);
        }
        Ok(self.reproject(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{QueryDefaults, SortBy};
    use crate::repository::errors::{RepositoryError, RepositoryResult};
    use crate::repository::mock::MockMarket;
    use crate::test_support::wishlist_entries;

    fn owner() -> UserId {
        UserId::new(1).unwrap()
    }

    fn query() -> QueryState {
        QueryState::new(&QueryDefaults::new(12, SortBy::Relevance))
    }

    #[test]
    fn fetches_once_and_projects_locally() {
        let mut repo = MockMarket::new();
        repo.expect_list_wishlist()
            .times(1)
            .returning(|_| Ok(wishlist_entries(25)));
        let mut projector: ClientProjector<WishlistEntry> = ClientProjector::new(owner(), 12);

        let effective = projector.refresh(&repo, &query()).unwrap();
        assert_eq!(effective.page(), 1);
        assert_eq!(projector.view().items.len(), 12);

        let effective = projector.refresh(&repo, &query().with_page(3)).unwrap();
        assert_eq!(effective.page(), 3);
        assert_eq!(projector.view().items.len(), 1);
        assert_eq!(projector.load_state(), &LoadState::Ready);
    }

    #[test]
    fn out_of_range_page_is_reported_back_clamped() {
        let mut repo = MockMarket::new();
        repo.expect_list_wishlist()
            .returning(|_| Ok(wishlist_entries(25)));
        let mut projector: ClientProjector<WishlistEntry> = ClientProjector::new(owner(), 12);

        let effective = projector.refresh(&repo, &query().with_page(4)).unwrap();

        assert_eq!(effective.page(), 3);
        assert_eq!(projector.view().page, 3);
    }

    #[test]
    fn failed_reload_keeps_the_last_good_page() {
        let mut repo = MockMarket::new();
        let mut calls = 0;
        repo.expect_list_wishlist()
            .times(2)
            .returning(move |_| -> RepositoryResult<Vec<WishlistEntry>> {
                calls += 1;
                if calls == 1 {
                    Ok(wishlist_entries(3))
                } else {
                    Err(RepositoryError::Network("offline".to_string()))
                }
            });
        let mut projector: ClientProjector<WishlistEntry> = ClientProjector::new(owner(), 12);
        projector.refresh(&repo, &query()).unwrap();

        projector.invalidate();
        let result = projector.refresh(&repo, &query());

        assert!(matches!(result, Err(ServiceError::Network(_))));
        assert_eq!(projector.view().items.len(), 3);
        assert_eq!(projector.working_set().len(), 3);
        assert!(matches!(projector.load_state(), LoadState::Failed { .. }));
    }

    #[test]
    fn prune_drops_items_from_working_set_and_page() {
        let mut repo = MockMarket::new();
        repo.expect_list_wishlist()
            .returning(|_| Ok(wishlist_entries(4)));
        let mut projector: ClientProjector<WishlistEntry> = ClientProjector::new(owner(), 12);
        projector.refresh(&repo, &query()).unwrap();

        let gone = ItemId::new(2).unwrap();
        projector.prune(&[gone]);

        assert_eq!(projector.working_set().len(), 3);
        assert_eq!(projector.view().total, 3);
        assert!(projector.resolve(gone).is_none());
    }
}
