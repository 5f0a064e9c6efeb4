//! Listing view controller shared by the catalog and the wishlist.
//!
//! A [`ListingView`] owns one view's query state, selection and batch
//! coordinator and keeps them consistent with the URL. The host passes the
//! marketplace collaborators and the history port into every operation.

use crate::domain::item::{Listing, Product, WishlistEntry};
use crate::domain::query::{QueryDefaults, QueryState, SortBy};
use crate::domain::types::{CategoryName, ConditionName, ItemId, Price, PriceRange};
use crate::dto::listing::{ListingPageData, ListingRow};
use crate::dto::notice::Notice;
use crate::models::session::Session;
use crate::pagination::Paginated;
use crate::projection::{ClientProjector, LoadState, Refresh, ServerProjector, ViewProjector};
use crate::repository::{CartWriter, FavoriteWriter, WishlistWriter};
use crate::selection::SelectionSet;
use crate::services::batch::{self, BatchAction, BatchActionCoordinator, BatchOutcome, BatchPhase};
use crate::services::favorites::FavoriteTracker;
use crate::services::{ServiceError, ServiceResult};
use crate::url_sync::{HistoryPort, UrlSync};

pub type WishlistView = ListingView<ClientProjector<WishlistEntry>>;
pub type CatalogView = ListingView<ServerProjector<Product>>;

pub struct ListingView<P> {
    session: Session,
    url: UrlSync,
    query: QueryState,
    keyword_draft: String,
    projector: P,
    selection: SelectionSet,
    coordinator: BatchActionCoordinator,
    favorites: FavoriteTracker,
    notices: Vec<Notice>,
}

impl ListingView<ClientProjector<WishlistEntry>> {
    /// Wishlist of the signed-in shopper, filtered and paged locally.
    pub fn wishlist(session: Session, defaults: QueryDefaults) -> ServiceResult<Self> {
        let owner = session.require_user()?;
        let projector = ClientProjector::new(owner, defaults.page_size);
        Ok(Self::new(session, defaults, projector))
    }
}

impl ListingView<ServerProjector<Product>> {
    /// Catalog search; browsing works without a session.
    pub fn catalog(session: Session, defaults: QueryDefaults) -> Self {
        let projector = ServerProjector::new(defaults.page_size);
        Self::new(session, defaults, projector)
    }
}

impl<P: ViewProjector> ListingView<P> {
    pub fn new(session: Session, defaults: QueryDefaults, projector: P) -> Self {
        Self {
            session,
            url: UrlSync::new(defaults),
            query: QueryState::new(&defaults),
            keyword_draft: String::new(),
            projector,
            selection: SelectionSet::new(),
            coordinator: BatchActionCoordinator::new(),
            favorites: FavoriteTracker::new(),
            notices: Vec::new(),
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn keyword_draft(&self) -> &str {
        &self.keyword_draft
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn projector(&self) -> &P {
        &self.projector
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn batch_phase(&self) -> BatchPhase {
        self.coordinator.phase()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hands pending notices to the renderer and forgets them.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Updates the search box without touching the committed query.
    pub fn edit_keyword(&mut self, text: impl Into<String>) {
        self.keyword_draft = text.into();
    }

    pub fn visible_ids(&self) -> Vec<ItemId> {
        self.projector.view().visible_ids()
    }

    /// Flips the selection of one row; returns the new state.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        self.selection.toggle(id)
    }

    /// Header checkbox on: selects every row of the current page.
    pub fn select_page(&mut self) {
        let visible = self.visible_ids();
        self.selection.select_all(&visible);
    }

    /// Header checkbox off: clears the rows of the current page only.
    pub fn clear_page(&mut self) {
        let visible = self.visible_ids();
        self.selection.clear_all(&visible);
    }

    pub fn seed_favorites<I>(&mut self, favorites: I)
    where
        I: IntoIterator<Item = (ItemId, bool)>,
    {
        self.favorites.seed(favorites);
    }

    /// Toggles the favorite flag of a product card.
    pub fn toggle_favorite<R>(&mut self, repo: &R, id: ItemId) -> ServiceResult<bool>
    where
        R: FavoriteWriter + ?Sized,
    {
        let result = self.favorites.toggle(repo, &self.session, id);
        self.report(result)
    }

    /// Render-ready snapshot of the view.
    pub fn page_data(&self) -> ListingPageData<P::Item> {
        let view = self.projector.view();
        let visible = view.visible_ids();
        let rows = view
            .items
            .iter()
            .map(|item| ListingRow {
                selected: self.selection.is_selected(item.id()),
                favorite: self.favorites.flag(item.id()),
                item: item.clone(),
            })
            .collect();

        ListingPageData {
            page: Paginated::new(rows, view.page, view.total_pages(), view.total),
            query: self.query.clone(),
            query_string: self.url.committed().to_string(),
            keyword_draft: self.keyword_draft.clone(),
            all_selected: self.selection.all_selected_on_page(&visible),
            partially_selected: self.selection.partially_selected_on_page(&visible),
            selected_count: self.selection.len(),
            load_state: self.projector.load_state().clone(),
            batch_pending: matches!(self.coordinator.phase(), BatchPhase::Submitting(_)),
            notices: self.notices.clone(),
        }
    }

    /// Reads the location and shows the state it describes.
    ///
    /// A location naming a page that no longer exists is rewritten in place.
    pub fn mount<R, H>(&mut self, repo: &R, history: &mut H) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        let state = self.url.load(history);
        self.keyword_draft = state.keyword().to_string();
        self.query = state;
        self.sync_current(repo, history)
    }

    /// Follows a back/forward move of the history without adding an entry.
    pub fn navigate<R, H>(&mut self, repo: &R, history: &mut H) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        log::debug!("Rehydrating listing from `?{}`", history.current_query());
        self.mount(repo, history)
    }

    /// Commits the keyword draft as a new search.
    pub fn submit_search<R, H>(&mut self, repo: &R, history: &mut H) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        let next = self.query.clone().with_keyword(self.keyword_draft.clone());
        self.apply(repo, history, next)?;
        self.keyword_draft = self.query.keyword().to_string();
        Ok(())
    }

    pub fn set_category<R, H>(
        &mut self,
        repo: &R,
        history: &mut H,
        category: Option<CategoryName>,
    ) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        let next = self.query.clone().with_category(category);
        self.apply(repo, history, next)
    }

    pub fn set_condition<R, H>(
        &mut self,
        repo: &R,
        history: &mut H,
        condition: Option<ConditionName>,
    ) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        let next = self.query.clone().with_condition(condition);
        self.apply(repo, history, next)
    }

    pub fn set_price_range<R, H>(
        &mut self,
        repo: &R,
        history: &mut H,
        price_range: Option<PriceRange>,
    ) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        let next = self.query.clone().with_price_range(price_range);
        self.apply(repo, history, next)
    }

    /// Price filter from the two number inputs of the filter bar.
    pub fn set_price_bounds<R, H>(
        &mut self,
        repo: &R,
        history: &mut H,
        min: f64,
        max: f64,
    ) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        let price_range = self.report(price_bounds(min, max))?;
        self.set_price_range(repo, history, Some(price_range))
    }

    pub fn set_sort<R, H>(&mut self, repo: &R, history: &mut H, sort_by: SortBy) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        let next = self.query.clone().with_sort(sort_by);
        self.apply(repo, history, next)
    }

    pub fn go_to_page<R, H>(&mut self, repo: &R, history: &mut H, page: usize) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        let next = self.query.clone().with_page(page);
        self.apply(repo, history, next)
    }

    pub fn set_page_size<R, H>(
        &mut self,
        repo: &R,
        history: &mut H,
        page_size: usize,
    ) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        let page_size = page_size.min(self.url.defaults().max_page_size);
        let next = self.query.clone().with_page_size(page_size);
        self.apply(repo, history, next)
    }

    /// Drops every filter and returns to the view defaults.
    pub fn reset<R, H>(&mut self, repo: &R, history: &mut H) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        let next = QueryState::new(self.url.defaults());
        self.apply(repo, history, next)?;
        self.keyword_draft.clear();
        Ok(())
    }

    /// Refetches the working set and shows the current query again.
    pub fn reload<R, H>(&mut self, repo: &R, history: &mut H) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        self.projector.invalidate();
        self.sync_current(repo, history)
    }

    /// Runs a batch action over the cross-page selection.
    ///
    /// Once the collaborator has answered the outcome is always returned; a
    /// failed follow-up refresh is only recorded as a notice.
    pub fn run_batch<R, H>(
        &mut self,
        repo: &R,
        history: &mut H,
        action: BatchAction,
    ) -> ServiceResult<BatchOutcome>
    where
        R: CartWriter + WishlistWriter + ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        let user_id = self.session.require_user();
        let user_id = self.report(user_id)?;

        let result = batch::run_batch(
            &mut self.coordinator,
            repo,
            user_id,
            action,
            &mut self.selection,
            &mut self.projector,
        );
        let outcome = self.report(result)?;
        self.notices.push(Notice::from_outcome(&outcome));

        if action.removes_items()
            && !outcome.succeeded().is_empty()
            && let Err(err) = self.sync_current(repo, history)
        {
            log::warn!("Listing not refreshed after {}: {err}", action.label());
        }
        Ok(outcome)
    }

    /// Shows `next` and records it as one new history entry.
    ///
    /// On failure the previous query, page and location stay in place.
    fn apply<R, H>(&mut self, repo: &R, history: &mut H, next: QueryState) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        if next == self.query && *self.projector.load_state() == LoadState::Ready {
            return Ok(());
        }
        let result = self.projector.refresh(repo, &next);
        let effective = self.report(result)?;
        self.url.commit(history, &effective);
        self.query = effective;
        Ok(())
    }

    /// Re-derives the page for the current query, rewriting the location
    /// when the page had to be clamped.
    fn sync_current<R, H>(&mut self, repo: &R, history: &mut H) -> ServiceResult<()>
    where
        R: ?Sized,
        P: Refresh<R>,
        H: HistoryPort + ?Sized,
    {
        let result = self.projector.refresh(repo, &self.query);
        let effective = self.report(result)?;
        if effective != self.query {
            self.url.correct(history, &effective);
            self.query = effective;
        }
        Ok(())
    }

    fn report<T>(&mut self, result: ServiceResult<T>) -> ServiceResult<T> {
        if let Err(err) = &result {
            self.notices.push(Notice::from_error(err));
        }
        result
    }
}

fn price_bounds(min: f64, max: f64) -> Result<PriceRange, ServiceError> {
    Ok(PriceRange::new(Price::new(min)?, Price::new(max)?)?)
}
