//! In-memory marketplace used by the replay tool and integration tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::domain::item::{Listing, Product, WishlistEntry};
use crate::domain::query::QueryState;
use crate::domain::types::{ItemId, UserId};
use crate::projection::sort_items;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    BatchReport, CartWriter, CatalogReader, FavoriteWriter, SearchPage, WishlistReader,
    WishlistWriter,
};

/// Marketplace state held in process memory.
///
/// Behaves like the remote API: search filters and paginates on the
/// "server" without clamping, cart additions require an available item.
#[derive(Debug, Default)]
pub struct MemoryMarket {
    products: RefCell<Vec<Product>>,
    wishlists: RefCell<HashMap<UserId, Vec<WishlistEntry>>>,
    carts: RefCell<HashMap<UserId, Vec<ItemId>>>,
    favorites: RefCell<HashMap<UserId, HashSet<ItemId>>>,
    rejected: RefCell<HashMap<ItemId, String>>,
    offline: Cell<bool>,
    search_calls: Cell<usize>,
    wishlist_calls: Cell<usize>,
}

impl MemoryMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.products.borrow_mut().extend(products);
        self
    }

    pub fn with_wishlist(self, user_id: UserId, entries: Vec<WishlistEntry>) -> Self {
        self.wishlists
            .borrow_mut()
            .entry(user_id)
            .or_default()
            .extend(entries);
        self
    }

    /// Replaces the wishlist of `user_id` with a JSON array of entries.
    pub fn load_wishlist_json(&self, user_id: UserId, json: &str) -> RepositoryResult<usize> {
        let entries: Vec<WishlistEntry> = serde_json::from_str(json)?;
        let count = entries.len();
        self.wishlists.borrow_mut().insert(user_id, entries);
        Ok(count)
    }

    /// Makes every subsequent call fail with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// Makes mutations of `item_id` fail with `reason`.
    pub fn reject_item(&self, item_id: ItemId, reason: impl Into<String>) {
        self.rejected.borrow_mut().insert(item_id, reason.into());
    }

    /// Applies `update` to every stored copy of a product.
    pub fn update_product<F>(&self, item_id: ItemId, update: F) -> RepositoryResult<()>
    where
        F: Fn(&mut Product),
    {
        let mut found = false;
        for product in self
            .products
            .borrow_mut()
            .iter_mut()
            .filter(|product| product.id == item_id)
        {
            update(product);
            found = true;
        }
        for entry in self
            .wishlists
            .borrow_mut()
            .values_mut()
            .flatten()
            .filter(|entry| entry.id() == item_id)
        {
            update(&mut entry.product);
            found = true;
        }
        if found {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    pub fn cart(&self, user_id: UserId) -> Vec<ItemId> {
        self.carts
            .borrow()
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn wishlist(&self, user_id: UserId) -> Vec<WishlistEntry> {
        self.wishlists
            .borrow()
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_favorite(&self, user_id: UserId, item_id: ItemId) -> bool {
        self.favorites
            .borrow()
            .get(&user_id)
            .is_some_and(|favorites| favorites.contains(&item_id))
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.get()
    }

    pub fn wishlist_calls(&self) -> usize {
        self.wishlist_calls.get()
    }

    fn ensure_online(&self) -> RepositoryResult<()> {
        if self.offline.get() {
            return Err(RepositoryError::Network("marketplace unreachable".to_string()));
        }
        Ok(())
    }

    fn ensure_accepted(&self, item_id: ItemId) -> RepositoryResult<()> {
        match self.rejected.borrow().get(&item_id) {
            Some(reason) => Err(RepositoryError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }

    fn find_product(&self, item_id: ItemId) -> Option<Product> {
        let catalog = self
            .products
            .borrow()
            .iter()
            .find(|product| product.id == item_id)
            .cloned();
        catalog.or_else(|| {
            self.wishlists
                .borrow()
                .values()
                .flatten()
                .find(|entry| entry.id() == item_id)
                .map(|entry| entry.product.clone())
        })
    }
}

impl CatalogReader for MemoryMarket {
    fn search_products(&self, query: &QueryState) -> RepositoryResult<SearchPage<Product>> {
        self.search_calls.set(self.search_calls.get() + 1);
        self.ensure_online()?;

        let mut matched: Vec<Product> = self
            .products
            .borrow()
            .iter()
            .filter(|product| query.matches(*product))
            .cloned()
            .collect();
        sort_items(&mut matched, query.sort_by());

        let total = matched.len();
        let items = matched
            .into_iter()
            .skip(query.offset())
            .take(query.page_size())
            .collect();
        Ok(SearchPage { total, items })
    }
}

impl WishlistReader for MemoryMarket {
    fn list_wishlist(&self, user_id: UserId) -> RepositoryResult<Vec<WishlistEntry>> {
        self.wishlist_calls.set(self.wishlist_calls.get() + 1);
        self.ensure_online()?;
        Ok(self.wishlist(user_id))
    }
}

impl WishlistWriter for MemoryMarket {
    fn remove_from_wishlist(&self, user_id: UserId, item_id: ItemId) -> RepositoryResult<()> {
        self.ensure_online()?;
        self.ensure_accepted(item_id)?;

        let mut wishlists = self.wishlists.borrow_mut();
        let entries = wishlists
            .get_mut(&user_id)
            .ok_or(RepositoryError::NotFound)?;
        let before = entries.len();
        entries.retain(|entry| entry.id() != item_id);
        if entries.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl CartWriter for MemoryMarket {
    fn add_to_cart(&self, user_id: UserId, item_id: ItemId) -> RepositoryResult<()> {
        self.ensure_online()?;
        self.ensure_accepted(item_id)?;

        let product = self.find_product(item_id).ok_or(RepositoryError::NotFound)?;
        if !product.is_available() {
            return Err(RepositoryError::Rejected(format!(
                "item {item_id} is no longer available"
            )));
        }

        let mut carts = self.carts.borrow_mut();
        let cart = carts.entry(user_id).or_default();
        if !cart.contains(&item_id) {
            cart.push(item_id);
        }
        Ok(())
    }

    fn add_to_cart_batch(
        &self,
        user_id: UserId,
        item_ids: &[ItemId],
    ) -> RepositoryResult<BatchReport> {
        self.ensure_online()?;
        let mut report = BatchReport::default();
        for item_id in item_ids {
            report.record(*item_id, self.add_to_cart(user_id, *item_id));
        }
        Ok(report)
    }
}

impl FavoriteWriter for MemoryMarket {
    fn set_favorite(
        &self,
        user_id: UserId,
        item_id: ItemId,
        favorite: bool,
    ) -> RepositoryResult<bool> {
        self.ensure_online()?;
        self.ensure_accepted(item_id)?;
        if self.find_product(item_id).is_none() {
            return Err(RepositoryError::NotFound);
        }

        let mut favorites = self.favorites.borrow_mut();
        let set = favorites.entry(user_id).or_default();
        if favorite {
            set.insert(item_id);
        } else {
            set.remove(&item_id);
        }
        Ok(favorite)
    }
}
