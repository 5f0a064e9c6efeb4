//! Contracts of the remote marketplace API consumed by the listing views.

use serde::Serialize;

use crate::domain::item::{Product, WishlistEntry};
use crate::domain::query::QueryState;
use crate::domain::types::{ItemId, UserId};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod memory;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

/// One page of server-side search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage<T> {
    /// Number of matches before pagination.
    pub total: usize,
    pub items: Vec<T>,
}

/// Per-identity result of a batch mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: Vec<ItemId>,
    pub failed: Vec<(ItemId, String)>,
}

impl BatchReport {
    pub fn record(&mut self, id: ItemId, result: RepositoryResult<()>) {
        match result {
            Ok(()) => self.succeeded.push(id),
            Err(err) => self.failed.push((id, err.to_string())),
        }
    }

    pub fn failed_ids(&self) -> Vec<ItemId> {
        self.failed.iter().map(|(id, _)| *id).collect()
    }
}

pub trait CatalogReader {
    /// Runs a keyword/filter search; every query field is an independent,
    /// optional filter and `total` counts matches before pagination.
    fn search_products(&self, query: &QueryState) -> RepositoryResult<SearchPage<Product>>;
}

pub trait WishlistReader {
    /// Returns the complete wishlist with no server-side filtering.
    fn list_wishlist(&self, user_id: UserId) -> RepositoryResult<Vec<WishlistEntry>>;
}

pub trait WishlistWriter {
    fn remove_from_wishlist(&self, user_id: UserId, item_id: ItemId) -> RepositoryResult<()>;
}

pub trait CartWriter {
    fn add_to_cart(&self, user_id: UserId, item_id: ItemId) -> RepositoryResult<()>;
    fn add_to_cart_batch(&self, user_id: UserId, item_ids: &[ItemId])
    -> RepositoryResult<BatchReport>;
}

pub trait FavoriteWriter {
    /// Stores the favorite flag and returns the value the server kept.
    fn set_favorite(&self, user_id: UserId, item_id: ItemId, favorite: bool)
    -> RepositoryResult<bool>;
}
