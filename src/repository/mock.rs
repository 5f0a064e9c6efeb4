//! Mock marketplace implementation for isolating services in tests.

use mockall::mock;

use crate::domain::item::{Product, WishlistEntry};
use crate::domain::query::QueryState;
use crate::domain::types::{ItemId, UserId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    BatchReport, CartWriter, CatalogReader, FavoriteWriter, SearchPage, WishlistReader,
    WishlistWriter,
};

mock! {
    pub Market {}

    impl CatalogReader for Market {
        fn search_products(&self, query: &QueryState) -> RepositoryResult<SearchPage<Product>>;
    }

    impl WishlistReader for Market {
        fn list_wishlist(&self, user_id: UserId) -> RepositoryResult<Vec<WishlistEntry>>;
    }

    impl WishlistWriter for Market {
        fn remove_from_wishlist(&self, user_id: UserId, item_id: ItemId) -> RepositoryResult<()>;
    }

    impl CartWriter for Market {
        fn add_to_cart(&self, user_id: UserId, item_id: ItemId) -> RepositoryResult<()>;
        fn add_to_cart_batch(
            &self,
            user_id: UserId,
            item_ids: &[ItemId],
        ) -> RepositoryResult<BatchReport>;
    }

    impl FavoriteWriter for Market {
        fn set_favorite(
            &self,
            user_id: UserId,
            item_id: ItemId,
            favorite: bool,
        ) -> RepositoryResult<bool>;
    }
}
