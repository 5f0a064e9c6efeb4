use std::collections::HashMap;

use crate::domain::favorite::FavoriteFlag;
use crate::domain::types::ItemId;
use crate::models::session::Session;
use crate::repository::FavoriteWriter;
use crate::services::{ServiceError, ServiceResult};

/// Favorite flags of the product cards currently known to a view.
#[derive(Debug, Clone, Default)]
pub struct FavoriteTracker {
    flags: HashMap<ItemId, FavoriteFlag>,
}

impl FavoriteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds confirmed values, e.g. from the wishlist contents.
    pub fn seed<I>(&mut self, favorites: I)
    where
        I: IntoIterator<Item = (ItemId, bool)>,
    {
        for (id, value) in favorites {
            self.flags.insert(id, FavoriteFlag::settled(value));
        }
    }

    pub fn flag(&self, id: ItemId) -> FavoriteFlag {
        self.flags.get(&id).copied().unwrap_or_default()
    }

    /// Marks `id` as pending and returns the value to request.
    pub fn begin(&mut self, id: ItemId) -> ServiceResult<bool> {
        let pending = self
            .flag(id)
            .begin_toggle()
            .ok_or(ServiceError::FavoritePending)?;
        self.flags.insert(id, pending);
        Ok(pending.displayed())
    }

    /// Settles `id` with the collaborator's answer.
    pub fn finish(&mut self, id: ItemId, result: ServiceResult<bool>) -> ServiceResult<bool> {
        let flag = self.flag(id);
        match result {
            Ok(stored) => {
                self.flags.insert(id, flag.confirm(stored));
                Ok(stored)
            }
            Err(err) => {
                self.flags.insert(id, flag.rollback());
                Err(err)
            }
        }
    }

    /// Toggles the favorite flag of `id` for the signed-in shopper.
    pub fn toggle<R>(&mut self, repo: &R, session: &Session, id: ItemId) -> ServiceResult<bool>
    where
        R: FavoriteWriter + ?Sized,
    {
        let user_id = session.require_user()?;
        let requested = self.begin(id)?;
        let result = repo.set_favorite(user_id, id, requested).map_err(|err| {
            log::error!("Failed to set favorite {id} to {requested}: {err}");
            ServiceError::from(err)
        });
        self.finish(id, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::UserId;
    use crate::models::session::SessionUser;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockMarket;

    fn signed_in() -> Session {
        Session::signed_in(SessionUser::new(UserId::new(3).unwrap(), "Mia"))
    }

    fn item() -> ItemId {
        ItemId::new(8).unwrap()
    }

    #[test]
    fn toggle_stores_the_server_value() {
        let mut repo = MockMarket::new();
        repo.expect_set_favorite()
            .times(1)
            .withf(|_, _, value| *value)
            .returning(|_, _, value| Ok(value));
        let mut tracker = FavoriteTracker::new();

        assert_eq!(tracker.toggle(&repo, &signed_in(), item()), Ok(true));
        assert_eq!(tracker.flag(item()), FavoriteFlag::settled(true));
    }

    #[test]
    fn failed_toggle_rolls_back() {
        let mut repo = MockMarket::new();
        repo.expect_set_favorite()
            .returning(|_, _, _| Err(RepositoryError::Network("offline".into())));
        let mut tracker = FavoriteTracker::new();
        tracker.seed([(item(), true)]);

        let result = tracker.toggle(&repo, &signed_in(), item());

        assert!(matches!(result, Err(ServiceError::Network(_))));
        assert_eq!(tracker.flag(item()), FavoriteFlag::settled(true));
    }

    #[test]
    fn anonymous_shopper_cannot_toggle() {
        let mut repo = MockMarket::new();
        repo.expect_set_favorite().never();
        let mut tracker = FavoriteTracker::new();

        let result = tracker.toggle(&repo, &Session::anonymous(), item());

        assert_eq!(result, Err(ServiceError::Unauthorized));
        assert!(!tracker.flag(item()).is_pending());
    }

    #[test]
    fn pending_flag_refuses_another_toggle() {
        let mut tracker = FavoriteTracker::new();
        assert_eq!(tracker.begin(item()), Ok(true));
        assert_eq!(tracker.begin(item()), Err(ServiceError::FavoritePending));

        assert_eq!(tracker.finish(item(), Ok(true)), Ok(true));
        assert_eq!(tracker.begin(item()), Ok(false));
    }
}
