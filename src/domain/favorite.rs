//! Two-phase favorite flag shown on product cards.

use serde::Serialize;

/// Favorite state of a single product as the shopper sees it.
///
/// A toggle is shown immediately as `Pending` and only becomes `Settled`
/// once the server answers, either with the value it stored or, on failure,
/// with the last confirmed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum FavoriteFlag {
    Settled { value: bool },
    Pending { confirmed: bool, requested: bool },
}

impl FavoriteFlag {
    pub const fn settled(value: bool) -> Self {
        FavoriteFlag::Settled { value }
    }

    /// Value rendered on the card.
    pub const fn displayed(self) -> bool {
        match self {
            FavoriteFlag::Settled { value } => value,
            FavoriteFlag::Pending { requested, .. } => requested,
        }
    }

    pub const fn is_pending(self) -> bool {
        matches!(self, FavoriteFlag::Pending { .. })
    }

    /// Starts a toggle, or returns `None` while a previous one is unresolved.
    pub const fn begin_toggle(self) -> Option<Self> {
        match self {
            FavoriteFlag::Settled { value } => Some(FavoriteFlag::Pending {
                confirmed: value,
                requested: !value,
            }),
            FavoriteFlag::Pending { .. } => None,
        }
    }

    /// Settles on the value the server reported.
    pub const fn confirm(self, stored: bool) -> Self {
        FavoriteFlag::Settled { value: stored }
    }

    /// Drops the pending request and restores the last confirmed value.
    pub const fn rollback(self) -> Self {
        match self {
            FavoriteFlag::Pending { confirmed, .. } => FavoriteFlag::Settled { value: confirmed },
            settled => settled,
        }
    }
}

impl Default for FavoriteFlag {
    fn default() -> Self {
        FavoriteFlag::settled(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_displayed_before_confirmation() {
        let pending = FavoriteFlag::settled(false).begin_toggle().unwrap();
        assert!(pending.displayed());
        assert!(pending.is_pending());
        assert_eq!(pending.confirm(true), FavoriteFlag::settled(true));
    }

    #[test]
    fn rollback_restores_confirmed_value() {
        let pending = FavoriteFlag::settled(true).begin_toggle().unwrap();
        assert!(!pending.displayed());
        assert_eq!(pending.rollback(), FavoriteFlag::settled(true));
    }

    #[test]
    fn second_toggle_while_pending_is_refused() {
        let pending = FavoriteFlag::settled(false).begin_toggle().unwrap();
        assert_eq!(pending.begin_toggle(), None);
    }
}
