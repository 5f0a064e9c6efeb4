use serde::Serialize;

use crate::domain::item::Listing;
use crate::domain::types::ItemId;

/// One rendered page of a listing.
///
/// Rebuilt from the working set and the query every time either changes;
/// nothing outside the projector holds on to it across refreshes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DerivedView<T> {
    /// Items on the current page, in display order.
    pub items: Vec<T>,
    /// Number of items matching the filters before pagination.
    pub total: usize,
    /// Page actually shown, after clamping.
    pub page: usize,
    pub page_size: usize,
    /// Page that was asked for.
    #[serde(skip)]
    pub requested_page: usize,
}

impl<T> DerivedView<T> {
    pub fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size: page_size.max(1),
            requested_page: 1,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size.max(1))
    }

    /// Returns `true` when the requested page was out of range and the last
    /// valid page was substituted.
    pub fn was_clamped(&self) -> bool {
        self.page != self.requested_page
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Listing> DerivedView<T> {
    pub fn visible_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(Listing::id).collect()
    }
}
