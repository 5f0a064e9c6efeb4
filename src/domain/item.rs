use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryName, ConditionName, ItemId, Price};

/// Common surface of everything a listing view can show, filter and act on.
///
/// Two items are the same item only when their [`Listing::id`] matches.
pub trait Listing {
    fn id(&self) -> ItemId;
    /// Text matched by keyword filtering.
    fn searchable_text(&self) -> String;
    fn category(&self) -> Option<&CategoryName>;
    fn condition(&self) -> Option<&ConditionName>;
    fn price(&self) -> Price;
    /// Timestamp used by the `latest` and `addTime` orderings.
    fn timestamp(&self) -> NaiveDateTime;
    /// Whether the item can currently be put into a cart.
    fn is_available(&self) -> bool;
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    OnSale,
    Reserved,
    Sold,
    Withdrawn,
}

/// A secondhand item published in the campus catalog.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<CategoryName>,
    pub condition: Option<ConditionName>,
    pub price: Price,
    pub seller: String,
    #[serde(default)]
    pub status: ProductStatus,
    pub published_at: NaiveDateTime,
}

impl Listing for Product {
    fn id(&self) -> ItemId {
        self.id
    }

    fn searchable_text(&self) -> String {
        match &self.description {
            Some(description) => format!("{} {}", self.title, description),
            None => self.title.clone(),
        }
    }

    fn category(&self) -> Option<&CategoryName> {
        self.category.as_ref()
    }

    fn condition(&self) -> Option<&ConditionName> {
        self.condition.as_ref()
    }

    fn price(&self) -> Price {
        self.price
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.published_at
    }

    fn is_available(&self) -> bool {
        self.status == ProductStatus::OnSale
    }
}

/// A product saved to the shopper's wishlist.
///
/// The entry shares its identity with the product it wraps; ordering by time
/// uses the moment the product was saved rather than when it was published.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WishlistEntry {
    pub product: Product,
    pub added_at: NaiveDateTime,
}

impl Listing for WishlistEntry {
    fn id(&self) -> ItemId {
        self.product.id
    }

    fn searchable_text(&self) -> String {
        self.product.searchable_text()
    }

    fn category(&self) -> Option<&CategoryName> {
        self.product.category()
    }

    fn condition(&self) -> Option<&ConditionName> {
        self.product.condition()
    }

    fn price(&self) -> Price {
        self.product.price
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.added_at
    }

    fn is_available(&self) -> bool {
        self.product.is_available()
    }
}

impl<T: Listing + ?Sized> Listing for &T {
    fn id(&self) -> ItemId {
        (**self).id()
    }

    fn searchable_text(&self) -> String {
        (**self).searchable_text()
    }

    fn category(&self) -> Option<&CategoryName> {
        (**self).category()
    }

    fn condition(&self) -> Option<&ConditionName> {
        (**self).condition()
    }

    fn price(&self) -> Price {
        (**self).price()
    }

    fn timestamp(&self) -> NaiveDateTime {
        (**self).timestamp()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}
