//! Domain values shared by the storefront listing views.

pub mod favorite;
pub mod item;
pub mod query;
pub mod types;
pub mod view;
