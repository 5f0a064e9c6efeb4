#![allow(dead_code)]

use campus_storefront::domain::item::{Product, ProductStatus, WishlistEntry};
use campus_storefront::domain::types::{CategoryName, ConditionName, ItemId, Price, UserId};
use campus_storefront::models::session::{Session, SessionUser};
use chrono::{Duration, NaiveDate, NaiveDateTime};

pub fn user() -> UserId {
    UserId::new(7).unwrap()
}

pub fn shopper() -> Session {
    Session::signed_in(SessionUser::new(user(), "Jordan"))
}

pub fn id(raw: i32) -> ItemId {
    ItemId::new(raw).unwrap()
}

pub fn at(minutes: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 10, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        + Duration::minutes(minutes)
}

pub fn product(raw_id: i32, title: &str, category: &str, price: f64) -> Product {
    Product {
        id: id(raw_id),
        title: title.to_string(),
        description: Some(format!("Gently used {title}, pick up at the library")),
        category: Some(CategoryName::new(category).unwrap()),
        condition: Some(ConditionName::new("good").unwrap()),
        price: Price::new(price).unwrap(),
        seller: "student-union".to_string(),
        status: ProductStatus::OnSale,
        published_at: at(i64::from(raw_id)),
    }
}

/// Numbered products alternating between books and furniture.
pub fn numbered(count: i32) -> Vec<Product> {
    (1..=count)
        .map(|raw_id| {
            let category = if raw_id % 2 == 0 { "books" } else { "furniture" };
            product(raw_id, &format!("Listing {raw_id}"), category, 5.0 * f64::from(raw_id))
        })
        .collect()
}

/// Wishlist where the first product was saved last.
pub fn saved(products: Vec<Product>) -> Vec<WishlistEntry> {
    let count = products.len() as i64;
    products
        .into_iter()
        .enumerate()
        .map(|(index, product)| WishlistEntry {
            product,
            added_at: at(1_000 + count - index as i64),
        })
        .collect()
}
