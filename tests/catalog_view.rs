use campus_storefront::domain::item::{Product, ProductStatus};
use campus_storefront::domain::query::{QueryDefaults, QueryState, SortBy};
use campus_storefront::models::session::Session;
use campus_storefront::projection::{Applied, ServerProjector, ViewProjector};
use campus_storefront::repository::CatalogReader;
use campus_storefront::repository::memory::MemoryMarket;
use campus_storefront::services::ServiceError;
use campus_storefront::services::batch::{BatchAction, BatchOutcome};
use campus_storefront::services::listing::{CatalogView, ListingView};
use campus_storefront::url_sync::MemoryHistory;

mod common;

use common::{id, numbered, product, shopper, user};

fn defaults() -> QueryDefaults {
    QueryDefaults::new(12, SortBy::Latest)
}

fn open(market: &MemoryMarket, session: Session, location: &str) -> (CatalogView, MemoryHistory) {
    let mut history = MemoryHistory::new(location);
    let mut view = ListingView::catalog(session, defaults());
    view.mount(market, &mut history).unwrap();
    (view, history)
}

#[test]
fn anonymous_shoppers_can_search() {
    let mut products = numbered(6);
    products.push(product(7, "Desk lamp", "furniture", 12.0));
    let market = MemoryMarket::new().with_products(products);
    let (mut view, mut history) = open(&market, Session::anonymous(), "");

    view.edit_keyword("LAMP");
    view.submit_search(&market, &mut history).unwrap();

    assert_eq!(view.visible_ids(), vec![id(7)]);
    assert_eq!(history.entries().last().map(String::as_str), Some("keyword=LAMP"));
    assert_eq!(market.search_calls(), 2);
}

#[test]
fn newest_listings_are_shown_first() {
    let market = MemoryMarket::new().with_products(numbered(3));
    let (view, _history) = open(&market, Session::anonymous(), "");

    assert_eq!(view.visible_ids(), vec![id(3), id(2), id(1)]);
}

#[test]
fn selections_from_earlier_pages_are_added_to_cart() {
    let mut products = numbered(30);
    products[27].status = ProductStatus::Sold;
    let market = MemoryMarket::new().with_products(products);
    let (mut view, mut history) = open(&market, shopper(), "");

    // Page 1 holds listings 30 down to 19.
    view.toggle(id(30));
    view.toggle(id(28));
    view.go_to_page(&market, &mut history, 2).unwrap();
    view.toggle(id(10));

    let outcome = view
        .run_batch(&market, &mut history, BatchAction::AddToCart)
        .unwrap();

    assert_eq!(
        outcome,
        BatchOutcome::Succeeded {
            action: BatchAction::AddToCart,
            succeeded: vec![id(10), id(30)],
            ineligible: 1,
        }
    );
    assert_eq!(market.cart(user()), vec![id(10), id(30)]);
    assert_eq!(view.selection().ids(), vec![id(28)]);
}

#[test]
fn anonymous_batch_is_refused() {
    let market = MemoryMarket::new().with_products(numbered(3));
    let (mut view, mut history) = open(&market, Session::anonymous(), "");
    view.select_page();

    let result = view.run_batch(&market, &mut history, BatchAction::AddToCart);

    assert_eq!(result, Err(ServiceError::Unauthorized));
    assert_eq!(view.selection().len(), 3);
}

#[test]
fn late_response_for_an_abandoned_query_is_dropped() {
    let market = MemoryMarket::new().with_products(numbered(30));
    let mut projector: ServerProjector<Product> = ServerProjector::new(12);
    let base = QueryState::new(&defaults());

    let slow = projector.issue(&base.clone().with_keyword("Listing 1")).unwrap();
    let fast = projector.issue(&base.clone().with_keyword("Listing 2")).unwrap();

    let fast_page = market.search_products(fast.query());
    assert_eq!(projector.apply(&fast, fast_page), Ok(Applied::Fresh));
    let slow_page = market.search_products(slow.query());
    assert_eq!(projector.apply(&slow, slow_page), Ok(Applied::Stale));

    assert!(projector.view().items.iter().all(|item| item.title.contains("Listing 2")));
}

#[test]
fn favorites_round_trip_through_the_market() {
    let market = MemoryMarket::new().with_products(numbered(2));
    let (mut view, _history) = open(&market, shopper(), "");

    assert_eq!(view.toggle_favorite(&market, id(1)), Ok(true));
    assert_eq!(view.toggle_favorite(&market, id(1)), Ok(false));
    assert!(!market.is_favorite(user(), id(1)));

    market.set_offline(true);
    assert!(matches!(
        view.toggle_favorite(&market, id(2)),
        Err(ServiceError::Network(_))
    ));
    let data = view.page_data();
    let row = data.page.items.iter().find(|row| row.item.id == id(2)).unwrap();
    assert!(!row.favorite.displayed());
}
