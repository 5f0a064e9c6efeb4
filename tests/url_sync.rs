use campus_storefront::domain::query::{QueryDefaults, QueryState, SortBy};
use campus_storefront::domain::types::CategoryName;
use campus_storefront::forms::query::{parse, serialize};
use campus_storefront::url_sync::{HistoryPort, MemoryHistory, UrlSync, UrlWrite};

fn defaults() -> QueryDefaults {
    QueryDefaults::new(12, SortBy::Latest)
}

#[test]
fn shared_link_reproduces_the_same_state() {
    let state = QueryState::new(&defaults())
        .with_keyword("mini fridge")
        .with_category(Some(CategoryName::new("appliances").unwrap()))
        .with_price_range(Some("20-150".parse().unwrap()))
        .with_sort(SortBy::PriceAsc)
        .with_page(2);

    let link = serialize(&state, &defaults());
    let mut history = MemoryHistory::new(format!("?{link}"));
    let mut sync = UrlSync::new(defaults());

    assert_eq!(sync.load(&mut history), state);
    assert_eq!(history.len(), 1);
}

#[test]
fn malformed_location_is_canonicalized_in_place() {
    let mut history = MemoryHistory::new("?page=zero&sortBy=latest&ref=flyer&keyword=%20desk%20");
    let mut sync = UrlSync::new(defaults());

    let state = sync.load(&mut history);

    assert_eq!(state.keyword(), "desk");
    assert_eq!(state.page(), 1);
    assert_eq!(history.entries(), ["keyword=desk".to_string()]);
    assert_eq!(sync.committed(), "keyword=desk");
}

#[test]
fn commits_push_and_corrections_replace() {
    let mut history = MemoryHistory::default();
    let mut sync = UrlSync::new(defaults());
    let state = sync.load(&mut history);

    let page_five = state.clone().with_page(5);
    assert_eq!(sync.commit(&mut history, &page_five), UrlWrite::Pushed);
    assert_eq!(sync.commit(&mut history, &page_five), UrlWrite::Unchanged);

    let page_three = page_five.with_page(3);
    assert_eq!(sync.correct(&mut history, &page_three), UrlWrite::Replaced);

    assert_eq!(history.entries(), ["".to_string(), "page=3".to_string()]);
    assert_eq!(history.current_query(), "page=3");
}

#[test]
fn new_commit_after_back_discards_forward_entries() {
    let mut history = MemoryHistory::default();
    let mut sync = UrlSync::new(defaults());
    let state = sync.load(&mut history);
    sync.commit(&mut history, &state.clone().with_page(2));
    sync.commit(&mut history, &state.clone().with_page(3));

    assert!(history.back());
    let rehydrated = sync.load(&mut history);
    assert_eq!(rehydrated.page(), 2);

    sync.commit(&mut history, &rehydrated.with_sort(SortBy::PriceDesc));

    assert_eq!(history.len(), 3);
    assert!(!history.forward());
    assert_eq!(
        parse(&history.current_query(), &defaults()).sort_by(),
        SortBy::PriceDesc
    );
}
