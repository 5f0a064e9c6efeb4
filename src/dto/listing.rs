use serde::Serialize;

use crate::domain::favorite::FavoriteFlag;
use crate::domain::query::QueryState;
use crate::dto::notice::Notice;
use crate::pagination::Paginated;
use crate::projection::LoadState;

/// One rendered card or table row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListingRow<T> {
    pub item: T,
    pub selected: bool,
    pub favorite: FavoriteFlag,
}

/// Data required to render a listing template.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListingPageData<T> {
    /// Rows of the page shown, with the pager around them.
    pub page: Paginated<ListingRow<T>>,
    pub query: QueryState,
    /// Canonical query string, without the leading `?`.
    pub query_string: String,
    /// Keyword as typed in the search box, possibly not yet submitted.
    pub keyword_draft: String,
    /// Header checkbox: every visible row is selected.
    pub all_selected: bool,
    /// Header checkbox: indeterminate.
    pub partially_selected: bool,
    /// Selected identities across all pages.
    pub selected_count: usize,
    pub load_state: LoadState,
    pub batch_pending: bool,
    pub notices: Vec<Notice>,
}
