//! Filter, sort and pagination criteria of a single listing view.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::domain::item::Listing;
use crate::domain::types::{CategoryName, ConditionName, PriceRange, TypeConstraintError};
use crate::{DEFAULT_PAGE_SIZE, MAX_KEYWORD_LENGTH, MAX_PAGE_SIZE};

/// Ordering applied to a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SortBy {
    /// Keep the order the items arrived in.
    #[default]
    #[serde(rename = "default")]
    Relevance,
    #[serde(rename = "price_asc")]
    PriceAsc,
    #[serde(rename = "price_desc")]
    PriceDesc,
    /// Newest publication first.
    #[serde(rename = "latest")]
    Latest,
    /// Most recently saved first.
    #[serde(rename = "addTime")]
    AddTime,
}

impl SortBy {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortBy::Relevance => "default",
            SortBy::PriceAsc => "price_asc",
            SortBy::PriceDesc => "price_desc",
            SortBy::Latest => "latest",
            SortBy::AddTime => "addTime",
        }
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "default" => Ok(SortBy::Relevance),
            "price_asc" => Ok(SortBy::PriceAsc),
            "price_desc" => Ok(SortBy::PriceDesc),
            "latest" => Ok(SortBy::Latest),
            "addTime" => Ok(SortBy::AddTime),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown sort order `{other}`"
            ))),
        }
    }
}

/// Per-view defaults that missing or malformed URL parameters resolve to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryDefaults {
    pub page_size: usize,
    pub sort_by: SortBy,
    /// Largest page size accepted from a URL.
    pub max_page_size: usize,
}

impl QueryDefaults {
    pub fn new(page_size: usize, sort_by: SortBy) -> Self {
        Self {
            page_size: page_size.max(1),
            sort_by,
            max_page_size: MAX_PAGE_SIZE.max(page_size),
        }
    }

    pub fn max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size.max(self.page_size);
        self
    }
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, SortBy::Relevance)
    }
}

/// Immutable description of what a listing view currently shows.
///
/// Every change produces a new value through the consuming `with_*`
/// builders; `page` and `page_size` never drop below one.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    keyword: String,
    category: Option<CategoryName>,
    condition: Option<ConditionName>,
    price_range: Option<PriceRange>,
    sort_by: SortBy,
    page: usize,
    page_size: usize,
}

impl QueryState {
    /// First page of the unfiltered listing in the view's default order.
    pub fn new(defaults: &QueryDefaults) -> Self {
        Self {
            keyword: String::new(),
            category: None,
            condition: None,
            price_range: None,
            sort_by: defaults.sort_by,
            page: 1,
            page_size: defaults.page_size.max(1),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn category(&self) -> Option<&CategoryName> {
        self.category.as_ref()
    }

    pub fn condition(&self) -> Option<&ConditionName> {
        self.condition.as_ref()
    }

    pub fn price_range(&self) -> Option<&PriceRange> {
        self.price_range.as_ref()
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replaces the keyword; an empty string clears keyword filtering.
    ///
    /// Keywords longer than [`MAX_KEYWORD_LENGTH`] characters are cut short
    /// so the URL can always carry them.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let trimmed = keyword.trim();
        let limit = usize::try_from(MAX_KEYWORD_LENGTH).unwrap_or(usize::MAX);
        self.keyword = match trimmed.char_indices().nth(limit) {
            Some((cut, _)) => trimmed[..cut].trim_end().to_string(),
            None => trimmed.to_string(),
        };
        self
    }

    pub fn with_category(mut self, category: Option<CategoryName>) -> Self {
        self.category = category;
        self
    }

    pub fn with_condition(mut self, condition: Option<ConditionName>) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_price_range(mut self, price_range: Option<PriceRange>) -> Self {
        self.price_range = price_range;
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Zero-based index of the first item on the current page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Returns `true` when `item` passes every active filter predicate.
    pub fn matches<T: Listing + ?Sized>(&self, item: &T) -> bool {
        if !self.keyword.is_empty() {
            let needle = self.keyword.to_lowercase();
            if !item.searchable_text().to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(category) = &self.category
            && item.category() != Some(category)
        {
            return false;
        }
        if let Some(condition) = &self.condition
            && item.condition() != Some(condition)
        {
            return false;
        }
        if let Some(range) = &self.price_range
            && !range.contains(item.price())
        {
            return false;
        }
        true
    }
}
