//! Query-string representation of [`QueryState`].
//!
//! Parsing is total: every missing or malformed parameter falls back to the
//! view default. Serialization omits parameters equal to their default, so
//! `parse(serialize(parse(s))) == parse(s)` holds for any input `s`.

use serde::{Deserialize, Serialize};
use validator::{ValidateLength, ValidateRange};

use crate::MAX_KEYWORD_LENGTH;
use crate::domain::query::{QueryDefaults, QueryState, SortBy};
use crate::domain::types::{CategoryName, ConditionName, PriceRange};
use crate::forms::FormError;

/// Raw `key=value` parameters of a listing URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<String>,
}

impl QueryForm {
    /// Decodes a query string (with or without the leading `?`).
    ///
    /// Unknown keys are ignored and the last occurrence of a repeated key
    /// wins.
    pub fn from_query_string(query_string: &str) -> Result<Self, FormError> {
        let raw = query_string.trim().trim_start_matches('?');
        let pairs: Vec<(String, String)> =
            serde_html_form::from_str(raw).map_err(|err| FormError::Malformed(err.to_string()))?;

        let mut form = QueryForm::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "keyword" => &mut form.keyword,
                "category" => &mut form.category,
                "condition" => &mut form.condition,
                "priceRange" => &mut form.price_range,
                "sortBy" => &mut form.sort_by,
                "page" => &mut form.page,
                "pageSize" => &mut form.page_size,
                _ => continue,
            };
            *slot = Some(value);
        }
        Ok(form)
    }

    /// Encodes the non-default parts of `state`.
    pub fn from_state(state: &QueryState, defaults: &QueryDefaults) -> Self {
        Self {
            keyword: Some(state.keyword().to_string()).filter(|keyword| !keyword.is_empty()),
            category: state.category().map(ToString::to_string),
            condition: state.condition().map(ToString::to_string),
            price_range: state.price_range().map(ToString::to_string),
            sort_by: (state.sort_by() != defaults.sort_by)
                .then(|| state.sort_by().as_str().to_string()),
            page: (state.page() != 1).then(|| state.page().to_string()),
            page_size: (state.page_size() != defaults.page_size)
                .then(|| state.page_size().to_string()),
        }
    }

    pub fn to_query_string(&self) -> Result<String, FormError> {
        serde_html_form::to_string(self).map_err(|err| FormError::Malformed(err.to_string()))
    }

    /// Resolves every parameter, replacing invalid ones with defaults.
    pub fn into_state(self, defaults: &QueryDefaults) -> QueryState {
        let mut state = QueryState::new(defaults);

        if let Some(keyword) = or_default("keyword", self.keyword.map(parse_keyword).transpose()) {
            state = state.with_keyword(keyword);
        }
        state = state
            .with_category(or_default(
                "category",
                self.category.map(parse_category).transpose(),
            ))
            .with_condition(or_default(
                "condition",
                self.condition.map(parse_condition).transpose(),
            ))
            .with_price_range(or_default(
                "priceRange",
                self.price_range.map(parse_price_range).transpose(),
            ));
        if let Some(sort_by) = or_default("sortBy", self.sort_by.map(parse_sort).transpose()) {
            state = state.with_sort(sort_by);
        }
        if let Some(page) = or_default("page", self.page.map(parse_page).transpose()) {
            state = state.with_page(page);
        }
        let page_size = self
            .page_size
            .map(|raw| parse_page_size(raw, defaults.max_page_size))
            .transpose();
        if let Some(page_size) = or_default("pageSize", page_size) {
            state = state.with_page_size(page_size);
        }

        state
    }
}

/// Builds a [`QueryState`] from a query string. Never fails.
pub fn parse(query_string: &str, defaults: &QueryDefaults) -> QueryState {
    match QueryForm::from_query_string(query_string) {
        Ok(form) => form.into_state(defaults),
        Err(err) => {
            log::debug!("Ignoring unreadable query string `{query_string}`: {err}");
            QueryState::new(defaults)
        }
    }
}

/// Renders the minimal query string for `state`, without a leading `?`.
pub fn serialize(state: &QueryState, defaults: &QueryDefaults) -> String {
    QueryForm::from_state(state, defaults)
        .to_query_string()
        .unwrap_or_else(|err| {
            log::error!("Failed to encode query state: {err}");
            String::new()
        })
}

fn or_default<T>(field: &'static str, parsed: Result<Option<T>, FormError>) -> Option<T> {
    parsed.unwrap_or_else(|err| {
        log::debug!("Falling back to default `{field}`: {err}");
        None
    })
}

fn invalid(field: &'static str, reason: impl ToString) -> FormError {
    FormError::InvalidField {
        field,
        reason: reason.to_string(),
    }
}

fn parse_keyword(raw: String) -> Result<String, FormError> {
    let keyword = raw.trim().to_string();
    if keyword.validate_length(None, Some(MAX_KEYWORD_LENGTH), None) {
        Ok(keyword)
    } else {
        Err(invalid("keyword", "too long"))
    }
}

fn parse_category(raw: String) -> Result<CategoryName, FormError> {
    CategoryName::new(raw).map_err(|err| invalid("category", err))
}

fn parse_condition(raw: String) -> Result<ConditionName, FormError> {
    ConditionName::new(raw).map_err(|err| invalid("condition", err))
}

fn parse_price_range(raw: String) -> Result<PriceRange, FormError> {
    raw.parse().map_err(|err| invalid("priceRange", err))
}

fn parse_sort(raw: String) -> Result<SortBy, FormError> {
    raw.parse().map_err(|err| invalid("sortBy", err))
}

fn parse_page(raw: String) -> Result<usize, FormError> {
    let page: usize = raw.trim().parse().map_err(|err| invalid("page", err))?;
    if page.validate_range(Some(1usize), None, None, None) {
        Ok(page)
    } else {
        Err(invalid("page", "must be at least 1"))
    }
}

fn parse_page_size(raw: String, max_page_size: usize) -> Result<usize, FormError> {
    let page_size: usize = raw.trim().parse().map_err(|err| invalid("pageSize", err))?;
    if page_size.validate_range(Some(1usize), Some(max_page_size), None, None) {
        Ok(page_size)
    } else {
        Err(invalid("pageSize", format!("must be within 1..={max_page_size}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Price;

    fn defaults() -> QueryDefaults {
        QueryDefaults::new(12, SortBy::Latest)
    }

    #[test]
    fn empty_query_string_yields_defaults() {
        let state = parse("", &defaults());
        assert_eq!(state, QueryState::new(&defaults()));
        assert_eq!(serialize(&state, &defaults()), "");
    }

    #[test]
    fn parses_every_parameter() {
        let state = parse(
            "?keyword=desk%20lamp&category=home&condition=like-new&priceRange=10-80.5&sortBy=price_asc&page=3&pageSize=24",
            &defaults(),
        );

        assert_eq!(state.keyword(), "desk lamp");
        assert_eq!(state.category().map(|c| c.as_str()), Some("home"));
        assert_eq!(state.condition().map(|c| c.as_str()), Some("like-new"));
        assert_eq!(
            state.price_range().map(ToString::to_string),
            Some("10-80.5".to_string())
        );
        assert_eq!(state.sort_by(), SortBy::PriceAsc);
        assert_eq!(state.page(), 3);
        assert_eq!(state.page_size(), 24);
    }

    #[test]
    fn malformed_fields_fall_back_individually() {
        let state = parse(
            "keyword=bike&page=-2&pageSize=100000&sortBy=cheapest&category=",
            &defaults(),
        );

        assert_eq!(state.keyword(), "bike");
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), 12);
        assert_eq!(state.sort_by(), SortBy::Latest);
        assert_eq!(state.category(), None);
    }

    #[test]
    fn inverted_price_range_is_rejected_not_swapped() {
        let state = parse("priceRange=5000-1000", &defaults());
        assert_eq!(state.price_range(), None);
    }

    #[test]
    fn zero_page_falls_back_to_first_page() {
        assert_eq!(parse("page=0", &defaults()).page(), 1);
        assert_eq!(parse("page=abc", &defaults()).page(), 1);
    }

    #[test]
    fn serialize_omits_defaults() {
        let state = QueryState::new(&defaults())
            .with_keyword("lamp")
            .with_page(2);
        assert_eq!(serialize(&state, &defaults()), "keyword=lamp&page=2");

        let back_to_default = state.with_keyword("").with_page(1);
        assert_eq!(serialize(&back_to_default, &defaults()), "");
    }

    #[test]
    fn serialize_percent_encodes_keywords() {
        let state = QueryState::new(&defaults()).with_keyword("a&b=c");
        let encoded = serialize(&state, &defaults());
        assert!(!encoded.contains("a&b"));
        assert_eq!(parse(&encoded, &defaults()).keyword(), "a&b=c");
    }

    #[test]
    fn reparsing_serialized_state_is_stable() {
        let inputs = [
            "",
            "keyword=%20%20Bike%20&page=2",
            "category=books&priceRange=0-15&sortBy=price_desc",
            "page=9999&pageSize=7&sortBy=latest",
            "priceRange=5000-1000&condition=%20&unknown=1",
            "keyword=a&keyword=b&page=x",
            "priceRange=1e3-2000",
            "%%%&&==",
        ];
        for input in inputs {
            let once = parse(input, &defaults());
            let twice = parse(&serialize(&once, &defaults()), &defaults());
            assert_eq!(once, twice, "input `{input}`");
        }
    }

    #[test]
    fn built_states_survive_the_url() {
        let range = |min: f64, max: f64| {
            Some(PriceRange::new(Price::new(min).unwrap(), Price::new(max).unwrap()).unwrap())
        };
        let base = QueryState::new(&defaults());
        let states = [
            base.clone().with_keyword("x".repeat(150)),
            base.clone().with_keyword(format!("{} +&= ünï", "long ".repeat(30))),
            base.clone().with_price_range(range(0.0, 0.0)),
            base.clone().with_price_range(range(-0.0, 5.0)),
            base.clone().with_price_range(range(0.1, 19.99)),
            base.clone()
                .with_sort(SortBy::PriceDesc)
                .with_page_size(defaults().max_page_size)
                .with_page(4),
            base.clone()
                .with_category(Some(CategoryName::new("books").unwrap()))
                .with_condition(Some(ConditionName::new("like-new").unwrap()))
                .with_sort(SortBy::AddTime),
        ];
        for state in states {
            let encoded = serialize(&state, &defaults());
            assert_eq!(parse(&encoded, &defaults()), state, "encoded `{encoded}`");
        }
    }

    #[test]
    fn repeated_keys_keep_the_last_value() {
        let state = parse("keyword=a&keyword=b", &defaults());
        assert_eq!(state.keyword(), "b");
    }
}
