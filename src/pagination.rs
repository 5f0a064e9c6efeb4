use std::ops::Range;

use serde::Serialize;

/// Shape of the pager: pages pinned at both ends and around the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PagerWindow {
    edge: usize,
    before: usize,
    after: usize,
}

const STOREFRONT_PAGER: PagerWindow = PagerWindow {
    edge: 2,
    before: 2,
    after: 4,
};

impl PagerWindow {
    /// Page numbers to render, with `None` where a run of pages is elided.
    fn pages(self, total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
        if total_pages == 0 {
            return Vec::new();
        }
        let end = total_pages + 1;
        let head = 1..(1 + self.edge).min(end);
        let around = head.end.max(current_page.saturating_sub(self.before))
            ..(current_page + self.after + 1).min(end);
        let tail = around.end.max(end.saturating_sub(self.edge))..end;

        let mut pages: Vec<Option<usize>> = head.clone().map(Some).collect();
        let mut cursor = head.end;
        for run in [around, tail] {
            push_run(&mut pages, &mut cursor, run);
        }
        pages
    }
}

/// Appends `run`, marking a gap when it does not continue from `cursor`.
fn push_run(pages: &mut Vec<Option<usize>>, cursor: &mut usize, run: Range<usize>) {
    if run.start > *cursor {
        pages.push(None);
    }
    *cursor = run.end.max(*cursor);
    pages.extend(run.map(Some));
}

/// One page of rows together with the pager window around it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_pages: usize,
    /// Matching items across all pages.
    pub total_items: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize, total_items: usize) -> Self {
        let page = current_page.max(1);

        Self {
            items,
            pages: STOREFRONT_PAGER.pages(total_pages, page),
            page,
            total_pages,
            total_items,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_listing_shows_every_page() {
        assert_eq!(
            STOREFRONT_PAGER.pages(3, 2),
            vec![Some(1), Some(2), Some(3)]
        );
    }

    #[test]
    fn long_listing_elides_both_sides() {
        assert_eq!(
            STOREFRONT_PAGER.pages(30, 15),
            vec![
                Some(1),
                Some(2),
                None,
                Some(13),
                Some(14),
                Some(15),
                Some(16),
                Some(17),
                Some(18),
                Some(19),
                None,
                Some(29),
                Some(30),
            ]
        );
    }

    #[test]
    fn window_near_the_start_has_a_single_gap() {
        assert_eq!(
            STOREFRONT_PAGER.pages(20, 1),
            vec![
                Some(1),
                Some(2),
                Some(3),
                Some(4),
                Some(5),
                None,
                Some(19),
                Some(20),
            ]
        );
    }

    #[test]
    fn window_near_the_end_merges_with_the_tail() {
        assert_eq!(
            STOREFRONT_PAGER.pages(10, 9),
            vec![
                Some(1),
                Some(2),
                None,
                Some(7),
                Some(8),
                Some(9),
                Some(10),
            ]
        );
    }

    #[test]
    fn empty_listing_has_no_pager() {
        let paginated: Paginated<()> = Paginated::new(vec![], 1, 0, 0);
        assert!(paginated.pages.is_empty());
        assert!(!paginated.has_next);
        assert!(!paginated.has_previous);
    }

    #[test]
    fn zero_page_is_treated_as_first() {
        let paginated = Paginated::new(vec![1, 2], 0, 3, 25);
        assert_eq!(paginated.page, 1);
        assert!(paginated.has_next);
        assert!(!paginated.has_previous);
    }
}
