//! Cross-page multi-select used by batch actions.

use std::collections::HashSet;

use crate::domain::types::ItemId;

/// Identities the shopper marked for a batch action.
///
/// Selections outlive filtering and pagination: an identity that is not on
/// the current page stays selected but is ignored by the page-scoped checks.
/// Only explicit operations change the set, plus [`SelectionSet::prune`]
/// once items are gone from the working set for good.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: HashSet<ItemId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the selection of `id`, returning the new state.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Selects every identity on the current page.
    pub fn select_all(&mut self, visible: &[ItemId]) {
        self.selected.extend(visible.iter().copied());
    }

    /// Deselects the identities on the current page only.
    pub fn clear_all(&mut self, visible: &[ItemId]) {
        for id in visible {
            self.selected.remove(id);
        }
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    /// Header checkbox state: `true` iff the page is non-empty and fully selected.
    pub fn all_selected_on_page(&self, visible: &[ItemId]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.is_selected(*id))
    }

    /// Indeterminate header state: some, but not all, visible items selected.
    pub fn partially_selected_on_page(&self, visible: &[ItemId]) -> bool {
        let selected = self.selected_on_page(visible);
        selected > 0 && selected < visible.len()
    }

    pub fn selected_on_page(&self, visible: &[ItemId]) -> usize {
        visible.iter().filter(|id| self.is_selected(**id)).count()
    }

    /// Drops identities removed from the working set.
    pub fn prune(&mut self, removed: &[ItemId]) {
        for id in removed {
            self.selected.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected identities in ascending order.
    pub fn ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i32]) -> Vec<ItemId> {
        raw.iter().map(|id| ItemId::new(*id).unwrap()).collect()
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = SelectionSet::new();
        let id = ItemId::new(4).unwrap();

        assert!(selection.toggle(id));
        assert!(selection.is_selected(id));
        assert!(!selection.toggle(id));
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_and_clear_all_are_page_scoped() {
        let page_one = ids(&[1, 2, 3]);
        let page_two = ids(&[4, 5]);
        let mut selection = SelectionSet::new();

        selection.select_all(&page_one);
        selection.select_all(&page_two);
        selection.clear_all(&page_two);

        assert_eq!(selection.ids(), page_one);
        assert!(selection.all_selected_on_page(&page_one));
        assert!(!selection.all_selected_on_page(&page_two));
    }

    #[test]
    fn partial_selection_is_strictly_between_none_and_all() {
        let page = ids(&[1, 2, 3]);
        let mut selection = SelectionSet::new();
        assert!(!selection.partially_selected_on_page(&page));

        selection.toggle(page[0]);
        assert!(selection.partially_selected_on_page(&page));
        assert!(!selection.all_selected_on_page(&page));

        selection.select_all(&page);
        assert!(!selection.partially_selected_on_page(&page));
        assert!(selection.all_selected_on_page(&page));
    }

    #[test]
    fn off_page_selections_are_inert_for_page_checks() {
        let mut selection = SelectionSet::new();
        selection.select_all(&ids(&[9, 10]));

        let page = ids(&[1, 2]);
        assert!(!selection.all_selected_on_page(&page));
        assert!(!selection.partially_selected_on_page(&page));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn empty_page_is_never_all_selected() {
        let mut selection = SelectionSet::new();
        selection.select_all(&ids(&[1]));
        assert!(!selection.all_selected_on_page(&[]));
        assert!(!selection.partially_selected_on_page(&[]));
    }

    #[test]
    fn prune_removes_only_given_ids() {
        let mut selection = SelectionSet::new();
        selection.select_all(&ids(&[1, 2, 3]));
        selection.prune(&ids(&[2]));
        assert_eq!(selection.ids(), ids(&[1, 3]));
    }
}
