//! Keeps a listing's [`QueryState`] and the address bar in step.

use crate::domain::query::{QueryDefaults, QueryState};
use crate::forms::query::{parse, serialize};

/// Browser location and session history as seen by a listing view.
///
/// Query strings are exchanged without the leading `?`.
pub trait HistoryPort {
    fn current_query(&self) -> String;
    /// Adds a new history entry without reloading the page.
    fn push(&mut self, query_string: &str);
    /// Rewrites the current history entry in place.
    fn replace(&mut self, query_string: &str);
}

/// What a sync call did to the history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlWrite {
    Pushed,
    Replaced,
    Unchanged,
}

/// Two-way binding between one view's query state and its URL.
#[derive(Debug, Clone)]
pub struct UrlSync {
    defaults: QueryDefaults,
    committed: String,
}

impl UrlSync {
    pub fn new(defaults: QueryDefaults) -> Self {
        Self {
            defaults,
            committed: String::new(),
        }
    }

    pub fn defaults(&self) -> &QueryDefaults {
        &self.defaults
    }

    /// Query string last written to, or read from, the history.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// Derives the state from the current location.
    ///
    /// Used on mount and after back/forward navigation. When the location
    /// carried malformed or redundant parameters, the entry is rewritten to
    /// the canonical form so the address bar matches what is shown.
    pub fn load<H>(&mut self, history: &mut H) -> QueryState
    where
        H: HistoryPort + ?Sized,
    {
        let raw = history.current_query();
        let state = parse(&raw, &self.defaults);
        let canonical = serialize(&state, &self.defaults);
        if canonical != raw.trim().trim_start_matches('?') {
            log::debug!("Canonicalizing location `{raw}` to `{canonical}`");
            history.replace(&canonical);
        }
        self.committed = canonical;
        state
    }

    /// Records a user-initiated change as one new history entry.
    pub fn commit<H>(&mut self, history: &mut H, state: &QueryState) -> UrlWrite
    where
        H: HistoryPort + ?Sized,
    {
        let encoded = serialize(state, &self.defaults);
        if encoded == self.committed {
            return UrlWrite::Unchanged;
        }
        log::info!("Pushing listing location `?{encoded}`");
        history.push(&encoded);
        self.committed = encoded;
        UrlWrite::Pushed
    }

    /// Rewrites the current entry, e.g. after the page number was clamped.
    pub fn correct<H>(&mut self, history: &mut H, state: &QueryState) -> UrlWrite
    where
        H: HistoryPort + ?Sized,
    {
        let encoded = serialize(state, &self.defaults);
        if encoded == self.committed {
            return UrlWrite::Unchanged;
        }
        log::debug!("Replacing listing location with `?{encoded}`");
        history.replace(&encoded);
        self.committed = encoded;
        UrlWrite::Replaced
    }
}

/// In-memory session history with back/forward support.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        Self {
            entries: vec![initial.trim_start_matches('?').to_string()],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Moves one entry back; returns `false` at the oldest entry.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Moves one entry forward; returns `false` at the newest entry.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("")
    }
}

impl HistoryPort for MemoryHistory {
    fn current_query(&self) -> String {
        self.entries[self.cursor].clone()
    }

    fn push(&mut self, query_string: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(query_string.to_string());
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, query_string: &str) {
        self.entries[self.cursor] = query_string.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::SortBy;

    fn sync() -> UrlSync {
        UrlSync::new(QueryDefaults::new(12, SortBy::Latest))
    }

    #[test]
    fn load_canonicalizes_malformed_location() {
        let mut history = MemoryHistory::new("?page=abc&keyword=lamp&junk=1");
        let mut sync = sync();

        let state = sync.load(&mut history);

        assert_eq!(state.keyword(), "lamp");
        assert_eq!(history.current_query(), "keyword=lamp");
        assert_eq!(history.len(), 1);
        assert_eq!(sync.committed(), "keyword=lamp");
    }

    #[test]
    fn commit_pushes_once_and_skips_identical_state() {
        let mut history = MemoryHistory::default();
        let mut sync = sync();
        let state = sync.load(&mut history).with_keyword("desk");

        assert_eq!(sync.commit(&mut history, &state), UrlWrite::Pushed);
        assert_eq!(sync.commit(&mut history, &state), UrlWrite::Unchanged);
        assert_eq!(history.entries(), ["", "keyword=desk"]);
    }

    #[test]
    fn correct_replaces_current_entry() {
        let mut history = MemoryHistory::new("page=9");
        let mut sync = sync();
        let state = sync.load(&mut history).with_page(3);

        assert_eq!(sync.correct(&mut history, &state), UrlWrite::Replaced);
        assert_eq!(history.entries(), ["page=3"]);
    }

    #[test]
    fn push_after_back_discards_forward_entries() {
        let mut history = MemoryHistory::default();
        history.push("page=2");
        history.push("page=3");
        assert!(history.back());
        history.push("page=4");

        assert_eq!(history.entries(), ["", "page=2", "page=4"]);
        assert!(!history.forward());
    }
}
