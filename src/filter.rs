//! Category filter and sort state shared between an archive and its controls.
//!
//! The provider owns the state; archives only ever observe it through a
//! [`FilterHandle`] and receive plain [`FilterState`] snapshots.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Sort key used when none has been chosen.
pub const DEFAULT_SORT: &str = "-createdAt";

/// Snapshot of the filter controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Selected category ids, in the order they were selected. No duplicates.
    pub category_filters: Vec<String>,
    pub sort: Option<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category_filters: Vec::new(),
            sort: Some(DEFAULT_SORT.to_string()),
        }
    }
}

impl FilterState {
    pub fn new<I, S>(categories: I, sort: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = Self {
            category_filters: Vec::new(),
            sort: sort.map(str::to_string),
        };
        for category in categories {
            let category = category.into();
            if !state.category_filters.contains(&category) {
                state.category_filters.push(category);
            }
        }
        state
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }
}

/// Owner of the filter state.
pub struct FilterProvider {
    tx: watch::Sender<FilterState>,
}

impl Default for FilterProvider {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

impl FilterProvider {
    pub fn new(initial: FilterState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Handle for observing changes.
    pub fn subscribe(&self) -> FilterHandle {
        FilterHandle {
            rx: self.tx.subscribe(),
            _fixed: None,
        }
    }

    /// Current state.
    pub fn current(&self) -> FilterState {
        self.tx.borrow().clone()
    }

    /// Replace the selected categories.
    pub fn set_categories<I, S>(&self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next = FilterState::new(categories, self.tx.borrow().sort());
        self.update(next);
    }

    /// Add the category if absent, remove it otherwise.
    pub fn toggle_category(&self, category: &str) {
        let mut next = self.current();
        if let Some(pos) = next.category_filters.iter().position(|c| c == category) {
            next.category_filters.remove(pos);
        } else {
            next.category_filters.push(category.to_string());
        }
        self.update(next);
    }

    pub fn clear_categories(&self) {
        let mut next = self.current();
        next.category_filters.clear();
        self.update(next);
    }

    pub fn set_sort(&self, sort: Option<&str>) {
        let mut next = self.current();
        next.sort = sort.map(str::to_string);
        self.update(next);
    }

    /// Publish only when something actually changed, so observers are not
    /// woken for no-op updates.
    fn update(&self, next: FilterState) {
        self.tx.send_if_modified(|state| {
            if *state == next {
                return false;
            }
            debug!(
                categories = ?next.category_filters,
                sort = ?next.sort,
                "Filter state changed"
            );
            *state = next;
            true
        });
    }
}

/// Read-only view of a [`FilterProvider`].
#[derive(Clone)]
pub struct FilterHandle {
    rx: watch::Receiver<FilterState>,
    /// Sender of a fixed handle, which never changes and never closes.
    _fixed: Option<Arc<watch::Sender<FilterState>>>,
}

impl FilterHandle {
    /// Handle over a fixed state, for hosts without filter controls.
    pub fn fixed(state: FilterState) -> Self {
        let (tx, rx) = watch::channel(state);
        Self {
            rx,
            _fixed: Some(Arc::new(tx)),
        }
    }

    pub fn current(&self) -> FilterState {
        self.rx.borrow().clone()
    }

    /// Wait for the next change. Returns `false` once the provider is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Mark the current state as seen, so [`changed`](Self::changed) waits
    /// for the next update.
    pub fn mark_seen(&mut self) {
        self.rx.borrow_and_update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = FilterState::default();
        assert!(state.category_filters.is_empty());
        assert_eq!(state.sort(), Some("-createdAt"));
    }

    #[test]
    fn test_new_dedupes_categories() {
        let state = FilterState::new(["a", "b", "a"], None);
        assert_eq!(state.category_filters, vec!["a", "b"]);
    }

    #[test]
    fn test_toggle_category() {
        let provider = FilterProvider::default();
        provider.toggle_category("c1");
        provider.toggle_category("c2");
        assert_eq!(provider.current().category_filters, vec!["c1", "c2"]);
        provider.toggle_category("c1");
        assert_eq!(provider.current().category_filters, vec!["c2"]);
    }

    #[test]
    fn test_set_categories_keeps_sort() {
        let provider = FilterProvider::new(FilterState::new(Vec::<String>::new(), Some("title")));
        provider.set_categories(["x"]);
        let state = provider.current();
        assert_eq!(state.category_filters, vec!["x"]);
        assert_eq!(state.sort(), Some("title"));
    }

    #[tokio::test]
    async fn test_handle_sees_changes() {
        let provider = FilterProvider::default();
        let mut handle = provider.subscribe();

        provider.set_sort(Some("title"));
        assert!(handle.changed().await);
        handle.mark_seen();
        assert_eq!(handle.current().sort(), Some("title"));
        assert!(!handle.rx.has_changed().unwrap());

        drop(provider);
        assert!(!handle.changed().await);
    }

    #[test]
    fn test_noop_update_does_not_notify() {
        let provider = FilterProvider::default();
        let handle = provider.subscribe();
        provider.clear_categories();
        assert!(!handle.rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_fixed_handle_never_changes() {
        let mut handle = FilterHandle::fixed(FilterState::default());
        assert_eq!(handle.current(), FilterState::default());
        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(20), handle.changed()).await;
        assert!(waited.is_err());
    }
}
