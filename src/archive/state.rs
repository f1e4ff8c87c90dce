//! Mutable state behind a [`super::CollectionArchive`].

use crate::models::ResultPage;

/// Snapshot of what an archive currently displays.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveState {
    /// Last successfully applied page (or the initial one).
    pub results: ResultPage,
    /// Whether a request is in flight.
    pub is_loading: bool,
    /// User-facing error from the last failed request.
    pub error: Option<String>,
    /// Set once the first request has completed, successfully or not.
    pub has_loaded: bool,
}

impl ArchiveState {
    pub fn new(results: ResultPage) -> Self {
        Self {
            results,
            is_loading: false,
            error: None,
            has_loaded: false,
        }
    }
}
