//! Keeps an archive's result state in sync with its inputs.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::initial::initial_result;
use super::state::ArchiveState;
use super::view::ArchiveRender;
use super::ArchiveProps;
use crate::client::ArchiveSource;
use crate::error::Result;
use crate::filter::FilterState;
use crate::models::ResultPage;
use crate::query::ArchiveQuery;

/// Called with every page that replaces the archive's results.
pub type ResultCallback = Arc<dyn Fn(&ResultPage) + Send + Sync>;

/// What a call to [`CollectionArchive::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The archive is not in `collection` mode; nothing is ever fetched.
    Disabled,
    /// The request would be identical to the last one requested.
    Unchanged,
    /// A request is already in flight. It will serve this query once it
    /// completes.
    Deferred,
    /// A new page replaced the results.
    Applied,
    /// The response had no `docs` array; previous results were kept.
    Malformed,
    /// The request failed; the error message was set.
    Failed,
}

/// Work item for the in-flight request.
#[derive(Debug, Clone)]
struct PendingRequest {
    generation: u64,
    collection: String,
    query: ArchiveQuery,
}

/// Everything that decides which request should be made.
struct Inputs {
    props: ArchiveProps,
    on_result_change: Option<ResultCallback>,
    /// Incremented for every refresh that wants a fetch.
    generation: u64,
    /// Most recently requested query; the only one allowed to update state.
    pending: Option<PendingRequest>,
    /// Collection and query string of `pending`, kept after it completes so
    /// identical refreshes are skipped.
    last_key: Option<(String, String)>,
    in_flight: bool,
}

/// Archive view state plus the logic that fetches pages for it.
///
/// Hosts call [`refresh`](Self::refresh) after changing any input (page,
/// filters, props, callback). At most one request is in flight at a time, and
/// a response is only applied if no newer query was requested while it was
/// outstanding. Locks are never held across an `.await`, and dropping a
/// `refresh` future mid-request releases the in-flight slot.
pub struct CollectionArchive {
    source: Arc<dyn ArchiveSource>,
    inputs: Mutex<Inputs>,
    state: Mutex<ArchiveState>,
    page: watch::Sender<u32>,
}

impl CollectionArchive {
    pub fn new(props: ArchiveProps, source: Arc<dyn ArchiveSource>) -> Self {
        let state = ArchiveState::new(initial_result(&props));
        let (page, _) = watch::channel(1);

        Self {
            source,
            inputs: Mutex::new(Inputs {
                props,
                on_result_change: None,
                generation: 0,
                pending: None,
                last_key: None,
                in_flight: false,
            }),
            state: Mutex::new(state),
            page,
        }
    }

    /// Set the result-change callback at construction.
    pub fn with_on_result_change(mut self, callback: ResultCallback) -> Self {
        self.inputs
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .on_result_change = Some(callback);
        self
    }

    /// Replace the result-change callback. The next refresh fetches again.
    pub fn set_on_result_change(&self, callback: Option<ResultCallback>) {
        let mut inputs = lock(&self.inputs);
        inputs.on_result_change = callback;
        inputs.last_key = None;
    }

    /// Replace the props. Results are not reseeded; the next refresh picks up
    /// a changed collection or page size.
    pub fn update_props(&self, props: ArchiveProps) {
        lock(&self.inputs).props = props;
    }

    /// Select a page (1-based). Zero is treated as 1.
    pub fn select_page(&self, page: u32) {
        let page = page.max(1);
        self.page.send_if_modified(|current| {
            if *current == page {
                return false;
            }
            *current = page;
            true
        });
    }

    pub fn page(&self) -> u32 {
        *self.page.borrow()
    }

    /// Observe page selections.
    pub fn subscribe_page(&self) -> watch::Receiver<u32> {
        self.page.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ArchiveState {
        lock(&self.state).clone()
    }

    /// View-model for the current state.
    pub fn render(&self) -> ArchiveRender {
        let inputs = lock(&self.inputs);
        let state = lock(&self.state);
        ArchiveRender::build(&inputs.props, &state)
    }

    /// Like [`refresh`](Self::refresh), but fetches even if the query is
    /// unchanged.
    pub async fn reload(&self, filters: &FilterState) -> FetchOutcome {
        lock(&self.inputs).last_key = None;
        self.refresh(filters).await
    }

    /// Recompute the query from the current inputs and fetch it if it differs
    /// from the last one requested.
    pub async fn refresh(&self, filters: &FilterState) -> FetchOutcome {
        {
            let mut inputs = lock(&self.inputs);
            if !inputs.props.is_collection() {
                return FetchOutcome::Disabled;
            }

            let query = ArchiveQuery::new(inputs.props.limit, self.page())
                .with_sort(filters.sort())
                .with_categories(filters.category_filters.iter().cloned());
            let collection = inputs.props.relation_to.clone();
            let key = (collection.clone(), query.to_query_string());

            if inputs.last_key.as_ref() == Some(&key) {
                return FetchOutcome::Unchanged;
            }

            inputs.generation += 1;
            inputs.pending = Some(PendingRequest {
                generation: inputs.generation,
                collection,
                query,
            });
            inputs.last_key = Some(key);

            if inputs.in_flight {
                debug!(
                    generation = inputs.generation,
                    "Archive request in flight, deferring"
                );
                return FetchOutcome::Deferred;
            }
            inputs.in_flight = true;
        }

        let guard = InFlight::new(self);
        let outcome = self.run_pending().await;
        guard.disarm();
        outcome
    }

    /// Serve pending requests until the latest one has been applied.
    /// Must only be called by the holder of the in-flight flag.
    async fn run_pending(&self) -> FetchOutcome {
        loop {
            let pending = lock(&self.inputs).pending.clone();
            let Some(request) = pending else {
                lock(&self.inputs).in_flight = false;
                return FetchOutcome::Unchanged;
            };

            lock(&self.state).is_loading = true;

            let result = self
                .source
                .fetch_page(&request.collection, &request.query)
                .await
                .and_then(ResultPage::from_value);

            let mut inputs = lock(&self.inputs);
            let is_current = inputs
                .pending
                .as_ref()
                .is_some_and(|p| p.generation == request.generation);
            if !is_current {
                debug!(
                    generation = request.generation,
                    latest = inputs.generation,
                    "Discarding stale archive response"
                );
                continue;
            }

            let (outcome, applied) = self.apply(&request, result);
            inputs.in_flight = false;
            let callback = inputs.on_result_change.clone();
            drop(inputs);

            if let (Some(callback), Some(page)) = (callback, applied) {
                callback(&page);
            }
            return outcome;
        }
    }

    /// Write a completed request into the state. Returns the applied page on
    /// success.
    fn apply(
        &self,
        request: &PendingRequest,
        result: Result<ResultPage>,
    ) -> (FetchOutcome, Option<ResultPage>) {
        let mut state = lock(&self.state);
        state.is_loading = false;
        state.has_loaded = true;

        match result {
            Ok(page) => {
                if !page.is_consistent(request.query.limit) {
                    debug!(
                        collection = %request.collection,
                        page = page.page,
                        total_pages = page.total_pages,
                        docs = page.docs.len(),
                        limit = request.query.limit,
                        "Archive page does not match its pagination fields"
                    );
                }
                info!(
                    collection = %request.collection,
                    page = page.page,
                    docs = page.docs.len(),
                    total_docs = page.total_docs,
                    "Archive page loaded"
                );
                state.results = page.clone();
                state.error = None;
                (FetchOutcome::Applied, Some(page))
            }
            Err(e) if e.is_malformed() => {
                warn!(
                    collection = %request.collection,
                    query = %request.query,
                    error = %e,
                    "Ignoring malformed archive response"
                );
                (FetchOutcome::Malformed, None)
            }
            Err(e) => {
                warn!(
                    collection = %request.collection,
                    query = %request.query,
                    error = %e,
                    "Archive request failed"
                );
                state.error = Some(load_error_message(&request.collection));
                (FetchOutcome::Failed, None)
            }
        }
    }
}

/// Holds the in-flight slot for one `refresh` call.
///
/// If the call is dropped before it finishes, the slot is released, loading
/// stops and the last key is forgotten so the next refresh fetches again.
struct InFlight<'a> {
    archive: &'a CollectionArchive,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(archive: &'a CollectionArchive) -> Self {
        Self {
            archive,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut inputs = lock(&self.archive.inputs);
        debug!(
            generation = inputs.generation,
            "Archive request cancelled, releasing in-flight slot"
        );
        inputs.in_flight = false;
        inputs.pending = None;
        inputs.last_key = None;
        lock(&self.archive.state).is_loading = false;
    }
}

/// Lock a mutex, recovering the data if a holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Inline message shown when a collection cannot be loaded.
pub fn load_error_message(collection: &str) -> String {
    format!("Unable to load \"{} archive\" data at this time.", collection)
}
