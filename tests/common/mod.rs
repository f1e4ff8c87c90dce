//! Shared fixtures for archive integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use collection_archive::error::Result;
use collection_archive::{ArchiveError, ArchiveQuery, ArchiveSource};
use serde_json::{json, Value};
use tokio::sync::Semaphore;

type Responder = Box<dyn Fn(&str, &ArchiveQuery) -> Result<Value> + Send + Sync>;

/// In-memory [`ArchiveSource`] that records every request.
pub struct MockSource {
    calls: Mutex<Vec<(String, String)>>,
    responder: Responder,
    gate: Option<Arc<Semaphore>>,
}

impl MockSource {
    /// Answers every request with a page of `limit` documents.
    pub fn pages(total_docs: u64) -> Self {
        Self::with_responder(move |_, query| Ok(page_body(query.page, query.limit, total_docs)))
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&str, &ArchiveQuery) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
            gate: None,
        }
    }

    /// Hold every request until [`release`](Self::release) is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let `n` held requests complete.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Collection and query string of every request, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Yield until at least `n` requests have been made.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.call_count() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ArchiveSource for MockSource {
    async fn fetch_page(&self, collection: &str, query: &ArchiveQuery) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((collection.to_string(), query.to_query_string()));

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .expect("gate closed")
                .forget();
        }

        (self.responder)(collection, query)
    }
}

/// Response body for one page of a collection of `total_docs` products.
pub fn page_body(page: u32, limit: u32, total_docs: u64) -> Value {
    let limit = limit.max(1);
    let total_pages = total_docs.div_ceil(limit as u64).max(1) as u32;
    let first = (page.saturating_sub(1) * limit) as u64;
    let docs: Vec<Value> = (first..(first + limit as u64).min(total_docs))
        .map(|i| {
            json!({
                "id": format!("prod-{}", i + 1),
                "title": format!("Product {}", i + 1),
                "categories": [{"id": "cat1", "title": "Lighting"}]
            })
        })
        .collect();

    json!({
        "docs": docs,
        "hasNextPage": page < total_pages,
        "hasPrevPage": page > 1,
        "nextPage": if page < total_pages { Some(page + 1) } else { None },
        "page": page,
        "prevPage": if page > 1 { Some(page - 1) } else { None },
        "totalDocs": total_docs,
        "totalPages": total_pages
    })
}

/// Error a source returns when the server cannot be reached.
pub fn transport_error() -> ArchiveError {
    ArchiveError::Status {
        status: 502,
        body: "bad gateway".to_string(),
    }
}
