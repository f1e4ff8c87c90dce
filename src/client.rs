//! HTTP transport for collection pages.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::Settings;
use crate::error::{ArchiveError, Result};
use crate::query::ArchiveQuery;

const USER_AGENT: &str = concat!("collection-archive/", env!("CARGO_PKG_VERSION"));

/// Resolve the user agent from config: the crate default, or a custom string.
pub fn resolve_user_agent(config: Option<&str>) -> String {
    match config {
        Some(custom) if !custom.trim().is_empty() => custom.to_string(),
        _ => USER_AGENT.to_string(),
    }
}

/// Source of raw collection pages.
///
/// Returns the decoded JSON body untouched; the shape check belongs to the
/// caller so that a malformed body can be told apart from a transport error.
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    async fn fetch_page(&self, collection: &str, query: &ArchiveQuery)
        -> Result<serde_json::Value>;
}

/// reqwest-backed [`ArchiveSource`] talking to `{server_url}/api/{collection}`.
#[derive(Clone)]
pub struct ArchiveClient {
    client: Client,
    server_url: Url,
}

impl ArchiveClient {
    /// Create a client for the given server with default timeout and user agent.
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_options(server_url, Duration::from_secs(30), None)
    }

    /// Create a client from application settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::with_options(
            &settings.server_url,
            Duration::from_secs(settings.request_timeout),
            settings.user_agent.as_deref(),
        )
    }

    pub fn with_options(
        server_url: &str,
        timeout: Duration,
        user_agent_config: Option<&str>,
    ) -> Result<Self> {
        let user_agent = resolve_user_agent(user_agent_config);
        let client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            server_url: Url::parse(server_url)?,
        })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    /// Full request URL for a collection page.
    pub fn endpoint(&self, collection: &str, query: &ArchiveQuery) -> String {
        format!(
            "{}/api/{}?{}",
            self.server_url.as_str().trim_end_matches('/'),
            collection,
            query.to_query_string()
        )
    }
}

#[async_trait]
impl ArchiveSource for ArchiveClient {
    async fn fetch_page(
        &self,
        collection: &str,
        query: &ArchiveQuery,
    ) -> Result<serde_json::Value> {
        let url = self.endpoint(collection, query);
        debug!(%url, "Fetching archive page");

        let start = Instant::now();
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        debug!(
            %url,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Archive page response"
        );

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), "Archive request failed");
            return Err(ArchiveError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
