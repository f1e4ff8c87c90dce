//! Collection archive: a paginated, filterable listing of documents.
//!
//! [`CollectionArchive`] owns the result state and keeps it in sync with its
//! inputs. [`initial_result`] seeds that state from static props and
//! [`ArchiveRender`] is what a host hands to its card, range and pager
//! components.

mod driver;
mod initial;
mod orchestrator;
mod state;
mod view;

pub use driver::drive;
pub use initial::initial_result;
pub use orchestrator::{load_error_message, CollectionArchive, FetchOutcome, ResultCallback};
pub use state::ArchiveState;
pub use view::{ArchiveRender, CardProps, PageRangeProps, PaginationProps};

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_COLLECTION, DEFAULT_LIMIT};
use crate::models::RelationshipValue;

/// Where an archive takes its documents from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopulateBy {
    /// Live paginated query against the collection.
    Collection,
    /// Fixed, hand-picked list.
    Selection,
}

impl PopulateBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PopulateBy::Collection => "collection",
            PopulateBy::Selection => "selection",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "collection" => Some(PopulateBy::Collection),
            "selection" => Some(PopulateBy::Selection),
            _ => None,
        }
    }
}

/// Inbound configuration of an archive block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveProps {
    #[serde(default)]
    pub populate_by: Option<PopulateBy>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_relation_to")]
    pub relation_to: String,
    /// Documents the server pre-fetched for `collection` mode.
    #[serde(default)]
    pub populated_docs: Option<Vec<RelationshipValue>>,
    #[serde(default)]
    pub populated_docs_total: Option<u64>,
    /// Hand-picked documents for `selection` mode.
    #[serde(default)]
    pub selected_docs: Option<Vec<RelationshipValue>>,
    #[serde(default)]
    pub show_page_range: Option<bool>,
    /// Sort configured on the block. Requests use the filter state's sort.
    #[serde(default)]
    pub sort: Option<String>,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_relation_to() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl Default for ArchiveProps {
    fn default() -> Self {
        Self {
            populate_by: None,
            limit: default_limit(),
            relation_to: default_relation_to(),
            populated_docs: None,
            populated_docs_total: None,
            selected_docs: None,
            show_page_range: None,
            sort: None,
        }
    }
}

impl ArchiveProps {
    /// Props for a live collection archive.
    pub fn collection(relation_to: &str) -> Self {
        Self {
            populate_by: Some(PopulateBy::Collection),
            relation_to: relation_to.to_string(),
            ..Default::default()
        }
    }

    /// Props for a hand-picked archive.
    pub fn selection(selected_docs: Vec<RelationshipValue>) -> Self {
        Self {
            populate_by: Some(PopulateBy::Selection),
            selected_docs: Some(selected_docs),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn is_collection(&self) -> bool {
        self.populate_by == Some(PopulateBy::Collection)
    }

    pub fn is_selection(&self) -> bool {
        self.populate_by == Some(PopulateBy::Selection)
    }
}
