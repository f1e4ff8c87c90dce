//! Paginated, category-filterable archive of content collection documents.
//!
//! An archive either lists a hand-picked set of documents or pages through a
//! collection on the content API (`GET {server}/api/{collection}`), following
//! the category filters and sort order of an external filter provider.

pub mod archive;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod query;

pub use archive::{ArchiveProps, CollectionArchive, FetchOutcome, PopulateBy};
pub use client::{ArchiveClient, ArchiveSource};
pub use error::ArchiveError;
pub use filter::{FilterHandle, FilterProvider, FilterState};
pub use models::{Document, DocumentRef, ResultPage};
pub use query::ArchiveQuery;
