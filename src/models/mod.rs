//! Data types exchanged with the content API.

mod document;
mod result_page;

pub use document::{CategoryRef, Document, DocumentRef, RelationshipValue};
pub use result_page::ResultPage;
