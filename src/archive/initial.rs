//! Initial result state derived from static props.

use super::{ArchiveProps, PopulateBy};
use crate::models::{DocumentRef, RelationshipValue, ResultPage};

/// Result page an archive shows before (or instead of) any fetch.
///
/// `collection` starts from the server's pre-populated list, `selection` from
/// the hand-picked list, and anything else from nothing. Only the total
/// document count is taken from props; the pagination fields describe a
/// single first page.
pub fn initial_result(props: &ArchiveProps) -> ResultPage {
    let source: Option<&Vec<RelationshipValue>> = match props.populate_by {
        Some(PopulateBy::Collection) => props.populated_docs.as_ref(),
        Some(PopulateBy::Selection) => props.selected_docs.as_ref(),
        None => None,
    };

    let docs: Vec<DocumentRef> = source
        .map(|list| list.iter().map(|rel| rel.value.clone()).collect())
        .unwrap_or_default();

    ResultPage {
        docs,
        total_docs: props.populated_docs_total.unwrap_or(0),
        ..ResultPage::default()
    }
}
