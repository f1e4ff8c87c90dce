//! One page of a paginated collection query.

use serde::{Deserialize, Serialize};

use super::DocumentRef;
use crate::error::{ArchiveError, Result};

/// A page of results as returned by `GET /api/{collection}`.
///
/// Missing pagination fields fall back to the values of an empty first page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultPage {
    #[serde(alias = "documents")]
    pub docs: Vec<DocumentRef>,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u32>,
    pub page: u32,
    pub prev_page: Option<u32>,
    pub total_docs: u64,
    pub total_pages: u32,
}

impl Default for ResultPage {
    fn default() -> Self {
        Self {
            docs: Vec::new(),
            has_next_page: false,
            has_prev_page: false,
            next_page: Some(1),
            page: 1,
            prev_page: Some(1),
            total_docs: 0,
            total_pages: 1,
        }
    }
}

impl ResultPage {
    /// Build a page from a decoded response body.
    ///
    /// The body must be an object whose `docs` (or `documents`) field is an
    /// array; anything else is reported as [`ArchiveError::MalformedBody`] so
    /// callers can keep their previous page.
    pub fn from_value(body: serde_json::Value) -> Result<Self> {
        let has_docs_array = body
            .as_object()
            .and_then(|obj| obj.get("docs").or_else(|| obj.get("documents")))
            .is_some_and(|docs| docs.is_array());

        if !has_docs_array {
            let found = match &body {
                serde_json::Value::Object(obj) => match obj.get("docs").or(obj.get("documents")) {
                    Some(other) => format!("docs field is {}", json_kind(other)),
                    None => "no docs field".to_string(),
                },
                other => format!("body is {}", json_kind(other)),
            };
            return Err(ArchiveError::MalformedBody(found));
        }

        Ok(serde_json::from_value(body)?)
    }

    /// Whether the page respects the basic pagination invariants for the
    /// given page size.
    pub fn is_consistent(&self, limit: u32) -> bool {
        let page_in_range = self.total_pages == 0 || (1..=self.total_pages).contains(&self.page);
        page_in_range && self.docs.len() <= limit as usize
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api_body() -> serde_json::Value {
        json!({
            "docs": [{"id": "p1", "title": "Lamp"}, "p2"],
            "hasNextPage": true,
            "hasPrevPage": false,
            "nextPage": 2,
            "page": 1,
            "prevPage": null,
            "totalDocs": 12,
            "totalPages": 2
        })
    }

    #[test]
    fn test_from_value_full_body() {
        let page = ResultPage::from_value(api_body()).unwrap();
        assert_eq!(page.docs.len(), 2);
        assert!(page.has_next_page);
        assert_eq!(page.next_page, Some(2));
        assert_eq!(page.prev_page, None);
        assert_eq!(page.total_docs, 12);
        assert_eq!(page.total_pages, 2);
        assert!(page.docs[0].as_document().is_some());
        assert!(page.docs[1].as_document().is_none());
    }

    #[test]
    fn test_from_value_irregular_entries() {
        let page = ResultPage::from_value(json!({
            "docs": [{"id": 7, "categories": null}, {"title": "x"}, 42, null],
            "page": 1,
            "totalDocs": 4,
            "totalPages": 1
        }))
        .unwrap();

        assert_eq!(page.docs.len(), 4);
        assert_eq!(page.docs[0].id(), "7");
        assert_eq!(page.docs[1].as_document().map(|d| d.display_title()), Some("x"));
        assert!(matches!(page.docs[2], DocumentRef::Other(_)));
        assert!(matches!(page.docs[3], DocumentRef::Other(_)));
    }

    #[test]
    fn test_from_value_documents_alias() {
        let page = ResultPage::from_value(json!({
            "documents": [{"id": "p1"}],
            "page": 1,
            "totalDocs": 1,
            "totalPages": 1
        }))
        .unwrap();
        assert_eq!(page.docs.len(), 1);
    }

    #[test]
    fn test_from_value_missing_docs() {
        let err = ResultPage::from_value(json!({"page": 1})).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("no docs field"));
    }

    #[test]
    fn test_from_value_docs_not_array() {
        let err = ResultPage::from_value(json!({"docs": {"id": "p1"}})).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_from_value_not_an_object() {
        let err = ResultPage::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_from_value_bad_field_type_is_decode_error() {
        let err = ResultPage::from_value(json!({"docs": [], "page": "one"})).unwrap_err();
        assert!(matches!(err, ArchiveError::Decode(_)));
    }

    #[test]
    fn test_default_is_empty_first_page() {
        let page = ResultPage::default();
        assert!(page.docs.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_docs, 0);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_is_consistent() {
        let page = ResultPage::from_value(api_body()).unwrap();
        assert!(page.is_consistent(10));
        assert!(!page.is_consistent(1));

        let out_of_range = ResultPage {
            page: 3,
            ..page
        };
        assert!(!out_of_range.is_consistent(10));
    }
}
