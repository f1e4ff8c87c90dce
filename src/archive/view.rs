//! Props for the components an archive delegates rendering to.

use serde::Serialize;

use super::state::ArchiveState;
use super::ArchiveProps;
use crate::models::{Document, DocumentRef};

/// Props for one product card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardProps {
    /// Stable key: the document id, or its position when the id is empty.
    pub key: String,
    pub document: Document,
    pub relation_to: String,
    pub show_categories: bool,
}

/// Props for the "showing X-Y of Z" indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRangeProps {
    pub collection: String,
    pub current_page: u32,
    pub limit: u32,
    pub total_docs: u64,
}

/// Props for the pager. Page selection goes back through
/// [`super::CollectionArchive::select_page`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationProps {
    pub page: u32,
    pub total_pages: u32,
}

/// What the archive should display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ArchiveRender {
    Loading,
    Error {
        message: String,
    },
    Ready {
        page_range: Option<PageRangeProps>,
        cards: Vec<CardProps>,
        pagination: Option<PaginationProps>,
    },
}

impl ArchiveRender {
    pub fn build(props: &ArchiveProps, state: &ArchiveState) -> Self {
        if state.is_loading {
            return ArchiveRender::Loading;
        }
        if let Some(ref message) = state.error {
            return ArchiveRender::Error {
                message: message.clone(),
            };
        }

        let results = &state.results;

        let page_range = (props.show_page_range != Some(false) && !props.is_selection()).then(|| {
            PageRangeProps {
                collection: props.relation_to.clone(),
                current_page: results.page,
                limit: props.limit,
                total_docs: results.total_docs,
            }
        });

        let cards = results
            .docs
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                DocumentRef::Resolved(doc) => Some(CardProps {
                    key: if doc.id.is_empty() {
                        index.to_string()
                    } else {
                        doc.id.clone()
                    },
                    document: doc.clone(),
                    relation_to: props.relation_to.clone(),
                    show_categories: true,
                }),
                DocumentRef::Reference(_) | DocumentRef::Other(_) => None,
            })
            .collect();

        let pagination = (results.total_pages > 1 && !props.is_selection()).then(|| {
            PaginationProps {
                page: results.page,
                total_pages: results.total_pages,
            }
        });

        ArchiveRender::Ready {
            page_range,
            cards,
            pagination,
        }
    }

    /// Cards to display, empty unless ready.
    pub fn cards(&self) -> &[CardProps] {
        match self {
            ArchiveRender::Ready { cards, .. } => cards,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::PopulateBy;
    use crate::models::{RelationshipValue, ResultPage};

    fn ready_state(total_pages: u32) -> ArchiveState {
        ArchiveState::new(ResultPage {
            docs: vec![
                DocumentRef::Resolved(Document::new("p1")),
                DocumentRef::Reference("p2".to_string()),
                DocumentRef::Resolved(Document::new("")),
                DocumentRef::Other(serde_json::json!(42)),
            ],
            page: 2,
            total_docs: 23,
            total_pages,
            ..ResultPage::default()
        })
    }

    #[test]
    fn test_loading_wins_over_error() {
        let mut state = ready_state(3);
        state.is_loading = true;
        state.error = Some("boom".to_string());
        assert_eq!(
            ArchiveRender::build(&ArchiveProps::collection("products"), &state),
            ArchiveRender::Loading
        );
    }

    #[test]
    fn test_error_message_shown() {
        let mut state = ready_state(3);
        state.error = Some("boom".to_string());
        let render = ArchiveRender::build(&ArchiveProps::collection("products"), &state);
        assert_eq!(
            render,
            ArchiveRender::Error {
                message: "boom".to_string()
            }
        );
        assert!(render.cards().is_empty());
    }

    #[test]
    fn test_ready_collection() {
        let props = ArchiveProps::collection("products");
        let render = ArchiveRender::build(&props, &ready_state(3));

        let ArchiveRender::Ready {
            page_range,
            cards,
            pagination,
        } = render
        else {
            panic!("expected ready render");
        };

        assert_eq!(
            page_range,
            Some(PageRangeProps {
                collection: "products".to_string(),
                current_page: 2,
                limit: 10,
                total_docs: 23,
            })
        );
        let keys: Vec<&str> = cards.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["p1", "2"]);
        assert!(cards.iter().all(|c| c.show_categories));
        assert_eq!(
            pagination,
            Some(PaginationProps {
                page: 2,
                total_pages: 3
            })
        );
    }

    #[test]
    fn test_single_page_has_no_pagination() {
        let render = ArchiveRender::build(&ArchiveProps::collection("products"), &ready_state(1));
        assert!(matches!(
            render,
            ArchiveRender::Ready {
                pagination: None,
                ..
            }
        ));
    }

    #[test]
    fn test_page_range_hidden() {
        let props = ArchiveProps {
            show_page_range: Some(false),
            ..ArchiveProps::collection("products")
        };
        let render = ArchiveRender::build(&props, &ready_state(3));
        assert!(matches!(
            render,
            ArchiveRender::Ready {
                page_range: None,
                pagination: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_selection_hides_range_and_pager() {
        let props = ArchiveProps::selection(vec![RelationshipValue::new(
            "products",
            Document::new("p1"),
        )]);
        assert_eq!(props.populate_by, Some(PopulateBy::Selection));
        let render = ArchiveRender::build(&props, &ready_state(3));
        assert!(matches!(
            render,
            ArchiveRender::Ready {
                page_range: None,
                pagination: None,
                ..
            }
        ));
    }
}
