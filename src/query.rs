//! Query string construction for collection requests.
//!
//! The content API parses nested parameters in bracket notation
//! (`where[categories][in][0]=...`), so the query is serialized by hand in
//! that style. Values are written verbatim without percent-encoding.

use std::fmt;

/// Relationship depth requested for archive pages. One level is enough to
/// resolve products and their categories for cards.
pub const ARCHIVE_DEPTH: u32 = 1;

/// Parameters of a single page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveQuery {
    pub depth: u32,
    pub limit: u32,
    pub page: u32,
    pub sort: Option<String>,
    pub category_filters: Vec<String>,
}

impl ArchiveQuery {
    pub fn new(limit: u32, page: u32) -> Self {
        Self {
            depth: ARCHIVE_DEPTH,
            limit,
            page,
            sort: None,
            category_filters: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: Option<&str>) -> Self {
        self.sort = sort.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_filters = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a `where` clause will be emitted.
    pub fn has_filter(&self) -> bool {
        !self.category_filters.is_empty()
    }

    /// Serialize as `depth=..&limit=..&page=..[&sort=..][&where[categories][in][i]=..]`.
    pub fn to_query_string(&self) -> String {
        let mut pairs = vec![
            ("depth".to_string(), self.depth.to_string()),
            ("limit".to_string(), self.limit.to_string()),
            ("page".to_string(), self.page.to_string()),
        ];

        if let Some(ref sort) = self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }

        for (i, category) in self.category_filters.iter().enumerate() {
            pairs.push((format!("where[categories][in][{}]", i), category.clone()));
        }

        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for ArchiveQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
