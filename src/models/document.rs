//! Content documents and references to them.
//!
//! Result pages are applied as the API sends them, so document parsing never
//! fails: fields the archive reads are taken when they have the expected
//! shape and treated as absent otherwise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A content record returned by the API (usually a product).
///
/// The fields the archive reads are typed, and everything else the API sends
/// is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// String or numeric id, as a string. Empty when the record has none.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub slug: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_categories",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub categories: Vec<CategoryRef>,
    #[serde(
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            slug: None,
            categories: Vec::new(),
            created_at: None,
            updated_at: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Title to display, falling back to the slug and then the id.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.slug.as_deref())
            .unwrap_or(&self.id)
    }

    /// Titles of the resolved categories, in order.
    pub fn category_titles(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter_map(|c| match c {
                CategoryRef::Resolved { title, .. } => title.as_deref(),
                CategoryRef::Id(_) => None,
            })
            .collect()
    }
}

/// A document as it appears inside a result list.
///
/// With `depth=1` the API resolves relationships into full records, but a
/// deleted or unpublished target still comes back as its bare id. Entries of
/// any other shape are kept as-is and never rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentRef {
    Resolved(Document),
    Reference(String),
    Other(Value),
}

impl DocumentRef {
    /// The full record, if this entry was resolved.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            DocumentRef::Resolved(doc) => Some(doc),
            DocumentRef::Reference(_) | DocumentRef::Other(_) => None,
        }
    }

    /// Id of the entry, empty for unrecognised shapes.
    pub fn id(&self) -> &str {
        match self {
            DocumentRef::Resolved(doc) => &doc.id,
            DocumentRef::Reference(id) => id,
            DocumentRef::Other(_) => "",
        }
    }
}

impl From<Document> for DocumentRef {
    fn from(doc: Document) -> Self {
        DocumentRef::Resolved(doc)
    }
}

/// A category attached to a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Resolved { id: String, title: Option<String> },
    Id(String),
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            CategoryRef::Resolved { id, .. } => id,
            CategoryRef::Id(id) => id,
        }
    }

    /// Read a category entry: an object with an id, or a bare id.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(obj) => Some(CategoryRef::Resolved {
                id: id_string(obj.get("id")?)?,
                title: obj.get("title").and_then(Value::as_str).map(str::to_string),
            }),
            other => id_string(other).map(CategoryRef::Id),
        }
    }
}

/// Polymorphic relationship entry, as stored in the pre-populated and
/// hand-picked document lists of an archive block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipValue {
    pub relation_to: String,
    pub value: DocumentRef,
}

impl RelationshipValue {
    pub fn new(relation_to: &str, value: impl Into<DocumentRef>) -> Self {
        Self {
            relation_to: relation_to.to_string(),
            value: value.into(),
        }
    }
}

/// Ids are strings on document databases and integers on SQL ones.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(id_string(&value).unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s.parse::<DateTime<Utc>>().ok()),
        _ => Ok(None),
    }
}

fn lenient_categories<'de, D>(deserializer: D) -> Result<Vec<CategoryRef>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.iter().filter_map(CategoryRef::from_value).collect()),
        _ => Ok(Vec::new()),
    }
}
