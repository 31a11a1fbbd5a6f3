//! Content records returned by the service

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One row of a SQL query result: the row's `data` object
pub type Row = Map<String, Value>;

/// A search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Matched text
    pub text: String,

    /// Metadata attached to the chunk
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Relevance score as reported by the service
    #[serde(default)]
    pub score: f64,
}

impl TextChunk {
    /// Create a chunk with no metadata
    pub fn new(text: impl Into<String>, score: f64) -> Self {
        Self {
            text: text.into(),
            metadata: Map::new(),
            score,
        }
    }
}

/// Metadata for one piece of content in a namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentMetadata {
    /// Content id
    pub id: String,

    /// Content this was extracted from, empty for ingested content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Owning namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Original file name, if uploaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Media type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Labels
    #[serde(default)]
    pub labels: BTreeMap<String, Value>,

    /// Where the raw bytes can be fetched from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,

    /// Producing policy, or `ingestion`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,

    /// Creation time, seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    /// Any field not modeled above, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentMetadata {
    /// Whether this content was added directly rather than extracted
    pub fn is_ingested(&self) -> bool {
        match self.parent_id.as_deref() {
            None | Some("") => true,
            Some(_) => false,
        }
    }
}

/// A queryable index in a namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Index name, usually `<policy>.<output>`
    pub name: String,

    /// Index schema as reported by the service
    #[serde(default)]
    pub schema: Value,
}
