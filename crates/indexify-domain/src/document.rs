//! Documents and the shapes accepted when adding them to a namespace

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A text document to ingest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document body
    pub text: String,

    /// Free-form key/value labels, usable later as `labels_eq` filters
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Caller-chosen content id; the service assigns one when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Document {
    /// Create a document with no labels and no explicit id
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            labels: BTreeMap::new(),
            id: None,
        }
    }

    /// Attach a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Set an explicit content id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// One element of a document batch: either a bare string or a full document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentInput {
    /// Bare text, normalized to a document with empty labels
    Text(String),
    /// A fully specified document, passed through untouched
    Document(Document),
}

impl DocumentInput {
    /// Normalize into a [`Document`]
    pub fn into_document(self) -> Document {
        match self {
            DocumentInput::Text(text) => Document::new(text),
            DocumentInput::Document(doc) => doc,
        }
    }

    /// Parse a single JSON batch element (a string or a document object)
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(text) => Ok(DocumentInput::Text(text.clone())),
            Value::Object(_) => serde_json::from_value(value.clone())
                .map(DocumentInput::Document)
                .map_err(|e| format!("Invalid document: {}", e)),
            other => Err(format!(
                "List items must be either documents or strings, found {}",
                json_kind(other)
            )),
        }
    }
}

impl From<Document> for DocumentInput {
    fn from(doc: Document) -> Self {
        DocumentInput::Document(doc)
    }
}

impl From<String> for DocumentInput {
    fn from(text: String) -> Self {
        DocumentInput::Text(text)
    }
}

impl From<&str> for DocumentInput {
    fn from(text: &str) -> Self {
        DocumentInput::Text(text.to_string())
    }
}

/// Everything the add-documents operation accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Documents {
    /// A single document
    Single(Document),
    /// A single bare string; the only shape that honors an explicit id
    Text(String),
    /// A mixed batch of strings and documents
    Batch(Vec<DocumentInput>),
}

impl Documents {
    /// Normalize into the documents sent over the wire, preserving order.
    ///
    /// `doc_id` is applied only when a single bare string was given, never
    /// to a batch.
    pub fn into_documents(self, doc_id: Option<&str>) -> Vec<Document> {
        match self {
            Documents::Single(doc) => vec![doc],
            Documents::Text(text) => {
                let mut doc = Document::new(text);
                doc.id = doc_id.map(str::to_string);
                vec![doc]
            }
            Documents::Batch(items) => items.into_iter().map(DocumentInput::into_document).collect(),
        }
    }

    /// Number of documents this input will produce
    pub fn len(&self) -> usize {
        match self {
            Documents::Single(_) | Documents::Text(_) => 1,
            Documents::Batch(items) => items.len(),
        }
    }

    /// True for an empty batch
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse loosely-typed input: a string, a document object, or an array of
    /// those. Any other shape is a type error.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(text) => Ok(Documents::Text(text.clone())),
            Value::Object(_) => serde_json::from_value(value.clone())
                .map(Documents::Single)
                .map_err(|e| format!("Invalid document: {}", e)),
            Value::Array(items) => items
                .iter()
                .map(DocumentInput::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Documents::Batch),
            other => Err(format!(
                "Invalid type for documents: expected a document, a string, or a list of these, found {}",
                json_kind(other)
            )),
        }
    }
}

impl From<Document> for Documents {
    fn from(doc: Document) -> Self {
        Documents::Single(doc)
    }
}

impl From<String> for Documents {
    fn from(text: String) -> Self {
        Documents::Text(text)
    }
}

impl From<&str> for Documents {
    fn from(text: &str) -> Self {
        Documents::Text(text.to_string())
    }
}

impl From<Vec<DocumentInput>> for Documents {
    fn from(items: Vec<DocumentInput>) -> Self {
        Documents::Batch(items)
    }
}

impl From<Vec<Document>> for Documents {
    fn from(docs: Vec<Document>) -> Self {
        Documents::Batch(docs.into_iter().map(DocumentInput::Document).collect())
    }
}

impl From<Vec<String>> for Documents {
    fn from(texts: Vec<String>) -> Self {
        Documents::Batch(texts.into_iter().map(DocumentInput::Text).collect())
    }
}

impl From<Vec<&str>> for Documents {
    fn from(texts: Vec<&str>) -> Self {
        Documents::Batch(texts.into_iter().map(DocumentInput::from).collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_single_string_honors_doc_id() {
        let docs = Documents::from("hello").into_documents(Some("doc-1"));
        assert_eq!(docs, vec![Document::new("hello").with_id("doc-1")]);
    }

    #[test]
    fn test_doc_id_not_spread_across_batch() {
        let docs = Documents::from(vec!["one", "two"]).into_documents(Some("shared"));
        assert!(docs.iter().all(|d| d.id.is_none()));
    }

    #[test]
    fn test_single_document_keeps_own_id() {
        let doc = Document::new("body").with_label("source", "test").with_id("mine");
        let docs = Documents::from(doc.clone()).into_documents(Some("other"));
        assert_eq!(docs, vec![doc]);
    }

    #[test]
    fn test_mixed_batch_normalization() {
        let batch = vec![
            DocumentInput::from("string"),
            DocumentInput::from(Document::new("document string").with_label("l1", "test")),
        ];
        let docs = Documents::from(batch).into_documents(None);
        assert_eq!(docs[0], Document::new("string"));
        assert_eq!(docs[1].labels.get("l1").map(String::as_str), Some("test"));
    }

    #[test]
    fn test_serialization_omits_missing_id() {
        let value = serde_json::to_value(Document::new("x")).unwrap();
        assert_eq!(value, json!({"text": "x", "labels": {}}));
    }

    #[test]
    fn test_from_json_shapes() {
        assert_eq!(Documents::from_json(&json!("t")).unwrap(), Documents::from("t"));

        let single = Documents::from_json(&json!({"text": "t", "labels": {"a": "b"}})).unwrap();
        assert_eq!(single, Documents::from(Document::new("t").with_label("a", "b")));

        let batch = Documents::from_json(&json!(["a", {"text": "b"}])).unwrap();
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_from_json_rejects_bad_element() {
        let err = Documents::from_json(&json!(["ok", 42])).unwrap_err();
        assert!(err.contains("either documents or strings"));

        assert!(Documents::from_json(&json!(true)).is_err());
        assert!(Documents::from_json(&json!([null])).is_err());
    }

    fn document_input() -> impl Strategy<Value = DocumentInput> {
        prop_oneof![
            ".*".prop_map(DocumentInput::Text),
            (".*", proptest::collection::btree_map("[a-z]{1,4}", "[a-z]{0,4}", 0..3)).prop_map(
                |(text, labels)| DocumentInput::Document(Document {
                    text,
                    labels,
                    id: None,
                })
            ),
        ]
    }

    proptest! {
        #[test]
        fn prop_batch_normalization_preserves_order(items in proptest::collection::vec(document_input(), 0..16)) {
            let docs = Documents::Batch(items.clone()).into_documents(Some("ignored"));
            prop_assert_eq!(docs.len(), items.len());

            for (input, doc) in items.iter().zip(&docs) {
                match input {
                    DocumentInput::Text(text) => {
                        prop_assert_eq!(&doc.text, text);
                        prop_assert!(doc.labels.is_empty());
                        prop_assert!(doc.id.is_none());
                    }
                    DocumentInput::Document(original) => prop_assert_eq!(doc, original),
                }
            }
        }
    }
}
