//! Extractor descriptors published by the service

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Vector output of an embedding extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingSchema {
    /// Distance metric, e.g. `cosine`
    pub distance: String,
    /// Vector dimension
    pub dim: u32,
}

/// Declared schema of one extractor output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputSchema {
    /// An embedding index
    Embedding(EmbeddingSchema),
    /// Structured attributes; kept opaque
    Attributes(Map<String, Value>),
}

impl OutputSchema {
    /// The embedding schema, if this output is an embedding
    pub fn as_embedding(&self) -> Option<&EmbeddingSchema> {
        match self {
            OutputSchema::Embedding(schema) => Some(schema),
            OutputSchema::Attributes(_) => None,
        }
    }
}

/// Read-only description of a server-side extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extractor {
    /// Extractor identifier
    pub name: String,

    /// Human readable description
    #[serde(default)]
    pub description: String,

    /// JSON schema of accepted input parameters
    #[serde(default)]
    pub input_params: Value,

    /// Output name to schema
    #[serde(default)]
    pub outputs: HashMap<String, OutputSchema>,

    /// Media types the extractor accepts
    #[serde(default)]
    pub input_mime_types: BTreeSet<String>,
}

impl Extractor {
    /// Whether the extractor accepts the given media type
    pub fn accepts(&self, mime_type: &str) -> bool {
        self.input_mime_types.contains(mime_type)
    }

    /// Names of outputs that produce embeddings
    pub fn embedding_outputs(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .outputs
            .iter()
            .filter(|(_, schema)| schema.as_embedding().is_some())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Extractor(name={}, description={})", self.name, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minilm() -> Extractor {
        serde_json::from_value(json!({
            "name": "tensorlake/minilm-l6",
            "description": "MiniLM-L6 sentence embeddings",
            "input_params": {"type": "object"},
            "outputs": {
                "embedding": {"distance": "cosine", "dim": 384},
                "attributes": {"type": "object"}
            },
            "input_mime_types": ["text/plain", "text/plain"]
        }))
        .unwrap()
    }

    #[test]
    fn test_output_schema_variants() {
        let extractor = minilm();
        let embedding = extractor.outputs["embedding"].as_embedding().unwrap();
        assert_eq!(embedding.dim, 384);
        assert_eq!(embedding.distance, "cosine");
        assert!(extractor.outputs["attributes"].as_embedding().is_none());
        assert_eq!(extractor.embedding_outputs(), vec!["embedding"]);
    }

    #[test]
    fn test_mime_types_are_a_set() {
        let extractor = minilm();
        assert_eq!(extractor.input_mime_types.len(), 1);
        assert!(extractor.accepts("text/plain"));
        assert!(!extractor.accepts("image/png"));
    }
}
