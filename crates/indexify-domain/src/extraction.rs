//! Extraction policies and the graphs that chain them together

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Content source meaning "content added directly to the namespace"
pub const INGESTION_SOURCE: &str = "ingestion";

fn default_content_source() -> String {
    INGESTION_SOURCE.to_string()
}

/// A named instance of a server-side extractor attached to a content source.
///
/// Unset optional fields are left out of the serialized form entirely.
/// Policy names must be unique within a graph; the service enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionPolicy {
    /// Remote extractor identifier, e.g. `tensorlake/minilm-l6`
    pub extractor: String,

    /// Instance name, unique within the graph
    pub name: String,

    /// Upstream policy name, or `ingestion` for content added directly
    #[serde(default = "default_content_source")]
    pub content_source: String,

    /// Extractor input parameters
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub input_params: Map<String, Value>,

    /// Label equality filter in `key:value` form
    #[serde(
        default,
        alias = "filters_eq",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels_eq: Option<String>,

    /// Server-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Older name for [`ExtractionPolicy`], used by callers that bind extractors
/// one at a time with `IndexifyClient::bind_extractor`.
pub type ExtractorBinding = ExtractionPolicy;

impl ExtractionPolicy {
    /// Create a policy reading from ingested content
    pub fn new(extractor: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            extractor: extractor.into(),
            name: name.into(),
            content_source: default_content_source(),
            input_params: Map::new(),
            labels_eq: None,
            id: None,
        }
    }

    /// Read from the output of another policy instead of ingestion
    pub fn with_content_source(mut self, source: impl Into<String>) -> Self {
        self.content_source = source.into();
        self
    }

    /// Set one extractor input parameter
    pub fn with_input_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.input_params.insert(key.into(), value.into());
        self
    }

    /// Only run on content whose labels match `key:value`
    pub fn with_labels_eq(mut self, filter: impl Into<String>) -> Self {
        self.labels_eq = Some(filter.into());
        self
    }

    /// Whether this policy consumes ingested content directly
    pub fn is_root(&self) -> bool {
        self.content_source == INGESTION_SOURCE
    }
}

impl fmt::Display for ExtractionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExtractionPolicy(name={} extractor={})", self.name, self.extractor)
    }
}

/// A named, ordered pipeline of extraction policies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionGraph {
    /// Server-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Graph name, unique within a namespace
    pub name: String,

    /// Policies in declaration order
    #[serde(default)]
    pub extraction_policies: Vec<ExtractionPolicy>,
}

impl ExtractionGraph {
    /// Start building a graph
    pub fn builder(name: impl Into<String>) -> ExtractionGraphBuilder {
        ExtractionGraphBuilder::new(name)
    }

    /// Parse a graph from a YAML description
    ///
    /// ```
    /// use indexify_domain::ExtractionGraph;
    ///
    /// let graph = ExtractionGraph::from_yaml(r#"
    /// name: summarizer
    /// extraction_policies:
    ///   - extractor: tensorlake/minilm-l6
    ///     name: minilm
    /// "#).unwrap();
    /// assert_eq!(graph.extraction_policies[0].content_source, "ingestion");
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Invalid extraction graph: {}", e))
    }

    /// Look up a policy by name
    pub fn policy(&self, name: &str) -> Option<&ExtractionPolicy> {
        self.extraction_policies.iter().find(|p| p.name == name)
    }

    /// Names of policies whose content source is neither ingestion nor
    /// another policy in this graph.
    ///
    /// The service is the authority on graph validity; this is only a hint.
    pub fn dangling_sources(&self) -> Vec<&str> {
        self.extraction_policies
            .iter()
            .filter(|p| !p.is_root() && self.policy(&p.content_source).is_none())
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// Builder for [`ExtractionGraph`]
#[derive(Debug, Clone)]
pub struct ExtractionGraphBuilder {
    name: String,
    extraction_policies: Vec<ExtractionPolicy>,
}

impl ExtractionGraphBuilder {
    /// Create an empty builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extraction_policies: Vec::new(),
        }
    }

    /// Append a policy
    pub fn policy(mut self, policy: ExtractionPolicy) -> Self {
        self.extraction_policies.push(policy);
        self
    }

    /// Finish the graph; the id is left for the service to assign
    pub fn build(self) -> ExtractionGraph {
        ExtractionGraph {
            id: None,
            name: self.name,
            extraction_policies: self.extraction_policies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_policy_serialization_omits_unset_fields() {
        let policy = ExtractionPolicy::new("tensorlake/minilm-l6", "minilm");
        let value = serde_json::to_value(&policy).unwrap();
        assert_eq!(
            value,
            json!({
                "extractor": "tensorlake/minilm-l6",
                "name": "minilm",
                "content_source": "ingestion"
            })
        );
    }

    #[test]
    fn test_policy_serialization_with_params() {
        let policy = ExtractionPolicy::new("tensorlake/chunk", "chunker")
            .with_input_param("chunk_size", 300)
            .with_input_param("text_splitter", "char")
            .with_labels_eq("source:test");
        let value = serde_json::to_value(&policy).unwrap();
        assert_eq!(value["input_params"]["chunk_size"], 300);
        assert_eq!(value["labels_eq"], "source:test");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_policy_accepts_legacy_filter_key() {
        let policy: ExtractionPolicy = serde_json::from_value(json!({
            "extractor": "x",
            "name": "n",
            "content_source": "ingestion",
            "input_params": {},
            "filters_eq": "a:b"
        }))
        .unwrap();
        assert_eq!(policy.labels_eq.as_deref(), Some("a:b"));
    }

    #[test]
    fn test_graph_ignores_namespace_field() {
        let graph: ExtractionGraph = serde_json::from_value(json!({
            "id": "g1",
            "name": "pipeline",
            "namespace": "default",
            "extraction_policies": [{"extractor": "x", "name": "a"}]
        }))
        .unwrap();
        assert_eq!(graph.id.as_deref(), Some("g1"));
        assert_eq!(graph.extraction_policies.len(), 1);
    }

    #[test]
    fn test_builder_preserves_order() {
        let graph = ExtractionGraph::builder("pipeline")
            .policy(ExtractionPolicy::new("tensorlake/chunk", "chunker"))
            .policy(ExtractionPolicy::new("tensorlake/minilm-l6", "minilm").with_content_source("chunker"))
            .build();

        let names: Vec<_> = graph.extraction_policies.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["chunker", "minilm"]);
        assert!(graph.id.is_none());
        assert!(graph.dangling_sources().is_empty());
    }

    #[test]
    fn test_dangling_sources() {
        let graph = ExtractionGraph::builder("broken")
            .policy(ExtractionPolicy::new("x", "a").with_content_source("missing"))
            .build();
        assert_eq!(graph.dangling_sources(), vec!["a"]);
    }

    #[test]
    fn test_from_yaml() {
        let graph = ExtractionGraph::from_yaml(
            r#"
name: wiki
extraction_policies:
  - extractor: tensorlake/wikipedia
    name: wikipedia
  - extractor: tensorlake/minilm-l6
    name: minilm
    content_source: wikipedia
    input_params:
      chunk_size: 300
"#,
        )
        .unwrap();
        assert_eq!(graph.name, "wiki");
        assert_eq!(graph.extraction_policies[1].content_source, "wikipedia");
        assert_eq!(graph.extraction_policies[1].input_params["chunk_size"], 300);
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(ExtractionGraph::from_yaml("extraction_policies: 3").is_err());
    }
}
