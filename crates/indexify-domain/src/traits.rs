//! Retriever capability traits
//!
//! RAG orchestration frameworks plug retrievers in through a single
//! "fetch passages for a query" method. These traits describe the two shapes
//! the SDK adapters implement.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One query or an ordered list of queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Queries {
    /// A single query
    One(String),
    /// Several queries, searched in order
    Many(Vec<String>),
}

impl Queries {
    /// Non-empty queries in issue order
    pub fn non_empty(&self) -> Vec<&str> {
        match self {
            Queries::One(query) => vec![query.as_str()],
            Queries::Many(queries) => queries.iter().map(String::as_str).collect(),
        }
        .into_iter()
        .filter(|q| !q.is_empty())
        .collect()
    }
}

impl From<&str> for Queries {
    fn from(query: &str) -> Self {
        Queries::One(query.to_string())
    }
}

impl From<String> for Queries {
    fn from(query: String) -> Self {
        Queries::One(query)
    }
}

impl From<Vec<String>> for Queries {
    fn from(queries: Vec<String>) -> Self {
        Queries::Many(queries)
    }
}

impl From<Vec<&str>> for Queries {
    fn from(queries: Vec<&str>) -> Self {
        Queries::Many(queries.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Queries {
    fn from(queries: &[&str]) -> Self {
        Queries::Many(queries.iter().map(|q| q.to_string()).collect())
    }
}

/// A retrieved passage with its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Passage text
    pub page_content: String,
    /// Metadata carried over from the search hit
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Output of a passage retrieval module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Passage texts, concatenated across queries in issue order
    pub passages: Vec<String>,
}

/// Retriever returning documents relevant to a single query
///
/// Implemented by the SDK for chain-style orchestration frameworks
pub trait DocumentRetriever {
    /// Error type for retrieval
    type Error;

    /// Fetch the documents most relevant to `query`
    fn get_relevant_documents(&self, query: &str) -> Result<Vec<RetrievedDocument>, Self::Error>;
}

/// Retrieval module returning the top-k passages for one or more queries
///
/// Implemented by the SDK for program-style orchestration frameworks
pub trait PassageRetriever {
    /// Error type for retrieval
    type Error;

    /// Search `index` for every non-empty query and concatenate the passages.
    /// `k` falls back to the module's default when `None`.
    fn forward(&self, queries: Queries, index: &str, k: Option<usize>) -> Result<Prediction, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_filters_and_keeps_order() {
        let queries = Queries::from(vec!["a", "", "b"]);
        assert_eq!(queries.non_empty(), vec!["a", "b"]);
    }

    #[test]
    fn test_single_empty_query() {
        assert!(Queries::from("").non_empty().is_empty());
        assert_eq!(Queries::from("sports").non_empty(), vec!["sports"]);
    }
}
