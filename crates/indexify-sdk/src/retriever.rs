//! Retriever adapters for RAG orchestration frameworks.
//!
//! Both adapters delegate to [`retrieve`], which searches one index for each
//! non-empty query in order and concatenates the hits. There is no
//! cross-query de-duplication or re-ranking.

use crate::client::IndexifyClient;
use crate::error::SdkError;
use indexify_domain::traits::{DocumentRetriever, PassageRetriever, Prediction, Queries, RetrievedDocument};
use indexify_domain::TextChunk;
use tracing::debug;

/// Default number of passages per query for [`DspyRetriever`]
pub const DEFAULT_K: usize = 3;

/// Search `index` for every non-empty query, sequentially, and concatenate
/// the results in query order
pub fn retrieve(
    client: &IndexifyClient,
    index: &str,
    queries: &Queries,
    k: usize,
) -> Result<Vec<TextChunk>, SdkError> {
    let mut results = Vec::new();
    for query in queries.non_empty() {
        debug!(index, query, k, "retrieving passages");
        results.extend(client.search_index(index, query, k, &[])?);
    }
    Ok(results)
}

/// Document retriever for chain-style (LangChain) pipelines
#[derive(Debug, Clone)]
pub struct LangchainRetriever<'a> {
    client: &'a IndexifyClient,
    index: String,
    top_k: usize,
}

impl<'a> LangchainRetriever<'a> {
    /// Retriever over `index` returning `top_k` documents per query
    pub fn new(client: &'a IndexifyClient, index: impl Into<String>, top_k: usize) -> Self {
        Self {
            client,
            index: index.into(),
            top_k,
        }
    }

    /// Index being searched
    pub fn index(&self) -> &str {
        &self.index
    }
}

impl DocumentRetriever for LangchainRetriever<'_> {
    type Error = SdkError;

    fn get_relevant_documents(&self, query: &str) -> Result<Vec<RetrievedDocument>, SdkError> {
        let chunks = retrieve(self.client, &self.index, &Queries::from(query), self.top_k)?;
        Ok(chunks
            .into_iter()
            .map(|chunk| RetrievedDocument {
                page_content: chunk.text,
                metadata: chunk.metadata,
            })
            .collect())
    }
}

/// Passage retrieval module for program-style (DSPy) pipelines
#[derive(Debug, Clone)]
pub struct DspyRetriever<'a> {
    client: &'a IndexifyClient,
    k: usize,
}

impl<'a> DspyRetriever<'a> {
    /// Module returning [`DEFAULT_K`] passages per query
    pub fn new(client: &'a IndexifyClient) -> Self {
        Self::with_k(client, DEFAULT_K)
    }

    /// Module with a custom default `k`
    pub fn with_k(client: &'a IndexifyClient, k: usize) -> Self {
        Self { client, k }
    }

    /// Default passages per query
    pub fn k(&self) -> usize {
        self.k
    }
}

impl PassageRetriever for DspyRetriever<'_> {
    type Error = SdkError;

    fn forward(&self, queries: Queries, index: &str, k: Option<usize>) -> Result<Prediction, SdkError> {
        let k = k.unwrap_or(self.k);
        let chunks = retrieve(self.client, index, &queries, k)?;
        Ok(Prediction {
            passages: chunks.into_iter().map(|chunk| chunk.text).collect(),
        })
    }
}
