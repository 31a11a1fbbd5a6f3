//! Indexify Rust SDK
//!
//! Blocking client for an Indexify content-indexing service: namespaces,
//! extraction graphs, document ingestion, search, content access and SQL
//! queries, plus retriever adapters for RAG pipelines.
//!
//! # Example
//!
//! ```no_run
//! use indexify_sdk::{Document, DocumentInput, ExtractionGraph, ExtractionPolicy, IndexifyClient};
//!
//! let mut client = IndexifyClient::connect("http://localhost:8900").expect("Failed to connect");
//! assert!(client.heartbeat().unwrap());
//!
//! let graph = ExtractionGraph::builder("embeddings")
//!     .policy(ExtractionPolicy::new("tensorlake/minilm-l6", "minilm"))
//!     .build();
//! client.create_extraction_graph(&graph).expect("Failed to create graph");
//!
//! client
//!     .add_documents(
//!         &["embeddings"],
//!         vec![
//!             DocumentInput::from(Document::new("Indexify is a retrieval service for LLM agents!")),
//!             DocumentInput::from("Steph Curry is the best basketball player in the world."),
//!         ],
//!         None,
//!     )
//!     .expect("Failed to add documents");
//!
//! let hits = client.search_index("minilm.embedding", "LLM", 1, &[]).unwrap();
//! ```

#![warn(missing_docs)]

mod client;
mod error;

pub mod config;
pub mod http;
pub mod retriever;

pub use client::{IndexifyClient, HEARTBEAT_RESPONSE};
pub use config::{ClientConfig, TlsConfig, DEFAULT_SERVICE_URL};
pub use error::SdkError;
pub use retriever::{retrieve, DspyRetriever, LangchainRetriever};

pub use indexify_domain::{
    ContentMetadata, Document, DocumentInput, DocumentRetriever, Documents, ExtractionGraph,
    ExtractionPolicy, Extractor, ExtractorBinding, Index, NamespaceInfo, PassageRetriever,
    Prediction, Queries, RetrievedDocument, Row, TextChunk,
};
