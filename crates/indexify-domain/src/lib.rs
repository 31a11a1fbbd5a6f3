//! Indexify Domain Layer
//!
//! Plain value types exchanged with an Indexify service, plus the retriever
//! capability traits implemented by the SDK adapters. Nothing in this crate
//! performs I/O; it only describes data and how it maps to JSON.
//!
//! ## Key Concepts
//!
//! - **Namespace**: an isolated partition of documents, graphs and indexes
//! - **Document**: text plus labels, ingested into a namespace
//! - **Extraction Policy**: a named extractor instance bound to a content source
//! - **Extraction Graph**: a named pipeline (DAG) of extraction policies
//! - **Extractor**: a server-side capability such as an embedding model
//! - **Text Chunk**: one ranked search hit from an index

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod content;
pub mod document;
pub mod extraction;
pub mod extractor;
pub mod namespace;
pub mod traits;

// Re-exports for convenience
pub use content::{ContentMetadata, Index, Row, TextChunk};
pub use document::{Document, DocumentInput, Documents};
pub use extraction::{ExtractionGraph, ExtractionGraphBuilder, ExtractionPolicy, ExtractorBinding};
pub use extractor::{EmbeddingSchema, Extractor, OutputSchema};
pub use namespace::{Namespace, NamespaceInfo, DEFAULT_NAMESPACE};
pub use traits::{DocumentRetriever, PassageRetriever, Prediction, Queries, RetrievedDocument};
