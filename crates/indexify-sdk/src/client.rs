//! Indexify namespace client implementation.

use crate::config::{ClientConfig, TlsConfig};
use crate::error::SdkError;
use crate::http::{HttpTransport, RequestOptions};
use indexify_domain::{
    ContentMetadata, Document, Documents, ExtractionGraph, ExtractionPolicy, Extractor, Index,
    Namespace, NamespaceInfo, Row, TextChunk,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Body the service returns from its root path
pub const HEARTBEAT_RESPONSE: &str = "Indexify Server";

/// Indexify client bound to one namespace
///
/// Construction fetches the namespace and caches its extraction graphs. The
/// cache is a hint: it is refreshed after [`create_extraction_graph`] and on
/// [`refresh_extraction_graphs`], never in the background, so changes made
/// by other clients are not reflected until the next refresh.
///
/// Dropping the client releases its connection; [`close`] does the same
/// explicitly, after which every call fails with [`SdkError::NotConnected`].
///
/// [`create_extraction_graph`]: IndexifyClient::create_extraction_graph
/// [`refresh_extraction_graphs`]: IndexifyClient::refresh_extraction_graphs
/// [`close`]: IndexifyClient::close
#[derive(Debug)]
pub struct IndexifyClient {
    config: ClientConfig,
    namespace: Namespace,
    transport: HttpTransport,
    extraction_graphs: Vec<ExtractionGraph>,
    labels: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct NamespaceResponse {
    namespace: NamespaceInfo,
}

#[derive(Deserialize)]
struct NamespaceListResponse {
    namespaces: Vec<NamespaceInfo>,
}

#[derive(Deserialize)]
struct ExtractorsResponse {
    extractors: Vec<Extractor>,
}

#[derive(Deserialize)]
struct IndexesResponse {
    indexes: Vec<Index>,
}

#[derive(Deserialize)]
struct ExtractionGraphsResponse {
    extraction_graphs: Vec<ExtractionGraph>,
}

#[derive(Deserialize)]
struct ContentListResponse {
    content_list: Vec<ContentMetadata>,
}

#[derive(Deserialize)]
struct ContentMetadataResponse {
    content_metadata: ContentMetadata,
}

#[derive(Deserialize)]
struct StructuredDataResponse {
    #[serde(default)]
    metadata: Vec<Value>,
}

#[derive(Deserialize)]
struct AttributesResponse {
    attributes: Value,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<TextChunk>,
}

#[derive(Deserialize)]
struct UploadResponse {
    content_id: String,
}

#[derive(Deserialize)]
struct SqlQueryResponse {
    rows: Vec<SqlRow>,
}

#[derive(Deserialize)]
struct SqlRow {
    data: Row,
}

#[derive(Serialize)]
struct CreateNamespaceRequest<'a> {
    name: &'a str,
    extraction_graphs: &'a [ExtractionGraph],
    labels: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct ExtractorBindingRequest<'a> {
    extractor: &'a str,
    name: &'a str,
    input_params: &'a Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters_eq: Option<&'a str>,
    content_source: &'a str,
}

#[derive(Serialize)]
struct AddDocumentsRequest<'a> {
    documents: Vec<Document>,
    extraction_graph_names: &'a [&'a str],
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    index: &'a str,
    query: &'a str,
    k: usize,
    filters: &'a [&'a str],
}

#[derive(Serialize)]
struct IngestRemoteFileRequest<'a> {
    url: &'a str,
    mime_type: &'a str,
    labels: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    extraction_graph_names: &'a [&'a str],
}

impl IndexifyClient {
    /// Connect to the service and load namespace state
    pub fn new(config: ClientConfig) -> Result<Self, SdkError> {
        let namespace = Namespace::new(config.namespace.clone()).map_err(SdkError::InvalidArgument)?;
        let transport = HttpTransport::new(&config.service_url, config.timeout, config.tls.as_ref())?;

        let mut client = Self {
            config,
            namespace,
            transport,
            extraction_graphs: Vec::new(),
            labels: BTreeMap::new(),
        };
        client.load_namespace()?;

        Ok(client)
    }

    /// Connect to `service_url` using the `default` namespace
    pub fn connect(service_url: &str) -> Result<Self, SdkError> {
        Self::new(ClientConfig::new(service_url))
    }

    /// Connect with mutual TLS, which also forces HTTP/2.
    ///
    /// Fails before any network call when either path is empty.
    pub fn with_mtls(
        cert_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
        ca_bundle_path: Option<&Path>,
        service_url: &str,
    ) -> Result<Self, SdkError> {
        let tls = TlsConfig::mtls(
            cert_path.as_ref(),
            key_path.as_ref(),
            ca_bundle_path.map(Path::to_path_buf),
        );
        tls.validate()?;
        Self::new(ClientConfig::new(service_url).with_tls(tls))
    }

    /// Connect using TLS settings read from a TOML file
    pub fn from_config_file(
        config_path: impl AsRef<Path>,
        service_url: &str,
        namespace: &str,
    ) -> Result<Self, SdkError> {
        let tls = TlsConfig::from_file(config_path)?;
        Self::new(
            ClientConfig::new(service_url)
                .with_namespace(namespace)
                .with_tls(tls),
        )
    }

    fn load_namespace(&mut self) -> Result<(), SdkError> {
        let info = self.namespace_info()?;
        self.extraction_graphs = info.extraction_graphs;
        self.labels = info.labels;
        Ok(())
    }

    fn ns_path(&self, suffix: &str) -> String {
        format!("namespaces/{}/{}", self.namespace, suffix)
    }

    /// Bound namespace name
    pub fn namespace(&self) -> &str {
        self.namespace.as_str()
    }

    /// Service base URL
    pub fn service_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Configuration the client was built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Namespace labels as of the last fetch
    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    /// Underlying transport, for endpoints without a typed wrapper
    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// Release the connection
    pub fn close(&mut self) {
        self.transport.close();
    }

    /// Whether the client has been closed
    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    /// Liveness probe: true iff the root path answers with exactly
    /// [`HEARTBEAT_RESPONSE`]
    pub fn heartbeat(&self) -> Result<bool, SdkError> {
        let body = self.transport.get("", RequestOptions::new())?.text()?;
        Ok(body == HEARTBEAT_RESPONSE)
    }

    /// Names of all namespaces on the service
    pub fn namespaces(&self) -> Result<Vec<String>, SdkError> {
        let response: NamespaceListResponse =
            self.transport.get("namespaces", RequestOptions::new())?.json()?;
        Ok(response.namespaces.into_iter().map(|ns| ns.name).collect())
    }

    /// Alias of [`namespaces`](Self::namespaces)
    pub fn list_namespaces(&self) -> Result<Vec<String>, SdkError> {
        self.namespaces()
    }

    /// Create a namespace and return a client bound to it.
    ///
    /// Not idempotent: repeating the call with the same name is up to the
    /// service.
    pub fn create_namespace(
        &self,
        name: &str,
        extraction_graphs: &[ExtractionGraph],
        labels: &BTreeMap<String, String>,
    ) -> Result<IndexifyClient, SdkError> {
        let namespace = Namespace::new(name).map_err(SdkError::InvalidArgument)?;
        let request = CreateNamespaceRequest {
            name: namespace.as_str(),
            extraction_graphs,
            labels,
        };
        self.transport
            .post("namespaces", RequestOptions::new().json(serde_json::to_value(&request)?))?;
        info!(namespace = %namespace, graphs = extraction_graphs.len(), "namespace created");

        IndexifyClient::new(self.config.clone().with_namespace(namespace.as_str()))
    }

    /// Fetch the bound namespace record
    pub fn namespace_info(&self) -> Result<NamespaceInfo, SdkError> {
        let path = format!("namespaces/{}", self.namespace);
        let response: NamespaceResponse = self.transport.get(&path, RequestOptions::new())?.json()?;
        Ok(response.namespace)
    }

    /// All extractors registered with the service
    pub fn extractors(&self) -> Result<Vec<Extractor>, SdkError> {
        let response: ExtractorsResponse =
            self.transport.get("extractors", RequestOptions::new())?.json()?;
        Ok(response.extractors)
    }

    /// Indexes of the bound namespace
    pub fn indexes(&self) -> Result<Vec<Index>, SdkError> {
        let response: IndexesResponse =
            self.transport.get(&self.ns_path("indexes"), RequestOptions::new())?.json()?;
        Ok(response.indexes)
    }

    /// Cached extraction graphs; see the type docs for staleness
    pub fn extraction_graphs(&self) -> &[ExtractionGraph] {
        &self.extraction_graphs
    }

    /// Re-fetch the extraction graphs and replace the cache
    pub fn refresh_extraction_graphs(&mut self) -> Result<&[ExtractionGraph], SdkError> {
        let response: ExtractionGraphsResponse = self
            .transport
            .get(&self.ns_path("extraction_graphs"), RequestOptions::new())?
            .json()?;
        self.extraction_graphs = response.extraction_graphs;
        Ok(&self.extraction_graphs)
    }

    /// Create an extraction graph, then refresh the graph cache.
    ///
    /// Graph validity (for example a content source naming a missing policy)
    /// is checked by the service and reported as [`SdkError::ApiError`].
    pub fn create_extraction_graph(&mut self, graph: &ExtractionGraph) -> Result<(), SdkError> {
        let dangling = graph.dangling_sources();
        if !dangling.is_empty() {
            debug!(graph = %graph.name, ?dangling, "graph has policies with unknown content sources");
        }

        self.transport.post(
            &self.ns_path("extraction_graphs"),
            RequestOptions::new().json(serde_json::to_value(graph)?),
        )?;
        info!(namespace = %self.namespace, graph = %graph.name, "extraction graph created");

        self.refresh_extraction_graphs()?;
        Ok(())
    }

    /// Bind a single extraction policy in the namespace, then refresh the
    /// graph cache.
    ///
    /// `labels_eq` goes over the wire as `filters_eq` and is left out when
    /// unset. Any `id` on the policy is ignored; the service assigns one.
    pub fn bind_extractor(&mut self, policy: &ExtractionPolicy) -> Result<(), SdkError> {
        let request = ExtractorBindingRequest {
            extractor: &policy.extractor,
            name: &policy.name,
            input_params: &policy.input_params,
            filters_eq: policy.labels_eq.as_deref(),
            content_source: &policy.content_source,
        };

        self.transport.post(
            &self.ns_path("extractor_bindings"),
            RequestOptions::new().json(serde_json::to_value(&request)?),
        )?;
        info!(namespace = %self.namespace, policy = %policy.name, extractor = %policy.extractor, "extractor bound");

        self.refresh_extraction_graphs()?;
        Ok(())
    }

    /// Same as [`bind_extractor`](Self::bind_extractor)
    pub fn add_extraction_policy(&mut self, policy: &ExtractionPolicy) -> Result<(), SdkError> {
        self.bind_extractor(policy)
    }

    /// Add documents to the namespace and run them through the named graphs.
    ///
    /// Bare strings become documents with empty labels. `doc_id` is used only
    /// when `documents` is a single bare string.
    pub fn add_documents(
        &self,
        extraction_graph_names: &[&str],
        documents: impl Into<Documents>,
        doc_id: Option<&str>,
    ) -> Result<(), SdkError> {
        let documents = documents.into().into_documents(doc_id);
        debug!(count = documents.len(), "adding documents");

        let request = AddDocumentsRequest {
            documents,
            extraction_graph_names,
        };
        self.transport.post(
            &self.ns_path("add_texts"),
            RequestOptions::new().json(serde_json::to_value(&request)?),
        )?;
        Ok(())
    }

    /// Add documents given as loosely-typed JSON: a string, a document
    /// object, or an array of those.
    ///
    /// Any other element is rejected before a request is made.
    pub fn add_documents_json(
        &self,
        extraction_graph_names: &[&str],
        documents: &Value,
        doc_id: Option<&str>,
    ) -> Result<(), SdkError> {
        let documents = Documents::from_json(documents).map_err(SdkError::InvalidArgument)?;
        self.add_documents(extraction_graph_names, documents, doc_id)
    }

    /// Delete content by id
    pub fn delete_documents(&self, ids: &[&str]) -> Result<(), SdkError> {
        self.transport.delete(
            &self.ns_path("content"),
            RequestOptions::new().json(json!({ "content_ids": ids })),
        )?;
        Ok(())
    }

    /// Replace the bytes of existing content with a local file
    pub fn update_content(&self, id: &str, path: impl AsRef<Path>) -> Result<(), SdkError> {
        self.transport.put(
            &self.ns_path(&format!("content/{}", id)),
            RequestOptions::new().file("file", path.as_ref()),
        )?;
        Ok(())
    }

    /// Raw bytes of a piece of content
    pub fn download_content(&self, id: &str) -> Result<Vec<u8>, SdkError> {
        let bytes = self
            .transport
            .get(&self.ns_path(&format!("content/{}/download", id)), RequestOptions::new())?
            .bytes()?;
        Ok(bytes.to_vec())
    }

    /// List content, optionally filtered by parent and `key:value` label.
    /// Filtering happens on the service.
    pub fn get_content(
        &self,
        parent_id: Option<&str>,
        labels_eq: Option<&str>,
    ) -> Result<Vec<ContentMetadata>, SdkError> {
        let mut options = RequestOptions::new();
        if let Some(parent_id) = parent_id {
            options = options.query("parent_id", parent_id);
        }
        if let Some(labels_eq) = labels_eq {
            options = options.query("labels_eq", labels_eq);
        }

        let response: ContentListResponse =
            self.transport.get(&self.ns_path("content"), options)?.json()?;
        Ok(response.content_list)
    }

    /// Metadata of one piece of content
    pub fn get_content_metadata(&self, id: &str) -> Result<ContentMetadata, SdkError> {
        let response: ContentMetadataResponse = self
            .transport
            .get(&self.ns_path(&format!("content/{}", id)), RequestOptions::new())?
            .json()?;
        Ok(response.content_metadata)
    }

    /// Structured data extracted from a piece of content
    pub fn get_structured_data(&self, content_id: &str) -> Result<Vec<Value>, SdkError> {
        let response: StructuredDataResponse = self
            .transport
            .get(&self.ns_path(&format!("content/{}/metadata", content_id)), RequestOptions::new())?
            .json()?;
        Ok(response.metadata)
    }

    /// Attributes an index holds for one piece of content
    pub fn query_metadata(&self, index_name: &str, content_id: &str) -> Result<Value, SdkError> {
        let response: AttributesResponse = self
            .transport
            .get(
                &self.ns_path("metadata"),
                RequestOptions::new()
                    .query("index", index_name)
                    .query("content_id", content_id),
            )?
            .json()?;
        Ok(response.attributes)
    }

    /// Tree of content derived from `content_id`
    pub fn get_content_tree(&self, content_id: &str) -> Result<Value, SdkError> {
        let tree = self
            .transport
            .get(&self.ns_path(&format!("content/{}/content-tree", content_id)), RequestOptions::new())?
            .json()?;
        Ok(tree)
    }

    /// SQL schemas of the namespace's structured data
    pub fn list_schemas(&self) -> Result<Value, SdkError> {
        let schemas = self
            .transport
            .get(&self.ns_path("schemas"), RequestOptions::new())?
            .json()?;
        Ok(schemas)
    }

    /// Search an index. Results are returned in service order, untouched.
    pub fn search_index(
        &self,
        name: &str,
        query: &str,
        top_k: usize,
        filters: &[&str],
    ) -> Result<Vec<TextChunk>, SdkError> {
        let request = SearchRequest {
            index: name,
            query,
            k: top_k,
            filters,
        };
        let response: SearchResponse = self
            .transport
            .post(
                &self.ns_path("search"),
                RequestOptions::new().json(serde_json::to_value(&request)?),
            )?
            .json()?;
        Ok(response.results)
    }

    /// Upload a local file as multipart form data; returns the content id
    pub fn upload_file(
        &self,
        extraction_graph_names: &[&str],
        path: impl AsRef<Path>,
        id: Option<&str>,
        labels: &BTreeMap<String, String>,
    ) -> Result<String, SdkError> {
        let path = path.as_ref();
        let mut options = RequestOptions::new().file("file", path);
        for name in extraction_graph_names {
            options = options.query("extraction_graph_names", *name);
        }
        if let Some(id) = id {
            options = options.query("id", id);
        }
        for (key, value) in labels {
            options = options.form_field(key.as_str(), value.as_str());
        }

        let response: UploadResponse = self
            .transport
            .post(&self.ns_path("upload_file"), options)?
            .json()?;
        debug!(path = %path.display(), content_id = %response.content_id, "file uploaded");
        Ok(response.content_id)
    }

    /// Run a SQL query over extracted structured data; returns each row's
    /// `data` object in order
    pub fn sql_query(&self, query: &str) -> Result<Vec<Row>, SdkError> {
        let response: SqlQueryResponse = self
            .transport
            .post(&self.ns_path("sql_query"), RequestOptions::new().json(json!({ "query": query })))?
            .json()?;
        Ok(response.rows.into_iter().map(|row| row.data).collect())
    }

    /// Register a URL for the service to fetch and extract
    pub fn ingest_remote_file(
        &self,
        extraction_graph_names: &[&str],
        url: &str,
        mime_type: &str,
        labels: &BTreeMap<String, String>,
        id: Option<&str>,
    ) -> Result<Map<String, Value>, SdkError> {
        let request = IngestRemoteFileRequest {
            url,
            mime_type,
            labels,
            id,
            extraction_graph_names,
        };
        let response = self
            .transport
            .post(
                &self.ns_path("ingest_remote_file"),
                RequestOptions::new().json(serde_json::to_value(&request)?),
            )?
            .json()?;
        Ok(response)
    }
}
