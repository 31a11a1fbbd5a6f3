//! HTTP transport shared by every client operation.
//!
//! One [`HttpTransport`] owns one blocking `reqwest` client, and with it the
//! connection pool. All paths are resolved against the service base URL.

use crate::config::TlsConfig;
use crate::error::SdkError;
use reqwest::blocking::multipart::Form;
use reqwest::blocking::{Client, ClientBuilder, Response};
use reqwest::{Certificate, Identity};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

pub use reqwest::Method;

/// A file attached to a multipart request
#[derive(Debug, Clone)]
pub struct FileAttachment {
    /// Form field name
    pub field: String,
    /// Local file streamed as the field body
    pub path: PathBuf,
}

/// Per-request options
///
/// A request carries at most one kind of body: JSON, or form fields with an
/// optional file. Setting `json` together with `form` or `file` is rejected
/// with [`SdkError::InvalidArgument`] before anything is sent.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// JSON body
    pub json: Option<Value>,
    /// Form fields; sent multipart when a file is attached, urlencoded otherwise
    pub form: Vec<(String, String)>,
    /// File attachment
    pub file: Option<FileAttachment>,
    /// Query parameters; repeated keys are sent repeatedly
    pub query: Vec<(String, String)>,
    /// Extra headers
    pub headers: Vec<(String, String)>,
    /// Timeout overriding the client-wide one
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a JSON body
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Add a form field
    pub fn form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    /// Attach a file as multipart field `field`
    pub fn file(mut self, field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.file = Some(FileAttachment {
            field: field.into(),
            path: path.into(),
        });
        self
    }

    /// Add a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set a timeout for this request only
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Blocking HTTP transport bound to one service base URL
#[derive(Debug)]
pub struct HttpTransport {
    base_url: String,
    client: Option<Client>,
    http2_only: bool,
}

impl HttpTransport {
    /// Create a transport.
    ///
    /// With TLS enabled, certificate and key are validated before any file
    /// is read, the client identity is installed, and HTTP/2 is required.
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        tls: Option<&TlsConfig>,
    ) -> Result<Self, SdkError> {
        let tls = tls.filter(|t| t.use_tls);
        if let Some(tls) = tls {
            tls.validate()?;
        }

        let mut builder = Client::builder().timeout(timeout);
        if let Some(tls) = tls {
            builder = configure_mtls(builder, tls)?;
        }

        let client = builder.build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Some(client),
            http2_only: tls.is_some(),
        })
    }

    /// Service base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether requests are forced onto HTTP/2
    pub fn is_http2_only(&self) -> bool {
        self.http2_only
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }

    /// Release the connection pool. Later requests fail with
    /// [`SdkError::NotConnected`].
    pub fn close(&mut self) {
        if self.client.take().is_some() {
            debug!(base_url = %self.base_url, "transport closed");
        }
    }

    /// Full URL for a path relative to the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue a request; any non-2xx status becomes [`SdkError::ApiError`]
    pub fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, SdkError> {
        let client = self.client.as_ref().ok_or(SdkError::NotConnected)?;
        if options.json.is_some() && (!options.form.is_empty() || options.file.is_some()) {
            return Err(SdkError::InvalidArgument(
                "A request body cannot be both JSON and form data".to_string(),
            ));
        }
        let url = self.url(path);
        debug!(%method, %url, "sending request");

        let mut request = client.request(method.clone(), &url);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        for (key, value) in &options.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        if let Some(file) = options.file {
            let mut form = Form::new();
            for (key, value) in options.form {
                form = form.text(key, value);
            }
            form = form.file(file.field, &file.path)?;
            request = request.multipart(form);
        } else if !options.form.is_empty() {
            request = request.form(&options.form);
        } else if let Some(body) = &options.json {
            request = request.json(body);
        }

        let response = request.send()?;
        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "received response");

        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(%method, %url, status = status.as_u16(), %body, "request failed");
            return Err(SdkError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// GET `{base_url}/{path}`
    pub fn get(&self, path: &str, options: RequestOptions) -> Result<Response, SdkError> {
        self.request(Method::GET, path, options)
    }

    /// POST `{base_url}/{path}`
    pub fn post(&self, path: &str, options: RequestOptions) -> Result<Response, SdkError> {
        self.request(Method::POST, path, options)
    }

    /// PUT `{base_url}/{path}`
    pub fn put(&self, path: &str, options: RequestOptions) -> Result<Response, SdkError> {
        self.request(Method::PUT, path, options)
    }

    /// DELETE `{base_url}/{path}`
    pub fn delete(&self, path: &str, options: RequestOptions) -> Result<Response, SdkError> {
        self.request(Method::DELETE, path, options)
    }
}

fn configure_mtls(builder: ClientBuilder, tls: &TlsConfig) -> Result<ClientBuilder, SdkError> {
    let (cert_path, key_path) = tls.identity_paths()?;

    // rustls wants certificate and key in a single PEM buffer
    let mut pem = std::fs::read(cert_path)?;
    pem.push(b'\n');
    pem.extend(std::fs::read(key_path)?);
    let identity = Identity::from_pem(&pem)
        .map_err(|e| SdkError::ConfigError(format!("Invalid client certificate or key: {}", e)))?;

    let mut builder = builder
        .use_rustls_tls()
        .identity(identity)
        .http2_prior_knowledge();

    if let Some(ca_path) = &tls.ca_bundle_path {
        let bundle = std::fs::read(ca_path)?;
        let certificates = Certificate::from_pem_bundle(&bundle)
            .map_err(|e| SdkError::ConfigError(format!("Invalid CA bundle: {}", e)))?;
        builder = builder.tls_built_in_root_certs(false);
        for certificate in certificates {
            builder = builder.add_root_certificate(certificate);
        }
    }

    Ok(builder)
}
