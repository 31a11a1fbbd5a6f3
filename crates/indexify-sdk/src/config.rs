//! Client configuration, including mutual TLS settings loaded from TOML.

use crate::error::SdkError;
use indexify_domain::namespace::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default Indexify service endpoint
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8900";

/// Mutual TLS settings
///
/// Recognized file keys: `use_tls`, `cert_path`, `key_path`, `ca_bundle_path`.
/// Without a CA bundle the platform trust roots are used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Whether TLS is enabled at all
    #[serde(default)]
    pub use_tls: bool,

    /// PEM client certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_path: Option<PathBuf>,

    /// PEM private key for the client certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,

    /// PEM bundle of trusted CAs, replacing the platform roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_bundle_path: Option<PathBuf>,
}

impl TlsConfig {
    /// Mutual TLS with the given client certificate and key
    pub fn mtls(
        cert_path: impl Into<PathBuf>,
        key_path: impl Into<PathBuf>,
        ca_bundle_path: Option<PathBuf>,
    ) -> Self {
        Self {
            use_tls: true,
            cert_path: Some(cert_path.into()),
            key_path: Some(key_path.into()),
            ca_bundle_path,
        }
    }

    /// Load TLS settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SdkError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SdkError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse TLS settings from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, SdkError> {
        let config: TlsConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that certificate and key are given together.
    ///
    /// Runs before any file is opened or any connection is attempted.
    pub fn validate(&self) -> Result<(), SdkError> {
        if !self.use_tls {
            return Ok(());
        }
        self.identity_paths().map(|_| ())
    }

    /// Certificate and key paths, both required for mutual TLS
    pub fn identity_paths(&self) -> Result<(&Path, &Path), SdkError> {
        let cert = self.cert_path.as_deref().filter(|p| !p.as_os_str().is_empty());
        let key = self.key_path.as_deref().filter(|p| !p.as_os_str().is_empty());
        match (cert, key) {
            (Some(cert), Some(key)) => Ok((cert, key)),
            _ => Err(SdkError::ConfigError(
                "Both cert and key must be provided for mTLS".to_string(),
            )),
        }
    }
}

/// Everything needed to build an [`IndexifyClient`](crate::IndexifyClient)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service base URL, without trailing slash
    pub service_url: String,

    /// Namespace the client is bound to
    pub namespace: String,

    /// Timeout applied to every request; `None` waits indefinitely
    pub timeout: Option<Duration>,

    /// Mutual TLS settings
    pub tls: Option<TlsConfig>,
}

impl ClientConfig {
    /// Configuration for a service URL with default namespace
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Bind to a different namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set a request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enable TLS settings
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// TLS settings that are actually enabled
    pub fn active_tls(&self) -> Option<&TlsConfig> {
        self.tls.as_ref().filter(|tls| tls.use_tls)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            timeout: None,
            tls: None,
        }
    }
}
