//! Namespace module

use crate::extraction::ExtractionGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the namespace every service starts with
pub const DEFAULT_NAMESPACE: &str = "default";

/// Validated namespace name
///
/// Names are used verbatim as a URL path segment, so they must be non-empty
/// and free of `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Create a new namespace
    ///
    /// # Errors
    /// Returns error if the name is empty or contains a slash
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err("Namespace cannot be empty".to_string());
        }
        if value.contains('/') {
            return Err(format!("Namespace '{}' cannot contain '/'", value));
        }

        Ok(Self(value))
    }

    /// Get namespace as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(DEFAULT_NAMESPACE.to_string())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Namespace record as stored by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceInfo {
    /// Namespace name
    pub name: String,

    /// Extraction graphs bound to the namespace
    #[serde(default)]
    pub extraction_graphs: Vec<ExtractionGraph>,

    /// Namespace labels
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}
