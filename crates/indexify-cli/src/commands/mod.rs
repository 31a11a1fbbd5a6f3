//! Command implementations.

pub mod catalog;
pub mod content;
pub mod graphs;
pub mod heartbeat;
pub mod ingest;
pub mod namespaces;
pub mod profile;
pub mod search;
pub mod sql;

pub use self::catalog::{execute_extractors, execute_indexes, execute_schemas};
pub use self::content::execute_content;
pub use self::graphs::execute_graphs;
pub use self::heartbeat::execute_heartbeat;
pub use self::ingest::{execute_add, execute_ingest_url, execute_upload};
pub use self::namespaces::execute_namespaces;
pub use self::profile::execute_profile;
pub use self::search::{execute_retrieve, execute_search};
pub use self::sql::execute_sql;

use std::collections::BTreeMap;

/// Collect `key=value` pairs; a repeated key keeps its last value
pub(crate) fn labels_map(pairs: Vec<(String, String)>) -> BTreeMap<String, String> {
    pairs.into_iter().collect()
}

/// Borrow owned names (graphs, ids, filters) for SDK calls
pub(crate) fn name_refs(names: &[String]) -> Vec<&str> {
    names.iter().map(String::as_str).collect()
}
