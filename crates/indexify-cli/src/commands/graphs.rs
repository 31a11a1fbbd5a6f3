//! Extraction graph command implementation.

use crate::cli::{GraphsAction, GraphsArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use indexify_sdk::{ExtractionGraph, ExtractionPolicy, IndexifyClient};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read an extraction graph definition from a YAML file.
pub fn load_graph(path: &Path) -> Result<ExtractionGraph> {
    let contents = fs::read_to_string(path)?;
    ExtractionGraph::from_yaml(&contents)
        .map_err(|e| CliError::InvalidInput(format!("{}: {}", path.display(), e)))
}

/// Build a policy from command-line parts; parameter values that parse as
/// JSON keep their type, anything else is sent as a string.
pub fn policy_from_args(
    extractor: String,
    name: String,
    source: String,
    params: Vec<(String, String)>,
    labels_eq: Option<String>,
) -> ExtractionPolicy {
    let mut policy = ExtractionPolicy::new(extractor, name).with_content_source(source);
    for (key, raw) in params {
        let value = serde_json::from_str::<Value>(&raw).unwrap_or(Value::String(raw));
        policy = policy.with_input_param(key, value);
    }
    if let Some(filter) = labels_eq {
        policy = policy.with_labels_eq(filter);
    }
    policy
}

/// Execute the graphs command.
pub fn execute_graphs(
    args: GraphsArgs,
    client: &mut IndexifyClient,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        GraphsAction::List => {
            let graphs = client.refresh_extraction_graphs()?;
            println!("{}", formatter.format_graphs(graphs)?);
        }
        GraphsAction::Create { file } => {
            let graph = load_graph(&file)?;
            let dangling = graph.dangling_sources();
            if !dangling.is_empty() {
                eprintln!(
                    "{}",
                    formatter.warning(&format!(
                        "Policies reading from a source outside this graph: {}",
                        dangling.join(", ")
                    ))
                );
            }

            client.create_extraction_graph(&graph)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Created extraction graph '{}' in namespace '{}'",
                    graph.name,
                    client.namespace()
                ))
            );
        }
        GraphsAction::Bind {
            extractor,
            name,
            source,
            params,
            labels_eq,
        } => {
            let policy = policy_from_args(extractor, name, source, params, labels_eq);
            client.bind_extractor(&policy)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Bound extractor '{}' as '{}' in namespace '{}'",
                    policy.extractor,
                    policy.name,
                    client.namespace()
                ))
            );
        }
    }

    Ok(())
}
