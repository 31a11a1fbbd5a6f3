//! Namespace command implementation.

use super::graphs::load_graph;
use super::labels_map;
use crate::cli::{NamespacesAction, NamespacesArgs};
use crate::error::Result;
use crate::output::Formatter;
use indexify_sdk::IndexifyClient;

/// Execute the namespaces command.
pub fn execute_namespaces(
    args: NamespacesArgs,
    client: &IndexifyClient,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        NamespacesAction::List => {
            let namespaces = client.namespaces()?;
            println!("{}", formatter.format_names("Namespace", &namespaces)?);
        }
        NamespacesAction::Create {
            name,
            graph_files,
            labels,
        } => {
            let graphs = graph_files
                .iter()
                .map(|path| load_graph(path))
                .collect::<Result<Vec<_>>>()?;
            let created = client.create_namespace(&name, &graphs, &labels_map(labels))?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Created namespace '{}' with {} extraction graph(s)",
                    created.namespace(),
                    graphs.len()
                ))
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{connected_client, quiet};
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_create_with_graph_file() {
        let (mut server, client) = connected_client();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.yaml");
        std::fs::write(
            &path,
            "name: wiki\nextraction_policies:\n  - extractor: tensorlake/wikipedia\n    name: wikipedia\n",
        )
        .unwrap();

        let create = server
            .mock("POST", "/namespaces")
            .match_body(Matcher::PartialJson(json!({
                "name": "research",
                "extraction_graphs": [{"name": "wiki"}],
                "labels": {"team": "search"}
            })))
            .create();
        server
            .mock("GET", "/namespaces/research")
            .with_header("content-type", "application/json")
            .with_body(r#"{"namespace": {"name": "research"}}"#)
            .create();

        let args = NamespacesArgs {
            action: NamespacesAction::Create {
                name: "research".to_string(),
                graph_files: vec![path],
                labels: vec![("team".to_string(), "search".to_string())],
            },
        };
        execute_namespaces(args, &client, &quiet()).unwrap();

        create.assert();
    }

    #[test]
    fn test_create_rejects_bad_graph_before_request() {
        let (mut server, client) = connected_client();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.yaml");
        std::fs::write(&path, "extraction_policies: 3\n").unwrap();
        let create = server.mock("POST", "/namespaces").expect(0).create();

        let args = NamespacesArgs {
            action: NamespacesAction::Create {
                name: "research".to_string(),
                graph_files: vec![path],
                labels: Vec::new(),
            },
        };

        assert!(execute_namespaces(args, &client, &quiet()).is_err());
        create.assert();
    }
}
