//! Ingestion commands: add, upload and ingest-url.

use super::{labels_map, name_refs};
use crate::cli::{AddArgs, IngestUrlArgs, UploadArgs};
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use indexify_sdk::{Documents, IndexifyClient};
use serde_json::Value;
use std::fs;

/// Execute the add command.
pub fn execute_add(args: AddArgs, client: &IndexifyClient, formatter: &Formatter) -> Result<()> {
    let graphs = name_refs(&args.graphs);

    let count = match (&args.file, args.texts.is_empty()) {
        (Some(_), false) => {
            return Err(CliError::InvalidInput(
                "Pass texts or --file, not both".to_string(),
            ))
        }
        (None, true) => {
            return Err(CliError::InvalidInput("Nothing to add".to_string()));
        }
        (Some(path), true) => {
            let json: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            let count = json.as_array().map_or(1, Vec::len);
            client.add_documents_json(&graphs, &json, args.id.as_deref())?;
            count
        }
        (None, false) => {
            let documents = texts_to_documents(args.texts);
            if args.id.is_some() && documents.len() > 1 {
                eprintln!(
                    "{}",
                    formatter.warning("--id applies to a single text only; ignoring it")
                );
            }
            let count = documents.len();
            client.add_documents(&graphs, documents, args.id.as_deref())?;
            count
        }
    };

    println!("{}", formatter.success(&format!("Added {} document(s)", count)));
    Ok(())
}

/// A lone text stays a bare string so an id can be attached to it
fn texts_to_documents(mut texts: Vec<String>) -> Documents {
    if texts.len() == 1 {
        Documents::from(texts.remove(0))
    } else {
        Documents::from(texts)
    }
}

/// Execute the upload command.
pub fn execute_upload(args: UploadArgs, client: &IndexifyClient, formatter: &Formatter) -> Result<()> {
    let content_id = client.upload_file(
        &name_refs(&args.graphs),
        &args.path,
        args.id.as_deref(),
        &labels_map(args.labels),
    )?;

    if formatter.format() == OutputFormat::Table {
        println!(
            "{}",
            formatter.success(&format!("Uploaded {} as {}", args.path.display(), content_id))
        );
    } else {
        println!("{}", content_id);
    }
    Ok(())
}

/// Execute the ingest-url command.
pub fn execute_ingest_url(
    args: IngestUrlArgs,
    client: &IndexifyClient,
    formatter: &Formatter,
) -> Result<()> {
    let response = client.ingest_remote_file(
        &name_refs(&args.graphs),
        &args.source_url,
        &args.mime_type,
        &labels_map(args.labels),
        args.id.as_deref(),
    )?;
    println!("{}", formatter.format_value(&Value::Object(response))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{connected_client, quiet};
    use mockito::Matcher;
    use serde_json::json;

    fn add_args(texts: &[&str], id: Option<&str>) -> AddArgs {
        AddArgs {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            file: None,
            graphs: vec!["wiki".to_string()],
            id: id.map(str::to_string),
        }
    }

    #[test]
    fn test_single_text_keeps_id() {
        let (mut server, client) = connected_client();
        let mock = server
            .mock("POST", "/namespaces/default/add_texts")
            .match_body(Matcher::Json(json!({
                "documents": [{"text": "Indexify is amazing!", "labels": {}, "id": "doc-1"}],
                "extraction_graph_names": ["wiki"]
            })))
            .create();

        execute_add(add_args(&["Indexify is amazing!"], Some("doc-1")), &client, &quiet()).unwrap();
        mock.assert();
    }

    #[test]
    fn test_several_texts_drop_id() {
        let (mut server, client) = connected_client();
        let mock = server
            .mock("POST", "/namespaces/default/add_texts")
            .match_body(Matcher::Json(json!({
                "documents": [
                    {"text": "a", "labels": {}},
                    {"text": "b", "labels": {}}
                ],
                "extraction_graph_names": ["wiki"]
            })))
            .create();

        execute_add(add_args(&["a", "b"], Some("doc-1")), &client, &quiet()).unwrap();
        mock.assert();
    }

    #[test]
    fn test_add_from_json_file() {
        let (mut server, client) = connected_client();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        fs::write(&path, r#"["plain", {"text": "labelled", "labels": {"l1": "test"}}]"#).unwrap();

        let mock = server
            .mock("POST", "/namespaces/default/add_texts")
            .match_body(Matcher::PartialJson(json!({
                "documents": [
                    {"text": "plain", "labels": {}},
                    {"text": "labelled", "labels": {"l1": "test"}}
                ]
            })))
            .create();

        let mut args = add_args(&[], None);
        args.file = Some(path);
        execute_add(args, &client, &quiet()).unwrap();
        mock.assert();
    }

    #[test]
    fn test_bad_json_element_makes_no_request() {
        let (mut server, client) = connected_client();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        fs::write(&path, r#"["plain", 42]"#).unwrap();
        let mock = server
            .mock("POST", "/namespaces/default/add_texts")
            .expect(0)
            .create();

        let mut args = add_args(&[], None);
        args.file = Some(path);
        assert!(execute_add(args, &client, &quiet()).is_err());
        mock.assert();
    }

    #[test]
    fn test_nothing_to_add() {
        let (_server, client) = connected_client();
        let err = execute_add(add_args(&[], None), &client, &quiet()).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_texts_and_file_conflict() {
        let (_server, client) = connected_client();
        let mut args = add_args(&["a"], None);
        args.file = Some("docs.json".into());
        let err = execute_add(args, &client, &quiet()).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_ingest_url_sends_labels() {
        let (mut server, client) = connected_client();
        let mock = server
            .mock("POST", "/namespaces/default/ingest_remote_file")
            .match_body(Matcher::PartialJson(json!({
                "url": "https://example.com/skate.jpg",
                "mime_type": "image/jpeg",
                "labels": {"source": "web"},
                "id": "remote-1"
            })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"content_id": "remote-1"}"#)
            .create();

        let args = IngestUrlArgs {
            source_url: "https://example.com/skate.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            graphs: vec!["object_detection".to_string()],
            id: Some("remote-1".to_string()),
            labels: vec![("source".to_string(), "web".to_string())],
        };
        execute_ingest_url(args, &client, &quiet()).unwrap();
        mock.assert();
    }
}
