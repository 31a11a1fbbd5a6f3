//! Content command implementation.

use super::name_refs;
use crate::cli::{ContentAction, ContentArgs};
use crate::error::Result;
use crate::output::Formatter;
use indexify_sdk::IndexifyClient;
use serde_json::Value;
use std::fs;
use std::io::Write;

/// Execute the content command.
pub fn execute_content(args: ContentArgs, client: &IndexifyClient, formatter: &Formatter) -> Result<()> {
    match args.action {
        ContentAction::List { parent, label } => {
            let content = client.get_content(parent.as_deref(), label.as_deref())?;
            println!("{}", formatter.format_content(&content)?);
        }
        ContentAction::Get { id } => {
            let metadata = client.get_content_metadata(&id)?;
            println!("{}", formatter.format_content(&[metadata])?);
        }
        ContentAction::Tree { id } => {
            let tree = client.get_content_tree(&id)?;
            println!("{}", formatter.format_value(&tree)?);
        }
        ContentAction::Data { id } => {
            let data = client.get_structured_data(&id)?;
            println!("{}", formatter.format_value(&Value::Array(data))?);
        }
        ContentAction::Attributes { id, index } => {
            let attributes = client.query_metadata(&index, &id)?;
            println!("{}", formatter.format_value(&attributes)?);
        }
        ContentAction::Download { id, output } => {
            let bytes = client.download_content(&id)?;
            match output {
                Some(path) => {
                    fs::write(&path, &bytes)?;
                    eprintln!(
                        "{}",
                        formatter.success(&format!("Wrote {} bytes to {}", bytes.len(), path.display()))
                    );
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&bytes)?;
                    stdout.flush()?;
                }
            }
        }
        ContentAction::Delete { ids } => {
            client.delete_documents(&name_refs(&ids))?;
            println!(
                "{}",
                formatter.success(&format!("Deleted {} content item(s)", ids.len()))
            );
        }
    }

    Ok(())
}
