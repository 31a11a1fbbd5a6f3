//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use indexify_domain::{ContentMetadata, ExtractionGraph, Extractor, Index, Row, TextChunk};
use serde::Serialize;
use serde_json::Value;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest text shown in a table cell before truncation
const MAX_CELL_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a list of names (namespaces, graph names).
    pub fn format_names(&self, header: &str, names: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(names)?),
            OutputFormat::Quiet => Ok(names.join("\n")),
            OutputFormat::Table => {
                let rows = names.iter().map(|n| vec![n.clone()]).collect();
                Ok(self.table(&[header], rows, "No entries found."))
            }
        }
    }

    /// Format extractors.
    pub fn format_extractors(&self, extractors: &[Extractor]) -> Result<String> {
        self.render(
            extractors,
            &["Name", "Description", "Input Types", "Embeddings"],
            |e| {
                vec![
                    e.name.clone(),
                    truncate(&e.description),
                    e.input_mime_types.iter().cloned().collect::<Vec<_>>().join(", "),
                    e.embedding_outputs().join(", "),
                ]
            },
            |e| e.name.clone(),
            "No extractors found.",
        )
    }

    /// Format indexes.
    pub fn format_indexes(&self, indexes: &[Index]) -> Result<String> {
        self.render(
            indexes,
            &["Name", "Schema"],
            |i| vec![i.name.clone(), truncate(&i.schema.to_string())],
            |i| i.name.clone(),
            "No indexes found.",
        )
    }

    /// Format extraction graphs, one row per policy.
    pub fn format_graphs(&self, graphs: &[ExtractionGraph]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(graphs)?),
            OutputFormat::Quiet => Ok(graphs.iter().map(|g| g.name.as_str()).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                let rows = graphs
                    .iter()
                    .flat_map(|g| {
                        g.extraction_policies.iter().map(move |p| {
                            vec![
                                g.name.clone(),
                                p.name.clone(),
                                p.extractor.clone(),
                                p.content_source.clone(),
                            ]
                        })
                    })
                    .collect();
                Ok(self.table(
                    &["Graph", "Policy", "Extractor", "Content Source"],
                    rows,
                    "No extraction graphs found.",
                ))
            }
        }
    }

    /// Format content metadata.
    pub fn format_content(&self, content: &[ContentMetadata]) -> Result<String> {
        self.render(
            content,
            &["ID", "Parent", "MIME Type", "Source", "Labels"],
            |c| {
                vec![
                    c.id.clone(),
                    c.parent_id.clone().unwrap_or_default(),
                    c.mime_type.clone().unwrap_or_default(),
                    c.source.clone().unwrap_or_default(),
                    c.labels
                        .iter()
                        .map(|(k, v)| format!("{}={}", k, display_value(v)))
                        .collect::<Vec<_>>()
                        .join(", "),
                ]
            },
            |c| c.id.clone(),
            "No content found.",
        )
    }

    /// Format search results in service order.
    pub fn format_chunks(&self, chunks: &[TextChunk]) -> Result<String> {
        self.render(
            chunks,
            &["Score", "Text"],
            |c| vec![format!("{:.3}", c.score), truncate(&c.text)],
            |c| c.text.clone(),
            "No results found.",
        )
    }

    /// Format retrieved passages.
    pub fn format_passages(&self, passages: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(passages)?),
            OutputFormat::Quiet => Ok(passages.join("\n")),
            OutputFormat::Table => {
                let rows = passages
                    .iter()
                    .enumerate()
                    .map(|(i, p)| vec![(i + 1).to_string(), truncate(p)])
                    .collect();
                Ok(self.table(&["#", "Passage"], rows, "No passages found."))
            }
        }
    }

    /// Format SQL rows; columns are the union of keys in first-seen order.
    pub fn format_rows(&self, rows: &[Row]) -> Result<String> {
        if self.format != OutputFormat::Table {
            return Ok(serde_json::to_string_pretty(rows)?);
        }

        let mut columns: Vec<&str> = Vec::new();
        for row in rows {
            for key in row.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key.as_str());
                }
            }
        }

        let records = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.get(*c).map(display_value).unwrap_or_default())
                    .collect()
            })
            .collect();
        Ok(self.table(&columns, records, "No rows returned."))
    }

    /// Format free-form JSON (content trees, schemas, structured data).
    pub fn format_value(&self, value: &Value) -> Result<String> {
        match self.format {
            OutputFormat::Quiet => Ok(value.to_string()),
            _ => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render<T: Serialize>(
        &self,
        items: &[T],
        headers: &[&str],
        row: impl Fn(&T) -> Vec<String>,
        id: impl Fn(&T) -> String,
        empty: &str,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
            OutputFormat::Quiet => Ok(items.iter().map(id).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => Ok(self.table(headers, items.iter().map(row).collect(), empty)),
        }
    }

    fn table(&self, headers: &[&str], rows: Vec<Vec<String>>, empty: &str) -> String {
        if rows.is_empty() {
            return self.colorize(empty, "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(headers.iter().copied());
        for row in rows {
            builder.push_record(row);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Strings without quotes, everything else as compact JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let cut: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chunk(text: &str, score: f64) -> TextChunk {
        TextChunk::new(text, score)
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_chunks(&[chunk("Indexify is amazing!", 0.9)]).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["text"], "Indexify is amazing!");
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter
            .format_names("Namespace", &["default".to_string(), "research".to_string()])
            .unwrap();
        assert_eq!(output, "default\nresearch");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_chunks(&[chunk("LLM agents", 0.25)]).unwrap();
        assert!(output.contains("Score"));
        assert!(output.contains("0.250"));
        assert!(output.contains("LLM agents"));
    }

    #[test]
    fn test_empty_results() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_content(&[]).unwrap();
        assert!(output.contains("No content found"));
    }

    #[test]
    fn test_rows_union_columns() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let rows: Vec<Row> = vec![
            json!({"object_name": "skateboard"}).as_object().unwrap().clone(),
            json!({"object_name": "person", "score": 0.9}).as_object().unwrap().clone(),
        ];
        let output = formatter.format_rows(&rows).unwrap();
        assert!(output.contains("object_name"));
        assert!(output.contains("score"));
        assert!(output.contains("skateboard"));
    }

    #[test]
    fn test_graph_rows_per_policy() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let graph = ExtractionGraph::builder("chunked")
            .policy(indexify_domain::ExtractionPolicy::new("tensorlake/chunk-extractor", "chunker"))
            .policy(
                indexify_domain::ExtractionPolicy::new("tensorlake/minilm-l6", "minilm")
                    .with_content_source("chunker"),
            )
            .build();
        let output = formatter.format_graphs(&[graph]).unwrap();
        assert!(output.contains("tensorlake/minilm-l6"));
        assert!(output.contains("ingestion"));
    }

    #[test]
    fn test_truncate_long_text() {
        let long = "x".repeat(200);
        let cut = truncate(&long);
        assert_eq!(cut.chars().count(), MAX_CELL_WIDTH);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate("a\nb"), "a b");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }
}
