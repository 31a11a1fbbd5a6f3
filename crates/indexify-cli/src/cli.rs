//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Indexify CLI - Ingest, extract and search content on an Indexify service.
#[derive(Debug, Parser)]
#[command(name = "indexify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Service URL, overriding the profile
    #[arg(short, long, global = true, env = "INDEXIFY_URL")]
    pub url: Option<String>,

    /// Namespace, overriding the profile
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Log requests to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the service is up
    Heartbeat,

    /// List or create namespaces
    Namespaces(NamespacesArgs),

    /// List extractors registered with the service
    Extractors,

    /// List indexes of the namespace
    Indexes,

    /// Show SQL schemas of extracted structured data
    Schemas,

    /// List or create extraction graphs
    Graphs(GraphsArgs),

    /// Add text documents
    Add(AddArgs),

    /// Upload a local file
    Upload(UploadArgs),

    /// Ingest a remote file by URL
    IngestUrl(IngestUrlArgs),

    /// Inspect or delete content
    Content(ContentArgs),

    /// Search an index
    Search(SearchArgs),

    /// Retrieve passages for several queries
    Retrieve(RetrieveArgs),

    /// Run a SQL query over structured data
    Sql(SqlArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Arguments for namespace management.
#[derive(Debug, Parser)]
pub struct NamespacesArgs {
    #[command(subcommand)]
    pub action: NamespacesAction,
}

/// Namespace actions.
#[derive(Debug, Subcommand)]
pub enum NamespacesAction {
    /// List all namespaces
    List,

    /// Create a namespace
    Create {
        /// Namespace name
        name: String,

        /// Extraction graph YAML files to create with the namespace
        #[arg(short, long = "graph-file")]
        graph_files: Vec<PathBuf>,

        /// Namespace label (key=value)
        #[arg(short, long = "label", value_parser = parse_key_val)]
        labels: Vec<(String, String)>,
    },
}

/// Arguments for extraction graph management.
#[derive(Debug, Parser)]
pub struct GraphsArgs {
    #[command(subcommand)]
    pub action: GraphsAction,
}

/// Extraction graph actions.
#[derive(Debug, Subcommand)]
pub enum GraphsAction {
    /// List extraction graphs of the namespace
    List,

    /// Create an extraction graph from a YAML file
    Create {
        /// Graph definition (YAML)
        #[arg(long)]
        file: PathBuf,
    },

    /// Bind a single extractor as a new extraction policy
    Bind {
        /// Extractor name
        extractor: String,

        /// Policy name
        name: String,

        /// Policy or ingestion source to read content from
        #[arg(long, default_value = "ingestion")]
        source: String,

        /// Extractor input parameter (key=value; JSON values are parsed)
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Only extract content with this label (key:value)
        #[arg(long)]
        labels_eq: Option<String>,
    },
}

/// Arguments for the add command.
#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Texts to add, one document each
    pub texts: Vec<String>,

    /// JSON file holding a string, a document object or an array of those
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Extraction graphs to run
    #[arg(short, long = "graph")]
    pub graphs: Vec<String>,

    /// Document id, used when adding a single text
    #[arg(long)]
    pub id: Option<String>,
}

/// Arguments for the upload command.
#[derive(Debug, Parser)]
pub struct UploadArgs {
    /// File to upload
    pub path: PathBuf,

    /// Extraction graphs to run
    #[arg(short, long = "graph")]
    pub graphs: Vec<String>,

    /// Content id
    #[arg(long)]
    pub id: Option<String>,

    /// Content label (key=value)
    #[arg(short, long = "label", value_parser = parse_key_val)]
    pub labels: Vec<(String, String)>,
}

/// Arguments for the ingest-url command.
#[derive(Debug, Parser)]
pub struct IngestUrlArgs {
    /// URL the service should fetch
    #[arg(value_name = "URL")]
    pub source_url: String,

    /// MIME type of the remote file
    #[arg(short, long)]
    pub mime_type: String,

    /// Extraction graphs to run
    #[arg(short, long = "graph")]
    pub graphs: Vec<String>,

    /// Content id
    #[arg(long)]
    pub id: Option<String>,

    /// Content label (key=value)
    #[arg(short, long = "label", value_parser = parse_key_val)]
    pub labels: Vec<(String, String)>,
}

/// Arguments for content inspection.
#[derive(Debug, Parser)]
pub struct ContentArgs {
    #[command(subcommand)]
    pub action: ContentAction,
}

/// Content actions.
#[derive(Debug, Subcommand)]
pub enum ContentAction {
    /// List content
    List {
        /// Only content derived from this parent
        #[arg(long)]
        parent: Option<String>,

        /// Only content with this label (key:value)
        #[arg(long)]
        label: Option<String>,
    },

    /// Show content metadata
    Get {
        /// Content id
        id: String,
    },

    /// Show the tree of content derived from an id
    Tree {
        /// Content id
        id: String,
    },

    /// Show structured data extracted from content
    Data {
        /// Content id
        id: String,
    },

    /// Show the attributes an index holds for content
    Attributes {
        /// Content id
        id: String,

        /// Index to query
        #[arg(long)]
        index: String,
    },

    /// Download raw content bytes
    Download {
        /// Content id
        id: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete content
    Delete {
        /// Content ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Index name
    pub index: String,

    /// Search query text
    pub query: String,

    /// Maximum number of results
    #[arg(short, default_value = "3")]
    pub k: usize,

    /// Label filter (key:value)
    #[arg(long = "filter")]
    pub filters: Vec<String>,
}

/// Arguments for the retrieve command.
#[derive(Debug, Parser)]
pub struct RetrieveArgs {
    /// Index name
    pub index: String,

    /// Queries, searched in order
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Passages per query
    #[arg(short)]
    pub k: Option<usize>,
}

/// Arguments for the sql command.
#[derive(Debug, Parser)]
pub struct SqlArgs {
    /// SQL query
    pub query: String,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Service URL
        #[arg(short = 's', long)]
        service_url: String,
        /// Namespace used by the profile
        #[arg(long)]
        default_namespace: Option<String>,
        /// TLS settings file
        #[arg(long)]
        tls_config: Option<PathBuf>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

/// Parse a `key=value` pair
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid key=value: no `=` found in `{}`", s))?;
    if key.is_empty() {
        return Err(format!("invalid key=value: empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "indexify",
            "--url",
            "http://indexify:8900",
            "--namespace",
            "research",
            "-v",
            "heartbeat",
        ]);
        assert_eq!(cli.url.as_deref(), Some("http://indexify:8900"));
        assert_eq!(cli.namespace.as_deref(), Some("research"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Heartbeat));
    }

    #[test]
    fn test_add_command() {
        let cli = Cli::parse_from([
            "indexify",
            "add",
            "Indexify is amazing!",
            "Steph Curry",
            "--graph",
            "wiki",
            "--graph",
            "embeddings",
        ]);
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.texts.len(), 2);
                assert_eq!(args.graphs, vec!["wiki", "embeddings"]);
                assert!(args.id.is_none());
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_upload_labels() {
        let cli = Cli::parse_from([
            "indexify",
            "upload",
            "notes.txt",
            "-l",
            "source=notes",
            "-l",
            "lang=en",
        ]);
        match cli.command {
            Command::Upload(args) => {
                assert_eq!(args.labels[0], ("source".to_string(), "notes".to_string()));
                assert_eq!(args.labels.len(), 2);
            }
            _ => panic!("Expected Upload command"),
        }
    }

    #[test]
    fn test_search_defaults() {
        let cli = Cli::parse_from(["indexify", "search", "minilm.embedding", "LLM"]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.k, 3);
                assert!(args.filters.is_empty());
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_retrieve_requires_query() {
        assert!(Cli::try_parse_from(["indexify", "retrieve", "minilm.embedding"]).is_err());
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("url=http://a=b").unwrap(),
            ("url".to_string(), "http://a=b".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=value").is_err());
    }
}
