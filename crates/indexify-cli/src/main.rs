//! Indexify CLI - Command-line interface for an Indexify content-indexing service.

use clap::Parser;
use indexify_cli::commands;
use indexify_cli::{Cli, Command, Config, Formatter};
use indexify_sdk::IndexifyClient;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` applies unless `-v` asks for request logging
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,indexify_sdk=debug,indexify_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run() -> indexify_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load or create config
    let mut config = Config::load().unwrap_or_else(|_| {
        let cfg = Config::default();
        cfg.save().ok();
        cfg
    });

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Profile(args) => {
            commands::execute_profile(args, &mut config, &formatter)?;
        }
        cmd => {
            // Commands that talk to the service
            let client_config = config
                .get_active_profile()?
                .client_config(cli.url.as_deref(), cli.namespace.as_deref())?;
            debug!(
                profile = %config.active_profile,
                url = %client_config.service_url,
                namespace = %client_config.namespace,
                "connecting"
            );
            let mut client = IndexifyClient::new(client_config)?;

            match cmd {
                Command::Heartbeat => commands::execute_heartbeat(&client, &formatter)?,
                Command::Namespaces(args) => commands::execute_namespaces(args, &client, &formatter)?,
                Command::Extractors => commands::execute_extractors(&client, &formatter)?,
                Command::Indexes => commands::execute_indexes(&client, &formatter)?,
                Command::Schemas => commands::execute_schemas(&client, &formatter)?,
                Command::Graphs(args) => commands::execute_graphs(args, &mut client, &formatter)?,
                Command::Add(args) => commands::execute_add(args, &client, &formatter)?,
                Command::Upload(args) => commands::execute_upload(args, &client, &formatter)?,
                Command::IngestUrl(args) => commands::execute_ingest_url(args, &client, &formatter)?,
                Command::Content(args) => commands::execute_content(args, &client, &formatter)?,
                Command::Search(args) => commands::execute_search(args, &client, &formatter)?,
                Command::Retrieve(args) => commands::execute_retrieve(args, &client, &formatter)?,
                Command::Sql(args) => commands::execute_sql(args, &client, &formatter)?,
                Command::Profile(_) => unreachable!(),
            }

            client.close();
        }
    }

    Ok(())
}
