//! Search and retrieve command implementation.

use super::name_refs;
use crate::cli::{RetrieveArgs, SearchArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use indexify_sdk::{DspyRetriever, IndexifyClient, PassageRetriever, Queries};

/// Execute the search command.
pub fn execute_search(args: SearchArgs, client: &IndexifyClient, formatter: &Formatter) -> Result<()> {
    if args.k == 0 {
        return Err(CliError::InvalidInput("k must be at least 1".to_string()));
    }

    let results = client.search_index(&args.index, &args.query, args.k, &name_refs(&args.filters))?;
    println!("{}", formatter.format_chunks(&results)?);
    Ok(())
}

/// Execute the retrieve command.
///
/// Empty queries are skipped; hits from each query are listed in query
/// order without de-duplication.
pub fn execute_retrieve(
    args: RetrieveArgs,
    client: &IndexifyClient,
    formatter: &Formatter,
) -> Result<()> {
    let prediction = DspyRetriever::new(client).forward(Queries::from(args.queries), &args.index, args.k)?;
    println!("{}", formatter.format_passages(&prediction.passages)?);
    Ok(())
}
