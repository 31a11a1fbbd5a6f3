//! Extractor, index and schema listings.

use crate::error::Result;
use crate::output::Formatter;
use indexify_sdk::IndexifyClient;

/// Execute the extractors command.
pub fn execute_extractors(client: &IndexifyClient, formatter: &Formatter) -> Result<()> {
    let extractors = client.extractors()?;
    println!("{}", formatter.format_extractors(&extractors)?);
    Ok(())
}

/// Execute the indexes command.
pub fn execute_indexes(client: &IndexifyClient, formatter: &Formatter) -> Result<()> {
    let indexes = client.indexes()?;
    println!("{}", formatter.format_indexes(&indexes)?);
    Ok(())
}

/// Execute the schemas command.
pub fn execute_schemas(client: &IndexifyClient, formatter: &Formatter) -> Result<()> {
    let schemas = client.list_schemas()?;
    println!("{}", formatter.format_value(&schemas)?);
    Ok(())
}
