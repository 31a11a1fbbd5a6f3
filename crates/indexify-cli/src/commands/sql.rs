//! SQL command implementation.

use crate::cli::SqlArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use indexify_sdk::IndexifyClient;

/// Execute the sql command.
pub fn execute_sql(args: SqlArgs, client: &IndexifyClient, formatter: &Formatter) -> Result<()> {
    if args.query.trim().is_empty() {
        return Err(CliError::InvalidInput("Query must not be empty".to_string()));
    }

    let rows = client.sql_query(&args.query)?;
    println!("{}", formatter.format_rows(&rows)?);
    Ok(())
}
