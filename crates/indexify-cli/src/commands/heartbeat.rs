//! Heartbeat command implementation.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use indexify_sdk::IndexifyClient;

/// Execute the heartbeat command.
pub fn execute_heartbeat(client: &IndexifyClient, formatter: &Formatter) -> Result<()> {
    if !client.heartbeat()? {
        return Err(CliError::Connection(format!(
            "{} did not answer as an Indexify server",
            client.service_url()
        )));
    }

    println!(
        "{}",
        formatter.success(&format!("Indexify server is up at {}", client.service_url()))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{connected_client, quiet};

    #[test]
    fn test_heartbeat_ok() {
        let (mut server, client) = connected_client();
        server.mock("GET", "/").with_body("Indexify Server").create();

        assert!(execute_heartbeat(&client, &quiet()).is_ok());
    }

    #[test]
    fn test_heartbeat_wrong_greeting() {
        let (mut server, client) = connected_client();
        server.mock("GET", "/").with_body("nginx").create();

        let err = execute_heartbeat(&client, &quiet()).unwrap_err();
        assert!(matches!(err, CliError::Connection(_)));
    }
}
