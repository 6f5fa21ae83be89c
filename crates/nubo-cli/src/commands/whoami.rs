//! Show the logged-in account.

use clap::Args;

use nubo_core::result::AppResult;

use super::Connection;
use crate::output::{self, OutputFormat};

/// Arguments for `whoami`
#[derive(Debug, Args)]
pub struct WhoamiArgs {}

/// Execute `whoami`
pub async fn execute(
    _args: &WhoamiArgs,
    conn: &Connection,
    format: OutputFormat,
) -> AppResult<()> {
    let session = super::drive_session(conn).await?;
    let principal = session.principal();

    match format {
        OutputFormat::Json => output::print_json(principal),
        OutputFormat::Table => {
            println!("Logged in as {}", principal.label());
            output::print_kv("Email", &principal.email);
            output::print_kv("User id", &principal.id.to_string());
        }
    }
    Ok(())
}
