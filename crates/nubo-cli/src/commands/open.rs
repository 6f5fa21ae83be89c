//! Print a short-lived link for viewing a file in a browser.

use clap::Args;

use nubo_core::result::AppResult;

use super::Connection;
use crate::output;

/// Arguments for `open`
#[derive(Debug, Args)]
pub struct OpenArgs {
    /// File id to link to
    pub id: String,
}

/// Execute `open`
pub async fn execute(args: &OpenArgs, conn: &Connection) -> AppResult<()> {
    let session = super::drive_session(conn).await?;

    let file = session.file(super::parse_id(&args.id)?).await?;
    let grant = session.open(&file).await?;

    println!("{}", grant.url);
    output::print_kv(
        "Expires",
        &grant.expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    Ok(())
}
