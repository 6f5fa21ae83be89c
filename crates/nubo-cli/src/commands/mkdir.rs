//! Create a folder.

use clap::Args;

use nubo_core::result::AppResult;

use super::Connection;
use crate::output;

/// Arguments for `mkdir`
#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Name of the new folder
    pub name: String,

    /// Parent folder id (the root when omitted)
    #[arg(short, long)]
    pub parent: Option<String>,
}

/// Execute `mkdir`
pub async fn execute(args: &MkdirArgs, conn: &Connection) -> AppResult<()> {
    let mut session = super::drive_session(conn).await?;

    if let Some(parent) = &args.parent {
        session.enter(super::parse_id(parent)?).await?;
    }

    let folder = session.create_folder(&args.name).await?;
    output::print_success(&format!("Created folder '{}' ({})", folder.name, folder.id));
    Ok(())
}
