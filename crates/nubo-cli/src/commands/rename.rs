//! Rename a file or folder.

use clap::Args;

use nubo_core::result::AppResult;

use super::Connection;
use crate::output;

/// Arguments for `rename`
#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Id of the file or folder
    pub id: String,

    /// The new name
    pub name: String,

    /// The id names a folder rather than a file
    #[arg(long)]
    pub folder: bool,
}

/// Execute `rename`
pub async fn execute(args: &RenameArgs, conn: &Connection) -> AppResult<()> {
    let mut session = super::drive_session(conn).await?;
    let id = super::parse_id(&args.id)?;

    if args.folder {
        let folder = session.rename_folder(id, &args.name).await?;
        output::print_success(&format!("Renamed folder to '{}'", folder.name));
        return Ok(());
    }

    // The optimistic rename works on the listing, so view the folder the
    // file actually lives in first.
    let file = session.file(id).await?;
    session.jump_to(file.folder_id).await?;

    let file = session.rename_file(id, &args.name).await?;
    output::print_success(&format!("Renamed file to '{}'", file.name));
    Ok(())
}
