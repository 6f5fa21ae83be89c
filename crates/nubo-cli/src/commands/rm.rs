//! Move a file or folder to the trash.

use clap::Args;
use tokio::io::AsyncBufReadExt;

use nubo_core::result::AppResult;

use super::Connection;
use crate::output;

/// Arguments for `rm`
#[derive(Debug, Args)]
pub struct RmArgs {
    /// Id of the file or folder
    pub id: String,

    /// The id names a folder rather than a file
    #[arg(long)]
    pub folder: bool,

    /// Skip the undo prompt and exit immediately
    #[arg(short = 'y', long)]
    pub no_wait: bool,
}

/// Execute `rm`
pub async fn execute(args: &RmArgs, conn: &Connection) -> AppResult<()> {
    let mut session = super::drive_session(conn).await?;
    let id = super::parse_id(&args.id)?;

    if args.folder {
        session.trash_folder(id).await?;
        output::print_success("Folder moved to Trash. Restore it with 'nubo trash restore'.");
        return Ok(());
    }

    session.trash_file(id).await?;

    let Some(pending) = session.pending_undo() else {
        output::print_success("File moved to Trash.");
        return Ok(());
    };
    let name = pending.name.clone();
    let window = pending.remaining();

    if args.no_wait {
        output::print_success(&format!("'{name}' moved to Trash."));
        return Ok(());
    }

    // The undo affordance: press Enter inside the window to bring the
    // file straight back. When the window closes the prompt just ends.
    println!("'{name}' moved to Trash. Press Enter within 5 s to undo...");
    let mut line = String::new();
    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
    match tokio::time::timeout(window, stdin.read_line(&mut line)).await {
        Ok(_) => {
            if session.undo_trash().await? {
                output::print_success(&format!("Restored '{name}'."));
            } else {
                output::print_warning("Too late; the file stays in the Trash.");
            }
        }
        Err(_) => println!("Kept in Trash."),
    }
    Ok(())
}
