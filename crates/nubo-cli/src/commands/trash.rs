//! Trash management: list, restore, and delete forever.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use nubo_core::result::AppResult;
use nubo_core::types::format_bytes;

use super::Connection;
use crate::output::{self, OutputFormat};

/// Arguments for `trash`
#[derive(Debug, Args)]
pub struct TrashArgs {
    /// What to do with the trash
    #[command(subcommand)]
    pub command: TrashCommand,
}

/// Trash subcommands
#[derive(Debug, Subcommand)]
pub enum TrashCommand {
    /// List everything in the trash
    List,
    /// Bring an item back from the trash
    Restore {
        /// Id of the trashed file or folder
        id: String,
        /// The id names a folder rather than a file
        #[arg(long)]
        folder: bool,
    },
    /// Permanently delete a trashed item. This cannot be undone.
    Purge {
        /// Id of the trashed file or folder
        id: String,
        /// The id names a folder rather than a file
        #[arg(long)]
        folder: bool,
        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// One trashed item in the listing table.
#[derive(Debug, Serialize, Tabled)]
struct TrashRow {
    /// Item id.
    id: String,
    /// Item name.
    name: String,
    /// `folder` or the file size.
    size: String,
}

/// Execute `trash`
pub async fn execute(args: &TrashArgs, conn: &Connection, format: OutputFormat) -> AppResult<()> {
    let mut session = super::drive_session(conn).await?;

    match &args.command {
        TrashCommand::List => {
            let trash = session.trash_view().await?;
            let rows: Vec<TrashRow> = trash
                .folders
                .iter()
                .map(|folder| TrashRow {
                    id: folder.id.to_string(),
                    name: folder.name.clone(),
                    size: "folder".to_string(),
                })
                .chain(trash.files.iter().map(|file| TrashRow {
                    id: file.id.to_string(),
                    name: file.name.clone(),
                    size: format_bytes(file.size_bytes.max(0) as u64),
                }))
                .collect();
            output::print_list(&rows, format);
        }
        TrashCommand::Restore { id, folder } => {
            let id = super::parse_id(id)?;
            if *folder {
                let folder = session.restore_folder(id).await?;
                output::print_success(&format!("Restored folder '{}'", folder.name));
            } else {
                let file = session.restore_file(id).await?;
                output::print_success(&format!("Restored '{}'", file.name));
            }
        }
        TrashCommand::Purge { id, folder, yes } => {
            let id = super::parse_id(id)?;
            if *folder {
                if confirm(*yes, "Delete this folder forever?")? {
                    session.purge_folder(id).await?;
                    output::print_success("Folder deleted forever.");
                }
            } else {
                let file = session.file(id).await?;
                if confirm(*yes, &format!("Delete '{}' forever?", file.name))? {
                    session.purge_file(&file).await?;
                    output::print_success(&format!("'{}' deleted forever.", file.name));
                }
            }
        }
    }
    Ok(())
}

/// Ask before a destructive step unless `--yes` was passed.
fn confirm(skip: bool, prompt: &str) -> AppResult<bool> {
    if skip {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| nubo_core::error::AppError::internal(format!("Input error: {e}")))
}
