//! List a folder: subfolders first, then files.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use nubo_core::result::AppResult;
use nubo_core::types::format_bytes;
use nubo_entity::{File, Folder};

use super::Connection;
use crate::output::{self, OutputFormat};

/// Arguments for `ls`
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder id to list (the root when omitted)
    pub folder: Option<String>,

    /// Only show entries whose name contains this text
    #[arg(short = 'F', long)]
    pub filter: Option<String>,
}

/// One folder line in the listing table.
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder id.
    id: String,
    /// Folder name.
    name: String,
    /// Fixed kind marker so files and folders align in one mental table.
    kind: &'static str,
}

/// One file line in the listing table.
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File id.
    id: String,
    /// File name.
    name: String,
    /// Human-readable size.
    size: String,
    /// Creation timestamp.
    created: String,
}

impl From<&Folder> for FolderRow {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id.to_string(),
            name: folder.name.clone(),
            kind: "folder",
        }
    }
}

impl From<&File> for FileRow {
    fn from(file: &File) -> Self {
        Self {
            id: file.id.to_string(),
            name: file.name.clone(),
            size: format_bytes(file.size_bytes.max(0) as u64),
            created: file.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute `ls`
pub async fn execute(args: &LsArgs, conn: &Connection, format: OutputFormat) -> AppResult<()> {
    let mut session = super::drive_session(conn).await?;

    if let Some(folder) = &args.folder {
        session.enter(super::parse_id(folder)?).await?;
    }
    if let Some(filter) = &args.filter {
        session.set_filter(filter);
    }

    if format == OutputFormat::Table {
        let trail: Vec<&str> = session
            .breadcrumbs()
            .iter()
            .map(|crumb| crumb.name.as_str())
            .collect();
        println!("/{}", trail.join("/"));
    }

    let folders: Vec<FolderRow> = session.visible_folders().into_iter().map(Into::into).collect();
    let files: Vec<FileRow> = session.visible_files().into_iter().map(Into::into).collect();

    match format {
        OutputFormat::Json => {
            output::print_json(&serde_json::json!({
                "folders": folders,
                "files": files,
            }));
        }
        OutputFormat::Table => {
            if !folders.is_empty() {
                output::print_list(&folders, format);
            }
            output::print_list(&files, format);
        }
    }
    Ok(())
}
