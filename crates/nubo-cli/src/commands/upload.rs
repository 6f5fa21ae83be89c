//! Upload a local file into the drive.

use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;

use nubo_core::error::AppError;
use nubo_core::result::AppResult;
use nubo_core::types::format_bytes;

use super::Connection;
use crate::output;

/// Arguments for `upload`
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Local file to upload
    pub path: PathBuf,

    /// Destination folder id (the root when omitted)
    #[arg(short, long)]
    pub folder: Option<String>,

    /// Name to store the file under (the local file name when omitted)
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Execute `upload`
pub async fn execute(args: &UploadArgs, conn: &Connection) -> AppResult<()> {
    let name = match &args.name {
        Some(name) => name.clone(),
        None => args
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .ok_or_else(|| {
                AppError::validation(format!("Cannot tell a file name from '{}'", args.path.display()))
            })?,
    };

    let data = tokio::fs::read(&args.path).await.map_err(|e| {
        AppError::validation(format!("Cannot read '{}': {e}", args.path.display()))
    })?;

    let mut session = super::drive_session(conn).await?;
    if let Some(folder) = &args.folder {
        session.enter(super::parse_id(folder)?).await?;
    }

    let file = session.upload(&name, Bytes::from(data)).await?;
    output::print_success(&format!(
        "Uploaded '{}' ({}, id {})",
        file.name,
        format_bytes(file.size_bytes.max(0) as u64),
        file.id
    ));
    Ok(())
}
