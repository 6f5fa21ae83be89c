//! Download a file through a signed URL.

use std::path::PathBuf;

use clap::Args;

use nubo_core::error::AppError;
use nubo_core::result::AppResult;
use nubo_core::types::format_bytes;

use super::Connection;
use crate::output;

/// Arguments for `download`
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// File id to download
    pub id: String,

    /// Where to write the file (the drive file name when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute `download`
pub async fn execute(args: &DownloadArgs, conn: &Connection) -> AppResult<()> {
    let session = super::drive_session(conn).await?;

    let file = session.file(super::parse_id(&args.id)?).await?;
    let grant = session.open(&file).await?;

    // The signed URL is its own credential; a plain GET fetches the bytes.
    let response = reqwest::get(&grant.url)
        .await
        .map_err(|e| AppError::external_service(format!("Download failed: {e}")))?;
    if !response.status().is_success() {
        return Err(AppError::external_service(format!(
            "Download failed: server returned {}",
            response.status()
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::external_service(format!("Download failed: {e}")))?;

    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&file.name));
    tokio::fs::write(&target, &bytes).await.map_err(|e| {
        AppError::internal(format!("Cannot write '{}': {e}", target.display()))
    })?;

    output::print_success(&format!(
        "Downloaded '{}' to {} ({})",
        file.name,
        target.display(),
        format_bytes(bytes.len() as u64)
    ));
    Ok(())
}
