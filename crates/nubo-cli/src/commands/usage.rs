//! Show storage usage against the quota.

use clap::Args;

use nubo_core::result::AppResult;
use nubo_core::types::format_bytes;

use super::Connection;
use crate::output::{self, OutputFormat};

/// Arguments for `usage`
#[derive(Debug, Args)]
pub struct UsageArgs {}

/// Execute `usage`
pub async fn execute(_args: &UsageArgs, conn: &Connection, format: OutputFormat) -> AppResult<()> {
    let session = super::drive_session(conn).await?;
    let usage = session.usage().await?;

    if format == OutputFormat::Json {
        output::print_json(&usage);
        return Ok(());
    }

    let percent = usage.percent();
    let filled = (percent as usize * 20) / 100;
    let bar: String = "#".repeat(filled) + &"-".repeat(20 - filled);

    println!(
        "[{bar}] {percent}%  {} of {}",
        format_bytes(usage.used_bytes),
        format_bytes(usage.quota_bytes)
    );
    if usage.is_warning() {
        output::print_warning("Storage is almost full.");
    }
    Ok(())
}
