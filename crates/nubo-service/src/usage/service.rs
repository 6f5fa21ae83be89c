//! Computes a user's storage consumption against the configured quota.

use std::sync::Arc;

use nubo_core::config::QuotaConfig;
use nubo_core::error::AppError;
use nubo_core::types::StorageUsage;
use nubo_database::repositories::file::FileRepository;

use crate::context::RequestContext;

/// Reports storage usage relative to the quota.
///
/// The quota is informational. Nothing here or in the upload path
/// rejects writes that push a user past it.
#[derive(Debug, Clone)]
pub struct UsageService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Quota configuration.
    quota: QuotaConfig,
}

impl UsageService {
    /// Creates a new usage service.
    pub fn new(file_repo: Arc<FileRepository>, quota: QuotaConfig) -> Self {
        Self { file_repo, quota }
    }

    /// Sums the user's active file sizes. Trashed files do not count.
    pub async fn usage(&self, ctx: &RequestContext) -> Result<StorageUsage, AppError> {
        let used = self.file_repo.sum_size(ctx.user_id).await?;
        Ok(StorageUsage::new(
            used.max(0) as u64,
            self.quota.max_bytes,
            self.quota.warn_percent,
        ))
    }
}
