//! Response DTOs.

use serde::{Deserialize, Serialize};

use nubo_core::types::StorageUsage;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Database status.
    pub database: String,
    /// Blob store status.
    pub storage: String,
}

/// Storage usage report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageResponse {
    /// Bytes counted against the quota.
    pub used_bytes: u64,
    /// Configured quota in bytes.
    pub quota_bytes: u64,
    /// Warning threshold percentage.
    pub warn_percent: u8,
    /// Used percentage, rounded and clamped to 100.
    pub percent: u8,
    /// Whether usage is past the warning threshold.
    pub warning: bool,
}

impl From<StorageUsage> for UsageResponse {
    fn from(usage: StorageUsage) -> Self {
        Self {
            used_bytes: usage.used_bytes,
            quota_bytes: usage.quota_bytes,
            warn_percent: usage.warn_percent,
            percent: usage.percent(),
            warning: usage.is_warning(),
        }
    }
}
