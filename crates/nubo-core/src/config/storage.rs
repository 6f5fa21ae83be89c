//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Blob store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for blob data on disk.
    #[serde(default = "default_blob_root")]
    pub blob_root: String,
    /// Lifetime of issued signed URLs in seconds.
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            blob_root: default_blob_root(),
            signed_url_ttl_seconds: default_signed_url_ttl(),
        }
    }
}

fn default_blob_root() -> String {
    "data/blobs".to_string()
}

fn default_signed_url_ttl() -> u64 {
    60
}
