//! Storage quota display configuration.

use serde::{Deserialize, Serialize};

/// Quota settings for the storage usage readout.
///
/// The quota is informational only: it drives the usage percentage and
/// warning threshold but is never consulted when accepting uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Total quota in bytes shown to users.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    /// Usage percentage above which the readout switches to a warning.
    #[serde(default = "default_warn_percent")]
    pub warn_percent: u8,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            warn_percent: default_warn_percent(),
        }
    }
}

fn default_max_bytes() -> u64 {
    // 1 GiB
    1024 * 1024 * 1024
}

fn default_warn_percent() -> u8 {
    80
}
