//! Storage usage readout against a display quota.

use serde::{Deserialize, Serialize};

/// A point-in-time storage usage summary for one user.
///
/// Usage counts the sizes of non-trashed files only. The quota is purely
/// informational: exceeding it changes the readout, never the behavior of
/// uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageUsage {
    /// Total bytes used by non-trashed files.
    pub used_bytes: u64,
    /// Display quota in bytes.
    pub quota_bytes: u64,
    /// Percentage above which the readout is a warning.
    #[serde(default = "default_warn_percent")]
    pub warn_percent: u8,
}

impl StorageUsage {
    /// Create a usage summary with the given warning threshold.
    pub fn new(used_bytes: u64, quota_bytes: u64, warn_percent: u8) -> Self {
        Self {
            used_bytes,
            quota_bytes,
            warn_percent,
        }
    }

    /// Usage as a whole percentage, rounded, clamped to 0..=100.
    pub fn percent(&self) -> u8 {
        if self.quota_bytes == 0 {
            return if self.used_bytes > 0 { 100 } else { 0 };
        }
        let raw = (self.used_bytes as f64 / self.quota_bytes as f64) * 100.0;
        raw.round().min(100.0) as u8
    }

    /// Whether usage is past the warning threshold.
    pub fn is_warning(&self) -> bool {
        self.percent() > self.warn_percent
    }
}

fn default_warn_percent() -> u8 {
    80
}

/// Format a byte count for humans (`4.2 MB`, `913 B`).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_and_clamps() {
        let usage = StorageUsage::new(256, 1024, 80);
        assert_eq!(usage.percent(), 25);

        // 0.5% rounds to 1
        let usage = StorageUsage::new(5, 1000, 80);
        assert_eq!(usage.percent(), 1);

        // Over quota clamps to 100
        let usage = StorageUsage::new(3000, 1000, 80);
        assert_eq!(usage.percent(), 100);

        let usage = StorageUsage::new(0, 1000, 80);
        assert_eq!(usage.percent(), 0);
    }

    #[test]
    fn warning_is_strictly_above_threshold() {
        // The threshold applies to the rounded percentage.
        assert!(!StorageUsage::new(800, 1000, 80).is_warning());
        assert!(!StorageUsage::new(801, 1000, 80).is_warning());
        assert!(StorageUsage::new(810, 1000, 80).is_warning());
        assert!(StorageUsage::new(1000, 1000, 80).is_warning());
    }

    #[test]
    fn zero_quota_does_not_divide() {
        assert_eq!(StorageUsage::new(0, 0, 80).percent(), 0);
        assert_eq!(StorageUsage::new(10, 0, 80).percent(), 100);
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(913), "913 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024 + 200 * 1024), "5.2 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
