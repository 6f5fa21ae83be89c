//! Shared domain types used across Nubo crates.

pub mod scope;
pub mod usage;

pub use scope::FolderScope;
pub use usage::{StorageUsage, format_bytes};
