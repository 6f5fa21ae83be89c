//! File metadata operations.

pub mod service;

pub use service::{FileService, RegisterFile};
