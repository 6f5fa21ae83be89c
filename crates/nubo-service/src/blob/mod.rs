//! Blob upload, deletion, and signed URL grants.

pub mod service;

pub use service::{BlobContent, BlobService, SignedUrlGrant};
