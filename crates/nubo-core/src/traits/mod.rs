//! Cross-crate trait definitions.

pub mod storage;

pub use storage::{BlobStore, ByteStream};
