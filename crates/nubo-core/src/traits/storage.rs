//! Blob store trait for pluggable binary storage backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for blob storage backends.
///
/// Blobs are opaque byte sequences addressed by a caller-chosen key of the
/// form `{user_id}/{unique-name}`. The trait is defined here in `nubo-core`
/// and implemented in `nubo-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Write a blob at the given key, replacing any existing blob.
    async fn put(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Open a blob for reading as a byte stream.
    async fn read(&self, key: &str) -> AppResult<ByteStream>;

    /// Delete the blob at the given key.
    ///
    /// Deleting a missing blob succeeds. An error means the blob may still
    /// exist, and callers that sequence row deletion after blob deletion
    /// must stop.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a blob exists at the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Check whether the backing store is reachable and writable.
    async fn health_check(&self) -> AppResult<bool>;
}
