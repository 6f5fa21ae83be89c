//! # nubo-storage
//!
//! Blob storage for Nubo: a local filesystem implementation of the
//! [`BlobStore`] trait and the signer that turns blob keys into
//! short-lived signed URLs.
//!
//! [`BlobStore`]: nubo_core::traits::BlobStore

pub mod local;
pub mod sign;

pub use local::LocalBlobStore;
pub use sign::{SignedUrl, UrlSigner};
