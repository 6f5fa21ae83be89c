//! Blob byte operations and signed download URLs.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::info;

use nubo_core::error::AppError;
use nubo_core::traits::storage::{BlobStore, ByteStream};
use nubo_storage::local::mime_from_key;
use nubo_storage::sign::UrlSigner;

use crate::context::RequestContext;
use crate::file::service::require_owned_key;

/// A signed, time-limited download URL for a single blob.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SignedUrlGrant {
    /// Fully qualified URL serving the blob.
    pub url: String,
    /// When the URL stops working.
    pub expires_at: DateTime<Utc>,
}

/// An opened blob ready to be served.
pub struct BlobContent {
    /// The blob's bytes.
    pub stream: ByteStream,
    /// Guessed MIME type, if the key's extension is recognized.
    pub mime_type: Option<String>,
    /// Display file name recovered from the key.
    pub filename: String,
}

/// Moves blob bytes in and out of the store on behalf of a user.
#[derive(Debug, Clone)]
pub struct BlobService {
    /// Backing blob store.
    store: Arc<dyn BlobStore>,
    /// Signer for download grants.
    signer: Arc<UrlSigner>,
    /// Public base URL used to compose signed URLs.
    public_url: String,
}

impl BlobService {
    /// Creates a new blob service.
    pub fn new(store: Arc<dyn BlobStore>, signer: Arc<UrlSigner>, public_url: String) -> Self {
        Self {
            store,
            signer,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    /// Writes a blob under the user's own prefix.
    pub async fn put(&self, ctx: &RequestContext, key: &str, data: Bytes) -> Result<(), AppError> {
        require_owned_key(ctx, key)?;
        let size = data.len();
        self.store.put(key, data).await?;

        info!(user_id = %ctx.user_id, key, bytes = size, "Blob stored");

        Ok(())
    }

    /// Deletes a blob under the user's own prefix. Missing blobs are fine.
    pub async fn remove(&self, ctx: &RequestContext, key: &str) -> Result<(), AppError> {
        require_owned_key(ctx, key)?;
        self.store.delete(key).await?;

        info!(user_id = %ctx.user_id, key, "Blob removed");

        Ok(())
    }

    /// Issues a signed download URL for a blob the user owns.
    pub async fn sign(&self, ctx: &RequestContext, key: &str) -> Result<SignedUrlGrant, AppError> {
        require_owned_key(ctx, key)?;

        if !self.store.exists(key).await? {
            return Err(AppError::not_found(format!("Blob not found: {key}")));
        }

        let signed = self.signer.issue(key)?;
        Ok(SignedUrlGrant {
            url: format!("{}/api/storage/signed/{}", self.public_url, signed.token),
            expires_at: signed.expires_at,
        })
    }

    /// Opens the blob named by a signed token.
    ///
    /// The token is the whole grant. No session is required, which is what
    /// lets a signed URL be pasted into a plain browser tab.
    pub async fn open(&self, token: &str) -> Result<BlobContent, AppError> {
        let key = self.signer.verify(token)?;
        let stream = self.store.read(&key).await?;

        Ok(BlobContent {
            stream,
            mime_type: mime_from_key(&key),
            filename: display_name(&key),
        })
    }
}

/// Recovers the display name from a `{user_id}/{uuid}-{name}` key.
///
/// The hyphen after the 36-character UUID is the separator. Splitting on
/// the first hyphen would cut inside the UUID itself.
fn display_name(key: &str) -> String {
    let basename = key.rsplit('/').next().unwrap_or(key);
    // split_at_checked: byte 36 may land inside a multibyte char in a
    // hand-crafted key, and those still pass key sanitation.
    if let Some((prefix, rest)) = basename.split_at_checked(36)
        && prefix.parse::<uuid::Uuid>().is_ok()
        && let Some(name) = rest.strip_prefix('-')
        && !name.is_empty()
    {
        return name.to_string();
    }
    basename.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let key = "3c9ad71e-1111-2222-3333-444455556666/9f8e7d6c-aaaa-bbbb-cccc-0123456789ab-quarterly-report.pdf";
        assert_eq!(display_name(key), "quarterly-report.pdf");
        assert_eq!(display_name("u1/noprefix"), "noprefix");
    }

    #[test]
    fn test_display_name_multibyte_at_uuid_boundary() {
        // 35 ASCII bytes then a two-byte char straddling byte 36. Keys like
        // this are not uuid-prefixed but must still come back whole.
        let basename = format!("{}é.txt", "a".repeat(35));
        assert_eq!(display_name(&format!("u1/{basename}")), basename);
    }
}
