//! Local filesystem blob store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;

use nubo_core::error::{AppError, ErrorKind};
use nubo_core::result::AppResult;
use nubo_core::traits::storage::{BlobStore, ByteStream};

/// Blob store backed by a directory on the local filesystem.
///
/// Keys map directly to paths under the root, so `{user_id}/{name}` lands
/// in a per-user subdirectory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored blobs.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new blob store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a blob key to an absolute path within the root.
    ///
    /// Keys embed caller-supplied file names, so anything that could step
    /// outside the root (absolute paths, `..` components) is rejected.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let clean = key.trim_start_matches('/');
        if clean.is_empty() {
            return Err(AppError::validation("Blob key must not be empty"));
        }
        let relative = Path::new(clean);
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(AppError::validation(format!("Invalid blob key: {key}")));
                }
            }
        }
        Ok(self.root.join(relative))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(key)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {key}"),
                e,
            )
        })?;

        debug!(key, bytes = data.len(), "Wrote blob");
        Ok(())
    }

    async fn read(&self, key: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(key)?;
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open blob: {key}"),
                    e,
                )
            }
        })?;

        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream.map(|r| r.map(|b| b.into()))))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_path = self.resolve(key)?;
        if full_path.exists() {
            fs::remove_file(&full_path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete blob: {key}"),
                    e,
                )
            })?;
            debug!(key, "Deleted blob");
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_path = self.resolve(key)?;
        Ok(full_path.exists())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }
}

/// Guess MIME type from a blob key's extension.
pub fn mime_from_key(key: &str) -> Option<String> {
    let ext = key.rsplit('.').next()?.to_lowercase();
    let mime = match ext.as_str() {
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => return None,
    };
    Some(mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn read_back(store: &LocalBlobStore, key: &str) -> Bytes {
        let mut stream = store.read(key).await.unwrap();
        let mut buf = Vec::new();
        while let Some(chunk) = stream.next().await {
            buf.extend_from_slice(&chunk.unwrap());
        }
        Bytes::from(buf)
    }

    #[tokio::test]
    async fn test_put_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        let data = Bytes::from("hello world");
        store.put("user-1/abc-report.txt", data.clone()).await.unwrap();

        assert!(store.exists("user-1/abc-report.txt").await.unwrap());
        assert_eq!(read_back(&store, "user-1/abc-report.txt").await, data);

        store.delete("user-1/abc-report.txt").await.unwrap();
        assert!(!store.exists("user-1/abc-report.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        store.delete("user-1/never-written.bin").await.unwrap();
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        store.put("k/v.txt", Bytes::from("one")).await.unwrap();
        store.put("k/v.txt", Bytes::from("two")).await.unwrap();
        assert_eq!(read_back(&store, "k/v.txt").await, Bytes::from("two"));
    }

    #[tokio::test]
    async fn test_rejects_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        for key in ["../escape.txt", "user/../../etc/passwd", ""] {
            let err = store.put(key, Bytes::from("x")).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "key {key:?}");
        }
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        let err = match store.read("user-1/missing.txt").await {
            Ok(_) => panic!("read of a missing blob should fail"),
            Err(err) => err,
        };
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_mime_detection() {
        assert_eq!(mime_from_key("file.pdf"), Some("application/pdf".into()));
        assert_eq!(mime_from_key("u1/img.PNG"), Some("image/png".into()));
        assert_eq!(mime_from_key("noext"), None);
    }
}
