//! HTTP transport: [`DriveBackend`] over the Nubo REST API.
//!
//! Every call hits `/api/...` on the configured server with a Bearer token.
//! Success bodies come wrapped in the standard `{ success, data }` envelope;
//! error bodies carry `{ error, message }` and the message is surfaced
//! verbatim so the UI shows exactly what the server said.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use nubo_core::error::{AppError, ErrorKind};
use nubo_core::result::AppResult;
use nubo_core::types::{FolderScope, StorageUsage};
use nubo_entity::{File, FileUpdate, Folder, FolderUpdate};

use crate::backend::{DriveBackend, NewFileRow, Principal, SignedDownload};

/// Established credentials after a successful register or login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// Who logged in.
    pub principal: Principal,
}

// ─── Wire Types ──────────────────────────────────────────────────────────

/// Success envelope. The `success` flag is implied and ignored.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct AuthBody {
    token: String,
    expires_at: DateTime<Utc>,
    user: Principal,
}

#[derive(Debug, Deserialize)]
struct UsageBody {
    used_bytes: u64,
    quota_bytes: u64,
    warn_percent: u8,
}

#[derive(Debug, serde::Serialize)]
struct CreateFolderBody<'a> {
    name: &'a str,
    parent: FolderScope,
}

#[derive(Debug, serde::Serialize)]
struct SignBody<'a> {
    storage_key: &'a str,
}

// ─── Backend ─────────────────────────────────────────────────────────────

/// [`DriveBackend`] implementation backed by a Nubo server.
#[derive(Clone)]
pub struct RemoteBackend {
    /// Shared HTTP client with connect and request timeouts.
    http: reqwest::Client,
    /// Server base URL without a trailing slash.
    base_url: String,
    /// Bearer token, present once logged in.
    token: Option<String>,
}

// Manual impl: the Bearer token must not leak into logs.
impl std::fmt::Debug for RemoteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBackend")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl RemoteBackend {
    /// Creates a backend for the given server, not yet logged in.
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Creates a backend resuming a previously issued token.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> AppResult<Self> {
        let mut backend = Self::new(base_url)?;
        backend.token = Some(token.into());
        Ok(backend)
    }

    /// The token in use, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the Bearer token for subsequent requests.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drop the Bearer token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    // ─── Auth ────────────────────────────────────────────────────────────

    /// Create an account and start a session with it.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> AppResult<AuthSession> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "display_name": display_name,
        });
        let request = self.http.post(self.endpoint("/api/auth/register")).json(&body);
        let response = self.send(request).await?;
        self.adopt(Self::payload::<AuthBody>(response).await?)
    }

    /// Log in with existing credentials.
    pub async fn login(&mut self, email: &str, password: &str) -> AppResult<AuthSession> {
        let body = serde_json::json!({ "email": email, "password": password });
        let request = self.http.post(self.endpoint("/api/auth/login")).json(&body);
        let response = self.send(request).await?;
        self.adopt(Self::payload::<AuthBody>(response).await?)
    }

    /// End the server-side session and drop the local token.
    pub async fn logout(&mut self) -> AppResult<()> {
        let request = self.http.post(self.endpoint("/api/auth/logout"));
        let response = self.send(request).await?;
        Self::payload::<serde_json::Value>(response).await?;
        self.token = None;
        Ok(())
    }

    fn adopt(&mut self, body: AuthBody) -> AppResult<AuthSession> {
        self.token = Some(body.token.clone());
        Ok(AuthSession {
            token: body.token,
            expires_at: body.expires_at,
            principal: body.user,
        })
    }

    // ─── Plumbing ────────────────────────────────────────────────────────

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Blob keys contain slashes and arbitrary file names, so the URL is
    /// built segment by segment to get each piece percent-encoded.
    fn blob_url(&self, key: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AppError::configuration(format!("Invalid server URL '{}': {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::configuration(format!("Invalid server URL '{}'", self.base_url))
            })?
            .pop_if_empty()
            .extend(["api", "storage", "blobs"])
            .extend(key.split('/'));
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        request
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Request to server failed: {e}")))
    }

    /// Unwrap the success envelope, or turn an error status into an
    /// [`AppError`] carrying the server's own message.
    async fn payload<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::error_from(status, &body));
        }
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("Malformed server response: {e}")))?;
        Ok(envelope.data)
    }

    fn error_from(status: StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| format!("Server returned {status}"));
        let kind = match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
            StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
            StatusCode::FORBIDDEN => ErrorKind::Authorization,
            StatusCode::NOT_FOUND => ErrorKind::NotFound,
            StatusCode::CONFLICT => ErrorKind::Conflict,
            _ => ErrorKind::ExternalService,
        };
        AppError::new(kind, message)
    }
}

#[async_trait]
impl DriveBackend for RemoteBackend {
    async fn principal(&self) -> AppResult<Principal> {
        let response = self.send(self.http.get(self.endpoint("/api/auth/me"))).await?;
        Self::payload(response).await
    }

    async fn list_folders(&self, scope: FolderScope) -> AppResult<Vec<Folder>> {
        let request = self
            .http
            .get(self.endpoint("/api/folders"))
            .query(&[("parent", scope.to_string())]);
        let response = self.send(request).await?;
        Self::payload(response).await
    }

    async fn list_files(&self, scope: FolderScope) -> AppResult<Vec<File>> {
        let request = self
            .http
            .get(self.endpoint("/api/files"))
            .query(&[("folder", scope.to_string())]);
        let response = self.send(request).await?;
        Self::payload(response).await
    }

    async fn find_folder(&self, id: Uuid) -> AppResult<Option<Folder>> {
        let request = self.http.get(self.endpoint(&format!("/api/folders/{id}")));
        let response = self.send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::payload(response).await?))
    }

    async fn find_file(&self, id: Uuid) -> AppResult<Option<File>> {
        let request = self.http.get(self.endpoint(&format!("/api/files/{id}")));
        let response = self.send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::payload(response).await?))
    }

    async fn create_folder(&self, name: &str, parent: FolderScope) -> AppResult<Folder> {
        let request = self
            .http
            .post(self.endpoint("/api/folders"))
            .json(&CreateFolderBody { name, parent });
        let response = self.send(request).await?;
        Self::payload(response).await
    }

    async fn update_folder(&self, id: Uuid, update: FolderUpdate) -> AppResult<Folder> {
        let request = self
            .http
            .patch(self.endpoint(&format!("/api/folders/{id}")))
            .json(&update);
        let response = self.send(request).await?;
        Self::payload(response).await
    }

    async fn delete_folder_row(&self, id: Uuid) -> AppResult<()> {
        let request = self.http.delete(self.endpoint(&format!("/api/folders/{id}")));
        let response = self.send(request).await?;
        Self::payload::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn list_trashed_folders(&self) -> AppResult<Vec<Folder>> {
        let request = self
            .http
            .get(self.endpoint("/api/folders"))
            .query(&[("trashed", "true")]);
        let response = self.send(request).await?;
        Self::payload(response).await
    }

    async fn list_trashed_files(&self) -> AppResult<Vec<File>> {
        let request = self
            .http
            .get(self.endpoint("/api/files"))
            .query(&[("trashed", "true")]);
        let response = self.send(request).await?;
        Self::payload(response).await
    }

    async fn insert_file_row(&self, row: NewFileRow) -> AppResult<File> {
        let request = self.http.post(self.endpoint("/api/files")).json(&row);
        let response = self.send(request).await?;
        Self::payload(response).await
    }

    async fn update_file(&self, id: Uuid, update: FileUpdate) -> AppResult<File> {
        let request = self
            .http
            .patch(self.endpoint(&format!("/api/files/{id}")))
            .json(&update);
        let response = self.send(request).await?;
        Self::payload(response).await
    }

    async fn delete_file_row(&self, id: Uuid) -> AppResult<()> {
        let request = self.http.delete(self.endpoint(&format!("/api/files/{id}")));
        let response = self.send(request).await?;
        Self::payload::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn put_blob(&self, key: &str, data: Bytes) -> AppResult<()> {
        let url = self.blob_url(key)?;
        let response = self.send(self.http.put(url).body(data)).await?;
        Self::payload::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn remove_blob(&self, key: &str) -> AppResult<()> {
        let url = self.blob_url(key)?;
        let response = self.send(self.http.delete(url)).await?;
        Self::payload::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn sign_url(&self, key: &str) -> AppResult<SignedDownload> {
        let request = self
            .http
            .post(self.endpoint("/api/storage/sign"))
            .json(&SignBody { storage_key: key });
        let response = self.send(request).await?;
        Self::payload(response).await
    }

    async fn usage(&self) -> AppResult<StorageUsage> {
        let response = self.send(self.http.get(self.endpoint("/api/usage"))).await?;
        let body: UsageBody = Self::payload(response).await?;
        Ok(StorageUsage::new(
            body.used_bytes,
            body.quota_bytes,
            body.warn_percent,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_statuses_to_error_kinds() {
        let err = RemoteBackend::error_from(
            StatusCode::NOT_FOUND,
            r#"{"error":"NOT_FOUND","message":"Folder not found"}"#,
        );
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Folder not found");

        let err = RemoteBackend::error_from(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"AUTHENTICATION","message":"Session has expired"}"#,
        );
        assert!(err.is_auth_failure());
        assert_eq!(err.message, "Session has expired");

        let err = RemoteBackend::error_from(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert!(err.message.contains("502"));
    }

    #[test]
    fn blob_urls_encode_each_segment() {
        let backend = RemoteBackend::new("http://127.0.0.1:9000").unwrap();
        let url = backend
            .blob_url("3f2c8a6e-0000-0000-0000-000000000000/abc-my report.pdf")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/api/storage/blobs/3f2c8a6e-0000-0000-0000-000000000000/abc-my%20report.pdf"
        );
    }

    #[test]
    fn base_url_keeps_no_trailing_slash() {
        let backend = RemoteBackend::new("http://localhost:8080/").unwrap();
        assert_eq!(backend.endpoint("/api/health"), "http://localhost:8080/api/health");
    }
}
