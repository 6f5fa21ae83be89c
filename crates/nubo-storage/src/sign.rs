//! Short-lived signed tokens granting read access to a single blob.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use nubo_core::error::AppError;
use nubo_core::result::AppResult;

/// Claims payload embedded in a signed blob URL token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrlClaims {
    /// Subject — the blob key this grant covers.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// A single-blob access grant: the bearer token and when it stops working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedUrl {
    /// Bearer token to place in the download URL.
    pub token: String,
    /// Expiration timestamp of the grant.
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies signed blob URL tokens.
#[derive(Clone)]
pub struct UrlSigner {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Grant lifetime in seconds.
    ttl_seconds: u64,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl UrlSigner {
    /// Creates a new signer from the shared secret and grant TTL.
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0; // the default 60s leeway would outlive the grant itself

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    /// Issues a grant for the given blob key.
    pub fn issue(&self, key: &str) -> AppResult<SignedUrl> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::seconds(self.ttl_seconds as i64);

        let claims = SignedUrlClaims {
            sub: key.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign URL token: {e}")))?;

        Ok(SignedUrl { token, expires_at })
    }

    /// Verifies a grant token and returns the blob key it covers.
    pub fn verify(&self, token: &str) -> AppResult<String> {
        let token_data = decode::<SignedUrlClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Signed URL has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::authentication("Invalid signed URL token")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid signed URL signature")
                }
                _ => AppError::authentication(format!("Signed URL validation failed: {e}")),
            })?;

        Ok(token_data.claims.sub)
    }
}
