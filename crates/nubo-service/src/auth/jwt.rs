//! Access token encoding and validation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nubo_core::config::AuthConfig;
use nubo_core::error::AppError;

/// Claims payload embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// Session ID this token belongs to.
    pub sid: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl AccessClaims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Creates and validates signed access tokens.
#[derive(Clone)]
pub struct JwtCodec {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Access token TTL in minutes.
    ttl_minutes: i64,
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl JwtCodec {
    /// Creates a new codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            ttl_minutes: config.access_token_ttl_minutes as i64,
        }
    }

    /// Issues an access token for the given user and session.
    pub fn issue(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(self.ttl_minutes);

        let claims = AccessClaims {
            sub: user_id,
            sid: session_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok((token, expires_at))
    }

    /// Decodes and validates an access token string.
    pub fn decode(&self, token: &str) -> Result<AccessClaims, AppError> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::authentication("Invalid token format")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                _ => AppError::authentication(format!("Token validation failed: {e}")),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nubo_core::error::ErrorKind;

    fn test_codec() -> JwtCodec {
        JwtCodec::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_token_ttl_minutes: 60,
            ..AuthConfig::default()
        })
    }

    #[test]
    fn test_issue_and_decode() {
        let codec = test_codec();
        let user_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();

        let (token, expires_at) = codec.issue(user_id, session_id).unwrap();
        assert!(expires_at > Utc::now());

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.sid, session_id);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = test_codec();
        let (token, _) = codec.issue(Uuid::new_v4(), Uuid::new_v4()).unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        let err = codec.decode(&tampered).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let codec = test_codec();
        let other = JwtCodec::new(&AuthConfig {
            jwt_secret: "different-secret".to_string(),
            ..AuthConfig::default()
        });

        let (token, _) = codec.issue(Uuid::new_v4(), Uuid::new_v4()).unwrap();
        assert!(other.decode(&token).is_err());
    }
}
