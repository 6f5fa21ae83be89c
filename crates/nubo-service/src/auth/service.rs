//! Registration, login, and token-to-context resolution.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use nubo_core::config::AuthConfig;
use nubo_core::error::AppError;
use nubo_database::repositories::session::SessionRepository;
use nubo_database::repositories::user::UserRepository;
use nubo_entity::user::{CreateUser, User};

use crate::context::RequestContext;

use super::hasher::PasswordHasher;
use super::jwt::JwtCodec;

/// Handles registration, login, logout, and access token validation.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Session repository.
    session_repo: Arc<SessionRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Access token codec.
    jwt: Arc<JwtCodec>,
    /// Minimum password length.
    password_min_length: usize,
    /// Session lifetime in hours.
    session_ttl_hours: i64,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AuthResponse {
    /// Access token for subsequent requests.
    pub token: String,
    /// Access token expiration timestamp.
    pub expires_at: DateTime<Utc>,
    /// The authenticated user.
    pub user: User,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        session_repo: Arc<SessionRepository>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            hasher: Arc::new(PasswordHasher::new()),
            jwt: Arc::new(JwtCodec::new(config)),
            password_min_length: config.password_min_length,
            session_ttl_hours: config.session_ttl_hours as i64,
        }
    }

    /// Registers a new account and logs it in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<AuthResponse, AppError> {
        let email = normalize_email(email)?;

        if password.len() < self.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                email,
                password_hash,
                display_name,
            })
            .await?;

        info!(user_id = %user.id, "User registered");

        self.start_session(user).await
    }

    /// Verifies credentials and opens a new session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let email = normalize_email(email)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid email or password"))?;

        let valid = self.hasher.verify_password(password, &user.password_hash)?;
        if !valid {
            return Err(AppError::authentication("Invalid email or password"));
        }

        self.start_session(user).await
    }

    /// Ends the current session. Logging out twice is not an error.
    pub async fn logout(&self, ctx: &RequestContext) -> Result<(), AppError> {
        let deleted = self.session_repo.delete(ctx.session_id).await?;
        if deleted {
            info!(user_id = %ctx.user_id, session_id = %ctx.session_id, "User logged out");
        }
        Ok(())
    }

    /// Gets the current user's profile.
    pub async fn current_user(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Resolves an access token into a request context.
    ///
    /// The token signature alone is not enough. The session it names must
    /// still exist and be unexpired, so logout revokes outstanding tokens.
    pub async fn authenticate(&self, token: &str) -> Result<RequestContext, AppError> {
        let claims = self.jwt.decode(token)?;

        let session = self
            .session_repo
            .find_by_id(claims.sid)
            .await?
            .ok_or_else(|| AppError::authentication("Session no longer exists"))?;

        if session.is_expired() {
            return Err(AppError::authentication("Session has expired"));
        }
        if session.user_id != claims.sub {
            return Err(AppError::authentication("Token does not match session"));
        }

        Ok(RequestContext::new(claims.sub, claims.sid))
    }

    /// Creates a session row and issues an access token for the user.
    async fn start_session(&self, user: User) -> Result<AuthResponse, AppError> {
        let session_expires = Utc::now() + chrono::Duration::hours(self.session_ttl_hours);
        let session = self.session_repo.create(user.id, session_expires).await?;

        let (token, expires_at) = self.jwt.issue(user.id, session.id)?;

        info!(user_id = %user.id, session_id = %session.id, "Session started");

        Ok(AuthResponse {
            token,
            expires_at,
            user,
        })
    }
}

/// Trims, lowercases, and shape-checks an email address.
fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') || !email.contains('.') {
        return Err(AppError::validation("Invalid email format"));
    }
    Ok(email)
}
