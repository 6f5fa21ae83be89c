//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A server-side login session.
///
/// Access tokens are bound to a session row; deleting the row revokes
/// every token issued for it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has passed its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
