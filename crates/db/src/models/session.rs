//! Refresh-token session rows.

use sqlx::FromRow;

use atelier_core::types::{DbId, Timestamp};

/// One issued refresh token. Rotation revokes this row and inserts its
/// successor; the two share nothing but the user.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new session. The hash is computed by the caller;
/// plaintext tokens never enter this crate.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}
