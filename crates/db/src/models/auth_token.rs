//! Single-use auth token model (email verification, password reset).

use sqlx::FromRow;

use atelier_core::types::{DbId, Timestamp};

/// An auth token row from the `auth_tokens` table.
///
/// Only the SHA-256 digest of the emailed token is stored. A token is
/// redeemable while `used_at` is NULL and `expires_at` is in the future.
#[derive(Debug, Clone, FromRow)]
pub struct AuthToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    /// One of `atelier_core::token::purposes`.
    pub purpose: String,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a new auth token.
#[derive(Debug)]
pub struct CreateAuthToken {
    pub user_id: DbId,
    pub token_hash: String,
    pub purpose: String,
    pub expires_at: Timestamp,
}
