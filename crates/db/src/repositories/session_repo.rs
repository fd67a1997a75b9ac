//! Storage for refresh-token sessions.
//!
//! A row in `user_sessions` is one issued refresh token. Lookups go through
//! the token's SHA-256 hash; the plaintext never reaches the database.
//! Revocation flips `is_revoked` instead of deleting, so a stolen token that
//! arrives after logout is distinguishable from one that never existed. The
//! maintenance sweep deletes rows once they are expired or revoked.

use sqlx::PgPool;

use atelier_core::types::DbId;

use crate::models::session::{CreateSession, UserSession};

pub struct SessionRepo;

impl SessionRepo {
    /// Store a freshly issued session.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        sqlx::query_as::<_, UserSession>(
            "INSERT INTO user_sessions
                 (user_id, refresh_token_hash, expires_at, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, user_id, refresh_token_hash, expires_at, is_revoked,
                       user_agent, ip_address, created_at, updated_at",
        )
        .bind(input.user_id)
        .bind(&input.refresh_token_hash)
        .bind(input.expires_at)
        .bind(&input.user_agent)
        .bind(&input.ip_address)
        .fetch_one(pool)
        .await
    }

    /// Look up a session by token digest, skipping revoked and expired rows.
    ///
    /// `None` therefore means "refuse the refresh", whatever the reason.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        sqlx::query_as::<_, UserSession>(
            "SELECT id, user_id, refresh_token_hash, expires_at, is_revoked,
                    user_agent, ip_address, created_at, updated_at
             FROM user_sessions
             WHERE refresh_token_hash = $1 AND is_revoked = false AND expires_at > NOW()",
        )
        .bind(hash)
        .fetch_optional(pool)
        .await
    }

    /// Revoke one session. `false` when it was already revoked or missing.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let done = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true, updated_at = NOW()
             WHERE id = $1 AND is_revoked = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(done.rows_affected() > 0)
    }

    /// Revoke every live session a user holds, returning how many there were.
    /// Used on logout, password reset, and account deactivation.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let done = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true, updated_at = NOW()
             WHERE user_id = $1 AND is_revoked = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(done.rows_affected())
    }

    /// Drop rows no lookup can ever return again.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let done =
            sqlx::query("DELETE FROM user_sessions WHERE expires_at < NOW() OR is_revoked = true")
                .execute(pool)
                .await?;
        Ok(done.rows_affected())
    }
}
