//! Storage for single-use auth tokens (email verification, password reset).
//!
//! Tokens are addressed by digest, scoped by purpose, and die on first use
//! or at expiry, whichever comes first.

use sqlx::PgPool;

use atelier_core::types::DbId;

use crate::models::auth_token::{AuthToken, CreateAuthToken};

const COLUMNS: &str = "id, user_id, token_hash, purpose, expires_at, used_at, created_at";

pub struct AuthTokenRepo;

impl AuthTokenRepo {
    /// Insert a new token, invalidating any prior unused tokens of the same
    /// purpose for the user so only the most recent emailed link works.
    pub async fn create(pool: &PgPool, input: &CreateAuthToken) -> Result<AuthToken, sqlx::Error> {
        sqlx::query(
            "UPDATE auth_tokens SET used_at = NOW()
             WHERE user_id = $1 AND purpose = $2 AND used_at IS NULL",
        )
        .bind(input.user_id)
        .bind(&input.purpose)
        .execute(pool)
        .await?;

        let query = format!(
            "INSERT INTO auth_tokens (user_id, token_hash, purpose, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuthToken>(&query)
            .bind(input.user_id)
            .bind(&input.token_hash)
            .bind(&input.purpose)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a redeemable token by hash and purpose (unused, unexpired).
    pub async fn find_valid(
        pool: &PgPool,
        token_hash: &str,
        purpose: &str,
    ) -> Result<Option<AuthToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM auth_tokens
             WHERE token_hash = $1
               AND purpose = $2
               AND used_at IS NULL
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, AuthToken>(&query)
            .bind(token_hash)
            .bind(purpose)
            .fetch_optional(pool)
            .await
    }

    /// Mark a token as used. Returns `true` if the row was updated (i.e.
    /// the token had not already been consumed).
    pub async fn mark_used(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE auth_tokens SET used_at = NOW() WHERE id = $1 AND used_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete expired or used tokens. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM auth_tokens WHERE expires_at < NOW() OR used_at IS NOT NULL")
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
