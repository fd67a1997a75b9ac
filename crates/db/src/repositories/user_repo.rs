//! Storage for admin accounts.
//!
//! Besides plain CRUD this carries the login bookkeeping: failed-attempt
//! counting, lockout timestamps, and the `email_verified_at` stamp. All of
//! it lives on the `users` row itself, one UPDATE per state change.

use sqlx::PgPool;

use atelier_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUser, UpdateUser, User};

const COLUMNS: &str = "id, username, email, password_hash, role_id, is_active, email_verified_at, \
                        last_login_at, failed_login_count, locked_until, created_at, updated_at";

/// `SELECT <all columns> FROM users` plus whatever clause the caller needs.
fn select_users(tail: &str) -> String {
    format!("SELECT {COLUMNS} FROM users {tail}")
}

pub struct UserRepo;

impl UserRepo {
    /// Insert an account. The hash is produced by the caller; this layer
    /// never sees a plaintext password.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&select_users("WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Exact-match username lookup, used by login.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&select_users("WHERE username = $1"))
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Exact-match email lookup, used by password reset requests.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&select_users("WHERE email = $1"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Every account, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&select_users("ORDER BY created_at DESC"))
            .fetch_all(pool)
            .await
    }

    /// Partial update; `None` fields keep their current value. Returns
    /// `None` when the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            "UPDATE users
             SET username  = COALESCE($2, username),
                 email     = COALESCE($3, email),
                 role_id   = COALESCE($4, role_id),
                 is_active = COALESCE($5, is_active),
                 updated_at = NOW()
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.role_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Flip `is_active` off. `false` means the account was already inactive
    /// or absent, which the handler turns into a 404.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let done = sqlx::query(
            "UPDATE users SET is_active = false, updated_at = NOW()
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(done.rows_affected() > 0)
    }

    /// Bump the failed-login counter and hand back the new value, so the
    /// caller can decide about lockout without a second query.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE users SET failed_login_count = failed_login_count + 1, updated_at = NOW()
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Refuse logins for this account until the given time.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// A good login clears the failure counter and any lock, and stamps
    /// `last_login_at`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users
             SET failed_login_count = 0,
                 locked_until = NULL,
                 last_login_at = NOW(),
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace the stored password hash (reset flow).
    pub async fn set_password_hash(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let done =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(pool)
                .await?;
        Ok(done.rows_affected() > 0)
    }

    /// Stamp `email_verified_at` once. `false` when the address was already
    /// verified; confirming twice is harmless, so callers may ignore it.
    pub async fn mark_email_verified(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let done = sqlx::query(
            "UPDATE users SET email_verified_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND email_verified_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(done.rows_affected() > 0)
    }
}
