//! Storage for slug redirects: old URLs that 301 to renamed pieces.
//!
//! Each row maps `(art_type, old_slug)` straight to a piece id, never to
//! another slug, so a chain of renames still resolves in one lookup.

use sqlx::PgPool;

use atelier_core::types::DbId;

use crate::models::slug_redirect::SlugRedirect;

const COLUMNS: &str = "id, art_type, old_slug, piece_id, created_at";

pub struct SlugRedirectRepo;

impl SlugRedirectRepo {
    /// Record that `old_slug` used to belong to `piece_id`.
    ///
    /// Upserts on `(art_type, old_slug)`: when an old slug is reused and
    /// later retired again, the row repoints to the most recent owner.
    pub async fn record(
        pool: &PgPool,
        art_type: &str,
        old_slug: &str,
        piece_id: DbId,
    ) -> Result<SlugRedirect, sqlx::Error> {
        let query = format!(
            "INSERT INTO slug_redirects (art_type, old_slug, piece_id)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_slug_redirects_type_slug
             DO UPDATE SET piece_id = EXCLUDED.piece_id
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SlugRedirect>(&query)
            .bind(art_type)
            .bind(old_slug)
            .bind(piece_id)
            .fetch_one(pool)
            .await
    }

    /// Resolve an old slug to the current slug of the piece that owns the
    /// redirect. Returns `None` when there is no redirect or the target
    /// piece is trashed.
    pub async fn resolve(
        pool: &PgPool,
        art_type: &str,
        old_slug: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT p.slug FROM slug_redirects r
             JOIN art_pieces p ON p.id = r.piece_id
             WHERE r.art_type = $1 AND r.old_slug = $2 AND p.deleted_at IS NULL",
        )
        .bind(art_type)
        .bind(old_slug)
        .fetch_optional(pool)
        .await
    }

    /// List all redirects, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<SlugRedirect>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slug_redirects ORDER BY created_at DESC");
        sqlx::query_as::<_, SlugRedirect>(&query)
            .fetch_all(pool)
            .await
    }

    /// Delete a redirect by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM slug_redirects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the redirect holding `(art_type, old_slug)`, if any. Used
    /// when a new live slug shadows a recorded redirect; the live piece
    /// wins the URL.
    pub async fn delete_for_slug(
        pool: &PgPool,
        art_type: &str,
        old_slug: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM slug_redirects WHERE art_type = $1 AND old_slug = $2")
            .bind(art_type)
            .bind(old_slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all redirects pointing at a piece. Returns the count removed.
    /// Part of the purge flow: redirect rows go before the piece row.
    pub async fn delete_for_piece(pool: &PgPool, piece_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM slug_redirects WHERE piece_id = $1")
            .bind(piece_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
