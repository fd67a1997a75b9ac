//! Repository for trash (soft-deleted art pieces) operations.
//!
//! Listing, single and bulk purge, and the retention sweep. Purging removes
//! the piece's `slug_redirects` rows before the piece row (FK order).

use sqlx::PgPool;

use atelier_core::types::DbId;

use crate::models::piece::ArtPiece;
use crate::repositories::piece_repo::PieceRepo;
use crate::repositories::slug_redirect_repo::SlugRedirectRepo;

/// Column list matching `PieceRepo`.
const COLUMNS: &str = "id, art_type, title, slug, description, config_json, status, \
                        published_at, created_by, deleted_at, created_at, updated_at";

/// Provides trash listing and purge operations for art pieces.
pub struct TrashRepo;

impl TrashRepo {
    /// List all trashed pieces, most recently trashed first.
    pub async fn list_trashed(pool: &PgPool) -> Result<Vec<ArtPiece>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM art_pieces
             WHERE deleted_at IS NOT NULL
             ORDER BY deleted_at DESC"
        );
        sqlx::query_as::<_, ArtPiece>(&query).fetch_all(pool).await
    }

    /// Find a trashed piece by id.
    pub async fn find_trashed(pool: &PgPool, id: DbId) -> Result<Option<ArtPiece>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM art_pieces WHERE id = $1 AND deleted_at IS NOT NULL"
        );
        sqlx::query_as::<_, ArtPiece>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a single trashed piece. Returns `true` if a row
    /// was removed; `false` when the id is unknown or not trashed.
    pub async fn purge_one(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        if Self::find_trashed(pool, id).await?.is_none() {
            return Ok(false);
        }
        SlugRedirectRepo::delete_for_piece(pool, id).await?;
        PieceRepo::hard_delete(pool, id).await
    }

    /// Permanently delete all trashed pieces. Returns the count removed.
    pub async fn purge_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        sqlx::query(
            "DELETE FROM slug_redirects WHERE piece_id IN
                 (SELECT id FROM art_pieces WHERE deleted_at IS NOT NULL)",
        )
        .execute(pool)
        .await?;
        let result = sqlx::query("DELETE FROM art_pieces WHERE deleted_at IS NOT NULL")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Permanently delete trashed pieces whose `deleted_at` is older than
    /// `retention_days`. The hourly retention sweep. Returns the count
    /// removed.
    pub async fn purge_older_than(pool: &PgPool, retention_days: i64) -> Result<u64, sqlx::Error> {
        sqlx::query(
            "DELETE FROM slug_redirects WHERE piece_id IN
                 (SELECT id FROM art_pieces
                  WHERE deleted_at IS NOT NULL
                    AND deleted_at < NOW() - make_interval(days => $1::int))",
        )
        .bind(retention_days)
        .execute(pool)
        .await?;

        let result = sqlx::query(
            "DELETE FROM art_pieces
             WHERE deleted_at IS NOT NULL
               AND deleted_at < NOW() - make_interval(days => $1::int)",
        )
        .bind(retention_days)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
