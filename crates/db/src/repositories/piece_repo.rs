//! Storage for art pieces: CRUD, the status lifecycle, and slug lookups.

use sqlx::PgPool;

use atelier_core::types::DbId;

use crate::models::piece::{ArtPiece, CreatePiece, PieceFilter, UpdatePiece};

const COLUMNS: &str = "id, art_type, title, slug, description, config_json, status, \
                        published_at, created_by, deleted_at, created_at, updated_at";

/// Soft-deleted rows are invisible to every read here except
/// [`PieceRepo::slug_exists`]; the trash views live in `TrashRepo`.
pub struct PieceRepo;

impl PieceRepo {
    /// Insert a new art piece, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePiece) -> Result<ArtPiece, sqlx::Error> {
        let query = format!(
            "INSERT INTO art_pieces (art_type, title, slug, description, config_json, status, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArtPiece>(&query)
            .bind(&input.art_type)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.config_json)
            .bind(&input.status)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a live piece by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ArtPiece>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM art_pieces WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, ArtPiece>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a live piece by art type and slug, regardless of status.
    pub async fn find_by_slug(
        pool: &PgPool,
        art_type: &str,
        slug: &str,
    ) -> Result<Option<ArtPiece>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM art_pieces
             WHERE art_type = $1 AND slug = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, ArtPiece>(&query)
            .bind(art_type)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find a published, live piece by art type and slug. The public page
    /// lookup.
    pub async fn find_published_by_slug(
        pool: &PgPool,
        art_type: &str,
        slug: &str,
    ) -> Result<Option<ArtPiece>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM art_pieces
             WHERE art_type = $1 AND slug = $2
               AND status = 'published' AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, ArtPiece>(&query)
            .bind(art_type)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List live pieces for the admin, optionally filtered by art type and
    /// status. Published pieces come first, newest publication first.
    pub async fn list(pool: &PgPool, filter: &PieceFilter) -> Result<Vec<ArtPiece>, sqlx::Error> {
        let mut conditions = vec!["deleted_at IS NULL".to_string()];
        let mut bind_idx = 1u32;

        if filter.art_type.is_some() {
            conditions.push(format!("art_type = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
        }

        let query = format!(
            "SELECT {COLUMNS} FROM art_pieces WHERE {} \
             ORDER BY published_at DESC NULLS LAST, created_at DESC",
            conditions.join(" AND ")
        );

        let mut q = sqlx::query_as::<_, ArtPiece>(&query);
        if let Some(ref art_type) = filter.art_type {
            q = q.bind(art_type);
        }
        if let Some(ref status) = filter.status {
            q = q.bind(status);
        }
        q.fetch_all(pool).await
    }

    /// List published, live pieces for the public gallery, newest
    /// publication first.
    pub async fn list_published(pool: &PgPool) -> Result<Vec<ArtPiece>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM art_pieces
             WHERE status = 'published' AND deleted_at IS NULL
             ORDER BY published_at DESC"
        );
        sqlx::query_as::<_, ArtPiece>(&query).fetch_all(pool).await
    }

    /// Update a live piece. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePiece,
    ) -> Result<Option<ArtPiece>, sqlx::Error> {
        let query = format!(
            "UPDATE art_pieces SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                config_json = COALESCE($5, config_json),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArtPiece>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.config_json)
            .fetch_optional(pool)
            .await
    }

    /// Set a live piece's status. The first transition to `published`
    /// stamps `published_at`; later publish cycles keep the original date.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<ArtPiece>, sqlx::Error> {
        let query = format!(
            "UPDATE art_pieces SET
                status = $2,
                published_at = CASE
                    WHEN $2 = 'published' AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArtPiece>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a live piece. Returns `true` if a row was trashed; a
    /// second call on the same id reports `false`.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE art_pieces SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a trashed piece. Returns `true` if a row was restored.
    ///
    /// A piece that was published when trashed comes back as a draft, so a
    /// stale publication never resumes without an explicit publish.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE art_pieces SET
                deleted_at = NULL,
                status = CASE WHEN status = 'published' THEN 'draft' ELSE status END,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a piece row. Returns `true` if a row was removed.
    ///
    /// Callers must remove the piece's `slug_redirects` rows first; see
    /// `TrashRepo` for the full purge flow.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM art_pieces WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether any piece of the given art type holds this slug. Trashed
    /// rows still hold their slug, so restores can never collide.
    pub async fn slug_exists(
        pool: &PgPool,
        art_type: &str,
        slug: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM art_pieces WHERE art_type = $1 AND slug = $2)",
        )
        .bind(art_type)
        .bind(slug)
        .fetch_one(pool)
        .await
    }
}
