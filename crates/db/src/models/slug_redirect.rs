//! Slug redirect entity model.

use serde::Serialize;
use sqlx::FromRow;

use atelier_core::types::{DbId, Timestamp};

/// A slug redirect row from the `slug_redirects` table.
///
/// Maps a retired `(art_type, old_slug)` pair to the piece that used to own
/// it. The redirect target is the piece's *current* slug, looked up at
/// request time, so chains of renames never accumulate.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SlugRedirect {
    pub id: DbId,
    pub art_type: String,
    pub old_slug: String,
    pub piece_id: DbId,
    pub created_at: Timestamp,
}
