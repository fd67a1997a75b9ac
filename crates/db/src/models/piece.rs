//! Art piece entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atelier_core::types::{DbId, Timestamp};

/// An art piece row from the `art_pieces` table.
///
/// `art_type` and `status` are stored as text; parse with
/// `ArtType::from_str_db` / `PieceStatus::from_str_db` where the typed form
/// is needed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArtPiece {
    pub id: DbId,
    pub art_type: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub config_json: serde_json::Value,
    pub status: String,
    pub published_at: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new art piece. The slug has already been resolved
/// to a free one by the caller.
#[derive(Debug)]
pub struct CreatePiece {
    pub art_type: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub config_json: serde_json::Value,
    pub status: String,
    pub created_by: Option<DbId>,
}

/// DTO for updating an art piece. All fields are optional; the slug, when
/// present, has already been validated and resolved by the caller.
#[derive(Debug, Default)]
pub struct UpdatePiece {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub config_json: Option<serde_json::Value>,
}

/// Filter parameters for listing art pieces.
#[derive(Debug, Default, Deserialize)]
pub struct PieceFilter {
    /// Art type wire name (`aframe`, `c2`, `p5`, `three`).
    #[serde(rename = "type")]
    pub art_type: Option<String>,
    /// Status wire name (`draft`, `published`, `archived`).
    pub status: Option<String>,
}
