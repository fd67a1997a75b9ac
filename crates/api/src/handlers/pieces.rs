//! Handlers for the `/pieces` resource: art piece CRUD, status transitions,
//! preview rendering, and slug checks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

use atelier_core::activity::{actions, entity_types};
use atelier_core::error::CoreError;
use atelier_core::markup::render_piece_page;
use atelier_core::piece::{
    archive_transition, publish_transition, unpublish_transition, validate_config,
    validate_description, validate_title, ArtType, PieceStatus,
};
use atelier_core::slug::{generate_slug, numbered_slug, validate_slug};
use atelier_core::types::DbId;
use atelier_db::models::piece::{ArtPiece, CreatePiece, PieceFilter, UpdatePiece};
use atelier_db::repositories::{PieceRepo, SlugRedirectRepo};
use atelier_events::{names, DomainEvent};

use crate::audit;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fallback slug base for titles with no usable characters.
const FALLBACK_SLUG: &str = "piece";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /pieces`.
#[derive(Debug, Deserialize)]
pub struct CreatePieceRequest {
    pub art_type: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub config: serde_json::Value,
    /// Explicit slug; generated from the title when absent.
    pub slug: Option<String>,
}

/// Request body for `PUT /pieces/{id}`. All fields optional.
#[derive(Debug, Deserialize)]
pub struct UpdatePieceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub config: Option<serde_json::Value>,
    pub slug: Option<String>,
}

/// Response body for `GET /pieces/slug-check`.
#[derive(Debug, Serialize)]
pub struct SlugCheckResponse {
    /// The slug a piece with this title would receive right now (numbered
    /// when the plain form is taken).
    pub slug: String,
    /// Whether the un-numbered slug is free.
    pub available: bool,
}

/// Query parameters for `GET /pieces/slug-check`.
#[derive(Debug, Deserialize)]
pub struct SlugCheckQuery {
    #[serde(rename = "type")]
    pub art_type: String,
    pub title: String,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/pieces
///
/// Create a new draft piece. The config is validated against the art type,
/// the slug is derived from the title (or taken from the body) and walked
/// to uniqueness with `-2`, `-3`... suffixes.
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Json(input): Json<CreatePieceRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ArtPiece>>)> {
    let art_type = ArtType::from_str_db(&input.art_type)?;
    validate_title(&input.title)?;
    validate_description(&input.description)?;
    validate_config(art_type, &input.config)?;

    let base = match &input.slug {
        Some(explicit) => {
            validate_slug(explicit)?;
            explicit.clone()
        }
        None => slug_base_for(&input.title),
    };
    let slug = unique_slug(&state, art_type.as_str(), &base, None).await?;

    // A stale redirect occupying the new URL would shadow the piece.
    SlugRedirectRepo::delete_for_slug(&state.pool, art_type.as_str(), &slug).await?;

    let piece = PieceRepo::create(
        &state.pool,
        &CreatePiece {
            art_type: art_type.as_str().to_string(),
            title: input.title,
            slug,
            description: input.description,
            config_json: input.config,
            status: PieceStatus::Draft.as_str().to_string(),
            created_by: Some(user.user_id),
        },
    )
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        actions::CREATE,
        entity_types::ART_PIECE,
        Some(piece.id),
        serde_json::to_value(&piece).ok(),
        None,
    )
    .await;

    state.event_bus.publish(
        DomainEvent::new(names::PIECE_CREATED)
            .with_entity(entity_types::ART_PIECE, piece.id)
            .by_user(user.user_id)
            .with_payload(piece_payload(&piece)),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: piece })))
}

/// GET /api/v1/pieces
///
/// List live pieces, optionally filtered by `?type=` and `?status=`.
pub async fn list(
    State(state): State<AppState>,
    RequireEditor(_user): RequireEditor,
    Query(filter): Query<PieceFilter>,
) -> AppResult<Json<DataResponse<Vec<ArtPiece>>>> {
    if let Some(t) = &filter.art_type {
        ArtType::from_str_db(t)?;
    }
    if let Some(s) = &filter.status {
        PieceStatus::from_str_db(s)?;
    }

    let pieces = PieceRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: pieces }))
}

/// GET /api/v1/pieces/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireEditor(_user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ArtPiece>>> {
    let piece = find_live(&state, id).await?;
    Ok(Json(DataResponse { data: piece }))
}

/// PUT /api/v1/pieces/{id}
///
/// Partial update. A title change regenerates the slug (an explicit `slug`
/// in the body wins); when the slug changes, a redirect is recorded from
/// the old URL.
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePieceRequest>,
) -> AppResult<Json<DataResponse<ArtPiece>>> {
    let existing = find_live(&state, id).await?;
    let art_type = ArtType::from_str_db(&existing.art_type)?;

    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    if let Some(description) = &input.description {
        validate_description(description)?;
    }
    if let Some(config) = &input.config {
        validate_config(art_type, config)?;
    }

    let new_slug = resolve_slug_change(&state, &existing, &input).await?;

    let updated = PieceRepo::update(
        &state.pool,
        id,
        &UpdatePiece {
            title: input.title,
            slug: new_slug.clone(),
            description: input.description,
            config_json: input.config,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "ArtPiece",
        id,
    }))?;

    // Old URL keeps working. The redirect points at the piece id, so any
    // number of renames stays a single hop.
    if let Some(slug) = &new_slug {
        SlugRedirectRepo::record(&state.pool, &existing.art_type, &existing.slug, id).await?;
        SlugRedirectRepo::delete_for_slug(&state.pool, &existing.art_type, slug).await?;
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        actions::UPDATE,
        entity_types::ART_PIECE,
        Some(id),
        serde_json::to_value(&updated).ok(),
        None,
    )
    .await;

    state.event_bus.publish(
        DomainEvent::new(names::PIECE_UPDATED)
            .with_entity(entity_types::ART_PIECE, id)
            .by_user(user.user_id)
            .with_payload(piece_payload(&updated)),
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/pieces/{id}
///
/// Move a piece to the trash (soft delete). Returns 204 No Content.
pub async fn trash(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let piece = find_live(&state, id).await?;

    PieceRepo::soft_delete(&state.pool, id).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        actions::TRASH,
        entity_types::ART_PIECE,
        Some(id),
        serde_json::to_value(&piece).ok(),
        None,
    )
    .await;

    state.event_bus.publish(
        DomainEvent::new(names::PIECE_TRASHED)
            .with_entity(entity_types::ART_PIECE, id)
            .by_user(user.user_id)
            .with_payload(piece_payload(&piece)),
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// POST /api/v1/pieces/{id}/publish
///
/// Make a piece publicly visible. 409 when it is already published.
pub async fn publish(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ArtPiece>>> {
    let piece = transition(&state, &user, id, actions::PUBLISH, publish_transition).await?;

    state.event_bus.publish(
        DomainEvent::new(names::PIECE_PUBLISHED)
            .with_entity(entity_types::ART_PIECE, id)
            .by_user(user.user_id)
            .with_payload(serde_json::json!({
                "title": piece.title,
                "slug": piece.slug,
                "art_type": piece.art_type,
                "url": format!(
                    "{}/art/{}/{}",
                    state.config.public_base_url, piece.art_type, piece.slug
                ),
            })),
    );

    Ok(Json(DataResponse { data: piece }))
}

/// POST /api/v1/pieces/{id}/unpublish
///
/// Take a published piece back to draft. 409 when it is not published.
pub async fn unpublish(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ArtPiece>>> {
    let piece = transition(&state, &user, id, actions::UNPUBLISH, unpublish_transition).await?;

    state.event_bus.publish(
        DomainEvent::new(names::PIECE_UNPUBLISHED)
            .with_entity(entity_types::ART_PIECE, id)
            .by_user(user.user_id)
            .with_payload(piece_payload(&piece)),
    );

    Ok(Json(DataResponse { data: piece }))
}

/// POST /api/v1/pieces/{id}/archive
///
/// Retire a piece from the working set without trashing it. 409 when it is
/// already archived.
pub async fn archive(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ArtPiece>>> {
    let piece = transition(&state, &user, id, actions::ARCHIVE, archive_transition).await?;

    state.event_bus.publish(
        DomainEvent::new(names::PIECE_ARCHIVED)
            .with_entity(entity_types::ART_PIECE, id)
            .by_user(user.user_id)
            .with_payload(piece_payload(&piece)),
    );

    Ok(Json(DataResponse { data: piece }))
}

// ---------------------------------------------------------------------------
// Preview and slug check
// ---------------------------------------------------------------------------

/// GET /api/v1/pieces/{id}/preview
///
/// Render the public page for a piece regardless of its status, so editors
/// can inspect drafts before publishing.
pub async fn preview(
    State(state): State<AppState>,
    RequireEditor(_user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<Html<String>> {
    let piece = find_live(&state, id).await?;
    let art_type = ArtType::from_str_db(&piece.art_type)?;

    let html = render_piece_page(&piece.title, art_type, &piece.config_json)?;
    Ok(Html(html))
}

/// GET /api/v1/pieces/slug-check?type=&title=
///
/// Report the slug a title would receive and whether the plain form is
/// free, without creating anything.
pub async fn slug_check(
    State(state): State<AppState>,
    RequireEditor(_user): RequireEditor,
    Query(query): Query<SlugCheckQuery>,
) -> AppResult<Json<DataResponse<SlugCheckResponse>>> {
    let art_type = ArtType::from_str_db(&query.art_type)?;

    let base = slug_base_for(&query.title);
    let available = !PieceRepo::slug_exists(&state.pool, art_type.as_str(), &base).await?;
    let slug = if available {
        base
    } else {
        unique_slug(&state, art_type.as_str(), &base, None).await?
    };

    Ok(Json(DataResponse {
        data: SlugCheckResponse { slug, available },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a live (non-trashed) piece or 404.
async fn find_live(state: &AppState, id: DbId) -> AppResult<ArtPiece> {
    PieceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ArtPiece",
            id,
        }))
}

/// Slug base derived from a title, with a fallback for titles that strip
/// to nothing.
fn slug_base_for(title: &str) -> String {
    let base = generate_slug(title);
    if base.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        base
    }
}

/// Walk `base`, `base-2`, `base-3`... until a slug not taken within the art
/// type is found. `keep` carries the piece's current slug during updates so
/// renaming a piece to its own slug is not treated as a collision.
async fn unique_slug(
    state: &AppState,
    art_type: &str,
    base: &str,
    keep: Option<&str>,
) -> AppResult<String> {
    if Some(base) == keep || !PieceRepo::slug_exists(&state.pool, art_type, base).await? {
        return Ok(base.to_string());
    }
    for n in 2u32.. {
        let candidate = numbered_slug(base, n);
        if Some(candidate.as_str()) == keep
            || !PieceRepo::slug_exists(&state.pool, art_type, &candidate).await?
        {
            return Ok(candidate);
        }
    }
    unreachable!("slug walk is unbounded")
}

/// Work out whether an update changes the slug.
///
/// Priority: an explicit `slug` in the body, then a changed title. Returns
/// `None` when the slug stays as it is.
async fn resolve_slug_change(
    state: &AppState,
    existing: &ArtPiece,
    input: &UpdatePieceRequest,
) -> AppResult<Option<String>> {
    let base = match (&input.slug, &input.title) {
        (Some(explicit), _) => {
            validate_slug(explicit)?;
            explicit.clone()
        }
        (None, Some(title)) if *title != existing.title => slug_base_for(title),
        _ => return Ok(None),
    };

    let slug = unique_slug(state, &existing.art_type, &base, Some(&existing.slug)).await?;
    if slug == existing.slug {
        return Ok(None);
    }
    Ok(Some(slug))
}

/// Shared publish/unpublish/archive plumbing: look up, apply the status
/// transition rule, persist, and write the audit entry.
async fn transition(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    action: &'static str,
    rule: impl Fn(PieceStatus) -> Result<PieceStatus, CoreError>,
) -> AppResult<ArtPiece> {
    let piece = find_live(state, id).await?;
    let current = PieceStatus::from_str_db(&piece.status)?;
    let next = rule(current)?;

    let updated = PieceRepo::set_status(&state.pool, id, next.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ArtPiece",
            id,
        }))?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        action,
        entity_types::ART_PIECE,
        Some(id),
        serde_json::to_value(&updated).ok(),
        None,
    )
    .await;

    Ok(updated)
}

/// Compact event payload for piece lifecycle events.
fn piece_payload(piece: &ArtPiece) -> serde_json::Value {
    serde_json::json!({
        "title": piece.title,
        "slug": piece.slug,
        "art_type": piece.art_type,
    })
}
