//! Handlers for the trash: listing soft-deleted pieces, restoring them, and
//! purging them for good.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use atelier_core::activity::{actions, entity_types};
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::piece::ArtPiece;
use atelier_db::repositories::{PieceRepo, TrashRepo};
use atelier_events::{names, DomainEvent};

use crate::audit;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/trash
///
/// List trashed pieces, most recently deleted first.
pub async fn list(
    State(state): State<AppState>,
    RequireEditor(_user): RequireEditor,
) -> AppResult<Json<DataResponse<Vec<ArtPiece>>>> {
    let pieces = TrashRepo::list_trashed(&state.pool).await?;
    Ok(Json(DataResponse { data: pieces }))
}

/// POST /api/v1/trash/{id}/restore
///
/// Bring a trashed piece back. Restored pieces never reappear as published;
/// a formerly published piece comes back as a draft so it can be reviewed
/// before going live again.
pub async fn restore(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ArtPiece>>> {
    let restored = PieceRepo::restore(&state.pool, id).await?;
    if !restored {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "TrashedPiece",
            id,
        }));
    }

    let piece = PieceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ArtPiece",
            id,
        }))?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        actions::RESTORE,
        entity_types::ART_PIECE,
        Some(id),
        serde_json::to_value(&piece).ok(),
        None,
    )
    .await;

    state.event_bus.publish(
        DomainEvent::new(names::PIECE_RESTORED)
            .with_entity(entity_types::ART_PIECE, id)
            .by_user(user.user_id),
    );

    Ok(Json(DataResponse { data: piece }))
}

/// DELETE /api/v1/trash/{id}/purge
///
/// Permanently delete one trashed piece. The audit entry carries the final
/// snapshot, since the row itself is gone afterwards.
pub async fn purge_one(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let piece = TrashRepo::find_trashed(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TrashedPiece",
            id,
        }))?;

    TrashRepo::purge_one(&state.pool, id).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        actions::PURGE,
        entity_types::ART_PIECE,
        Some(id),
        serde_json::to_value(&piece).ok(),
        None,
    )
    .await;

    state.event_bus.publish(
        DomainEvent::new(names::PIECE_PURGED)
            .with_entity(entity_types::ART_PIECE, id)
            .by_user(user.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/trash/purge
///
/// Empty the trash. Each purged piece gets its own audit entry so the log
/// keeps a snapshot of everything that was destroyed.
pub async fn purge_all(
    State(state): State<AppState>,
    RequireEditor(user): RequireEditor,
) -> AppResult<StatusCode> {
    let pieces = TrashRepo::list_trashed(&state.pool).await?;

    for piece in &pieces {
        audit::record(
            &state.pool,
            Some(user.user_id),
            actions::PURGE,
            entity_types::ART_PIECE,
            Some(piece.id),
            serde_json::to_value(piece).ok(),
            None,
        )
        .await;
    }

    let purged = TrashRepo::purge_all(&state.pool).await?;
    tracing::info!(purged, "Trash emptied");

    for piece in &pieces {
        state.event_bus.publish(
            DomainEvent::new(names::PIECE_PURGED)
                .with_entity(entity_types::ART_PIECE, piece.id)
                .by_user(user.user_id),
        );
    }

    Ok(StatusCode::NO_CONTENT)
}
