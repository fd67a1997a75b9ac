//! Handlers for slug redirect administration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use atelier_core::activity::{actions, entity_types};
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::slug_redirect::SlugRedirect;
use atelier_db::repositories::SlugRedirectRepo;

use crate::audit;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/redirects
///
/// List all slug redirects, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<SlugRedirect>>>> {
    let redirects = SlugRedirectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: redirects }))
}

/// DELETE /api/v1/redirects/{id}
///
/// Drop a redirect. The old URL stops resolving; use this when a stale
/// mapping should no longer shadow anything.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = SlugRedirectRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "SlugRedirect",
            id,
        }));
    }

    audit::record(
        &state.pool,
        Some(admin.user_id),
        actions::DELETE,
        entity_types::SLUG_REDIRECT,
        Some(id),
        None,
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
