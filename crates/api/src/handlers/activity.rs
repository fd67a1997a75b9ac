//! Handler for the admin activity log.

use axum::extract::{Query, State};
use axum::Json;

use atelier_db::models::activity::{ActivityEntry, ActivityQuery};
use atelier_db::repositories::ActivityRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::PageResponse;
use crate::state::AppState;

/// GET /api/v1/activity
///
/// Query the activity log. Admin only. Supports `user_id`, `action`,
/// `entity_type`, `entity_id`, `from`, `to`, `limit` and `offset`; the
/// total count ignores paging so clients can render page controls.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(params): Query<ActivityQuery>,
) -> AppResult<Json<PageResponse<ActivityEntry>>> {
    let items = ActivityRepo::query(&state.pool, &params).await?;
    let total = ActivityRepo::count(&state.pool, &params).await?;
    Ok(Json(PageResponse { items, total }))
}
