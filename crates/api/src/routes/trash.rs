//! `/trash`: what soft delete left behind. Editor role or better.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::trash;
use crate::state::AppState;

/// ```text
/// GET    /              -> list
/// DELETE /purge         -> purge_all
/// POST   /{id}/restore  -> restore
/// DELETE /{id}/purge    -> purge_one
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trash::list))
        .route("/purge", delete(trash::purge_all))
        .route("/{id}/restore", post(trash::restore))
        .route("/{id}/purge", delete(trash::purge_one))
}
