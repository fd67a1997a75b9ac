//! `/pieces`: the art piece CRUD surface plus status transitions. Editor
//! role or better throughout.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pieces;
use crate::state::AppState;

/// ```text
/// GET    /                 -> list (?type=&status=)
/// POST   /                 -> create
/// GET    /slug-check       -> slug_check (?type=&title=)
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> trash (soft delete)
/// POST   /{id}/publish     -> publish
/// POST   /{id}/unpublish   -> unpublish
/// POST   /{id}/archive     -> archive
/// GET    /{id}/preview     -> preview (rendered HTML, any status)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pieces::list).post(pieces::create))
        .route("/slug-check", get(pieces::slug_check))
        .route(
            "/{id}",
            get(pieces::get_by_id)
                .put(pieces::update)
                .delete(pieces::trash),
        )
        .route("/{id}/publish", post(pieces::publish))
        .route("/{id}/unpublish", post(pieces::unpublish))
        .route("/{id}/archive", post(pieces::archive))
        .route("/{id}/preview", get(pieces::preview))
}
