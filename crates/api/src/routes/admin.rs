//! Account management under `/admin`. Every handler takes the
//! `RequireAdmin` extractor, so the role check lives with the handler
//! rather than in a route-level layer.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// GET  /users                  -> list
/// POST /users                  -> create
/// GET  /users/{id}             -> get_by_id
/// PUT  /users/{id}             -> update
/// POST /users/{id}/deactivate  -> deactivate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list).post(admin::create))
        .route("/users/{id}", get(admin::get_by_id).put(admin::update))
        .route("/users/{id}/deactivate", post(admin::deactivate))
}
