//! Admin visibility into the slug redirect table. Redirects are created
//! as a side effect of renaming a published piece; the API only lists and
//! deletes them.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::redirects;
use crate::state::AppState;

/// `GET /` lists, `DELETE /{id}` drops one. Admin only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(redirects::list))
        .route("/{id}", delete(redirects::delete))
}
