//! The visitor-facing HTML routes, mounted at the site root rather than
//! under `/api/v1`.

use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// ```text
/// GET /                  -> gallery index of published pieces
/// GET /art/{type}/{slug} -> piece page (200), 301 on renamed slug, else 404
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::gallery))
        .route("/art/{type}/{slug}", get(pages::art_page))
}
