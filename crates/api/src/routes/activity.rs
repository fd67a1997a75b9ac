//! The activity log has a single admin-only route: a filtered listing.
//! Filters arrive as query parameters, documented on
//! [`atelier_db::models::activity::ActivityQuery`].

use axum::routing::get;
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(activity::list))
}
