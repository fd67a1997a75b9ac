//! Liveness endpoint for uptime monitoring.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// What `/health` reports.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` when everything below is fine, `"degraded"` otherwise.
    pub status: &'static str,
    /// Version of the running binary.
    pub version: &'static str,
    /// Whether a round-trip query to Postgres succeeded just now.
    pub db_healthy: bool,
}

/// GET /health
///
/// Answers 200 either way; monitors distinguish healthy from degraded by
/// the body, and a refused connection speaks for itself.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = atelier_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mounted at the root, deliberately outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
