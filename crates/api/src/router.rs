//! Application router assembly.
//!
//! [`build_app_router`] is the single place the route tree meets the
//! middleware stack; `main.rs` and the integration tests both call it, so
//! requests behave identically in production and under test.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Assemble the complete [`Router`].
///
/// Three route groups share one middleware stack: the public HTML pages at
/// the root, the JSON API under `/api/v1`, and static assets under
/// `/static`. Layers apply bottom-up, so a request passes through CORS,
/// request-id stamping, tracing, the timeout, and panic recovery in that
/// order before reaching a handler.
pub fn build_app_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config);
    let request_timeout = Duration::from_secs(state.config.request_timeout_secs);
    let static_dir = state.config.static_dir.clone();
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        // /health stays outside /api/v1 so probes never depend on API versioning.
        .merge(routes::health::router())
        // Gallery index and public art piece pages.
        .merge(routes::pages::router())
        .nest("/api/v1", routes::api_routes())
        // Site stylesheet and any shared client-side helpers.
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// CORS for the admin frontend.
///
/// Origins come from configuration; an unparseable origin panics at startup
/// rather than silently serving with a hole in the allow-list. The method
/// set matches what the API actually routes -- there are no PATCH handlers.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut origins = Vec::with_capacity(config.cors_origins.len());
    for origin in &config.cors_origins {
        let parsed = origin
            .parse()
            .unwrap_or_else(|e| panic!("CORS_ORIGINS entry '{origin}' is not a valid origin: {e}"));
        origins.push(parsed);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
