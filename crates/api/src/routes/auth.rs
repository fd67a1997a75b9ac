//! Routing table for `/auth`. Everything here is a POST; the flows mutate
//! session or token state even when the body is empty.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST /login                   -> login
/// POST /refresh                 -> refresh
/// POST /logout                  -> logout (requires auth)
/// POST /password-reset/request  -> password_reset_request
/// POST /password-reset/confirm  -> password_reset_confirm
/// POST /verify-email/request    -> verify_email_request (requires auth)
/// POST /verify-email/confirm    -> verify_email_confirm
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/password-reset/request", post(auth::password_reset_request))
        .route("/password-reset/confirm", post(auth::password_reset_confirm))
        .route("/verify-email/request", post(auth::verify_email_request))
        .route("/verify-email/confirm", post(auth::verify_email_confirm))
}
