pub mod activity;
pub mod admin;
pub mod auth;
pub mod health;
pub mod pages;
pub mod pieces;
pub mod redirects;
pub mod trash;

use axum::Router;

use crate::state::AppState;

/// The whole `/api/v1` tree in one place.
///
/// ```text
/// /auth/login                      login (public)
/// /auth/refresh                    refresh (public)
/// /auth/logout                     logout (requires auth)
/// /auth/password-reset/request     request reset token (public)
/// /auth/password-reset/confirm     consume reset token (public)
/// /auth/verify-email/request       request verification (requires auth)
/// /auth/verify-email/confirm       consume verification token (public)
///
/// /pieces                          list, create (editor)
/// /pieces/slug-check               preview slug assignment (editor)
/// /pieces/{id}                     get, update, soft delete
/// /pieces/{id}/publish             publish (POST)
/// /pieces/{id}/unpublish           back to draft (POST)
/// /pieces/{id}/archive             archive (POST)
/// /pieces/{id}/preview             rendered HTML at any status (GET)
///
/// /trash                           list trashed pieces (editor)
/// /trash/purge                     empty the trash (DELETE)
/// /trash/{id}/restore              restore (POST)
/// /trash/{id}/purge                purge one (DELETE)
///
/// /activity                        query the activity log (admin)
///
/// /admin/users                     list, create (admin)
/// /admin/users/{id}                get, update
/// /admin/users/{id}/deactivate     deactivate + revoke sessions (POST)
///
/// /redirects                       list slug redirects (admin)
/// /redirects/{id}                  delete redirect (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/pieces", pieces::router())
        .nest("/trash", trash::router())
        .nest("/activity", activity::router())
        .nest("/admin", admin::router())
        .nest("/redirects", redirects::router())
}
