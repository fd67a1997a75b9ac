//! Role checks as extractors.
//!
//! A handler states its minimum role in its signature: `RequireEditor` for
//! the piece and trash endpoints, `RequireAdmin` for user management, the
//! activity log, and redirects. Both wrap [`AuthUser`], so a failed role
//! check is a 403 while a missing or bad token stays a 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use atelier_core::error::CoreError;
use atelier_core::roles::{ROLE_ADMIN, ROLE_EDITOR};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Admins only.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(forbidden("Admin role required"));
        }
        Ok(RequireAdmin(user))
    }
}

/// Editors and admins. Admin implies every editor capability.
pub struct RequireEditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_EDITOR && user.role != ROLE_ADMIN {
            return Err(forbidden("Editor or admin role required"));
        }
        Ok(RequireEditor(user))
    }
}

fn forbidden(message: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(message.into()))
}
