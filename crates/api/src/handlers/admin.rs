//! Handlers for admin user management.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use atelier_core::activity::{actions, entity_types};
use atelier_core::error::CoreError;
use atelier_core::token::{generate_token, purposes};
use atelier_core::types::DbId;
use atelier_db::models::auth_token::CreateAuthToken;
use atelier_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use atelier_db::repositories::{AuthTokenRepo, RoleRepo, SessionRepo, UserRepo};
use atelier_events::{names, DomainEvent};

use crate::audit;
use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::VERIFY_TOKEN_TTL_HOURS;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_USERNAME_LENGTH: usize = 50;
const MIN_USERNAME_LENGTH: usize = 3;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Role name (`"admin"` or `"editor"`).
    pub role: String,
}

/// Request body for `PUT /admin/users/{id}`. All fields optional; the role
/// is given by name and resolved to its id.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    // Role names are resolved from one roles query instead of per user.
    let roles: HashMap<DbId, String> = RoleRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();

    let users = UserRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|u| {
            let role = roles.get(&u.role_id).cloned().unwrap_or_default();
            UserResponse::from_user(u, role)
        })
        .collect();

    Ok(Json(DataResponse { data: users }))
}

/// POST /api/v1/admin/users
///
/// Create a user with the given role name. The new account gets a
/// verification email when SMTP is configured. The audit snapshot never
/// contains the password hash.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;
    validate_password_strength(&input.password).map_err(CoreError::Validation)?;

    let role = RoleRepo::find_by_name(&state.pool, &input.role)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown role: '{}'",
                input.role
            )))
        })?;

    let password_hash =
        hash_password(&input.password).map_err(|e| AppError::InternalError(e.to_string()))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            role_id: role.id,
        },
    )
    .await?;

    send_verification_email(&state, &user).await;

    let response = UserResponse::from_user(user, role.name);

    audit::record(
        &state.pool,
        Some(admin.user_id),
        actions::CREATE,
        entity_types::USER,
        Some(response.id),
        serde_json::to_value(&response).ok(),
        None,
    )
    .await;

    state.event_bus.publish(
        DomainEvent::new(names::USER_CREATED)
            .with_entity(entity_types::USER, response.id)
            .by_user(admin.user_id)
            .with_payload(serde_json::json!({
                "username": response.username,
                "role": response.role,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, id).await?;
    let role = resolve_role(&state, user.role_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from_user(user, role),
    }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Partial update of username, email, role, or active flag.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(username) = &input.username {
        validate_username(username)?;
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
    }

    let role_id = match &input.role {
        Some(name) => Some(
            RoleRepo::find_by_name(&state.pool, name)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(format!("Unknown role: '{name}'")))
                })?
                .id,
        ),
        None => None,
    };

    let user = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            username: input.username,
            email: input.email,
            role_id,
            is_active: input.is_active,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let role = resolve_role(&state, user.role_id).await?;
    let response = UserResponse::from_user(user, role);

    audit::record(
        &state.pool,
        Some(admin.user_id),
        actions::UPDATE,
        entity_types::USER,
        Some(id),
        serde_json::to_value(&response).ok(),
        None,
    )
    .await;

    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/admin/users/{id}/deactivate
///
/// Disable an account and revoke its sessions. Admins cannot deactivate
/// themselves, so the system always keeps at least the acting admin.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot deactivate your own account".into(),
        )));
    }

    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(user_id = id, revoked, "User deactivated");

    audit::record(
        &state.pool,
        Some(admin.user_id),
        actions::DEACTIVATE,
        entity_types::USER,
        Some(id),
        None,
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

async fn resolve_role(state: &AppState, role_id: DbId) -> AppResult<String> {
    RoleRepo::resolve_name(&state.pool, role_id)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Unknown role id: {role_id}")))
}

fn validate_username(username: &str) -> Result<(), CoreError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Username must be {MIN_USERNAME_LENGTH}-{MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(CoreError::Validation(
            "Username may only contain letters, digits, '_' and '-'".into(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), CoreError> {
    // Deliverability is proven by the verification email, not by parsing.
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if !valid {
        return Err(CoreError::Validation("Invalid email address".into()));
    }
    Ok(())
}

/// Issue a verification token and mail the link. Failures are logged, not
/// returned: the account exists either way, and the user can re-request
/// verification after logging in.
async fn send_verification_email(state: &AppState, user: &User) {
    let Some(mailer) = &state.mailer else {
        tracing::warn!(user_id = user.id, "SMTP not configured, verification email skipped");
        return;
    };

    let token = generate_token();
    let created = AuthTokenRepo::create(
        &state.pool,
        &CreateAuthToken {
            user_id: user.id,
            token_hash: token.hash,
            purpose: purposes::EMAIL_VERIFICATION.to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(VERIFY_TOKEN_TTL_HOURS),
        },
    )
    .await;
    if let Err(error) = created {
        tracing::error!(user_id = user.id, %error, "Failed to store verification token");
        return;
    }

    let link = format!(
        "{}/admin/verify-email?token={}",
        state.config.public_base_url, token.plaintext
    );
    if let Err(error) = mailer.send_verification_email(&user.email, &link).await {
        tracing::error!(user_id = user.id, %error, "Failed to send verification email");
    }
}
