//! The `/auth` surface: credential login with lockout, refresh-token
//! rotation, logout, and the two emailed-token flows (password reset and
//! email verification).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use atelier_core::activity::{actions, entity_types};
use atelier_core::error::CoreError;
use atelier_core::token::{generate_token, hash_token, purposes};
use atelier_core::types::DbId;
use atelier_db::models::auth_token::CreateAuthToken;
use atelier_db::models::session::CreateSession;
use atelier_db::models::user::User;
use atelier_db::repositories::{AuthTokenRepo, RoleRepo, SessionRepo, UserRepo};
use atelier_events::{names, DomainEvent};

use crate::audit;
use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Wrong-password attempts allowed before the account locks.
const FAILED_ATTEMPT_LIMIT: i32 = 5;

/// How long a lockout lasts, in minutes.
const LOCKOUT_MINUTES: i64 = 15;

/// Lifetime of a password-reset token, in hours. Short on purpose: the
/// token lands in an inbox we do not control.
const RESET_TTL_HOURS: i64 = 2;

/// Lifetime of an email-verification token, in hours. Also used by the
/// admin handler when it sends the initial verification mail for a new
/// account.
pub(crate) const VERIFY_TOKEN_TTL_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// What the login form posts.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/refresh`: the opaque token from the last
/// [`AuthResponse`].
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Body of `POST /auth/password-reset/request`.
#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Body of `POST /auth/password-reset/confirm`: the emailed token plus the
/// replacement password.
#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

/// Body of `POST /auth/verify-email/confirm`.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailConfirm {
    pub token: String,
}

/// Token pair handed out by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until `access_token` expires.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// The slice of the account that is safe to echo back to the client.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Login / refresh / logout
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Check credentials and open a session. A fifth consecutive failure locks
/// the account for fifteen minutes; unknown usernames and wrong passwords
/// get the same 401 so the endpoint cannot confirm which usernames exist.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    ensure_active(&user)?;

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is locked. Try again later.".into(),
            )));
        }
    }

    let password_ok = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password check failed: {e}")))?;

    if !password_ok {
        register_failed_attempt(&state, &user).await?;
        return Err(invalid_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let role = resolve_role(&state, user.role_id).await?;

    audit::record(
        &state.pool,
        Some(user.id),
        actions::LOGIN,
        entity_types::USER,
        Some(user.id),
        None,
        None,
    )
    .await;

    Ok(Json(open_session(&state, &user, &role).await?))
}

/// POST /api/v1/auth/refresh
///
/// Trade a live refresh token for a fresh pair. The presented session is
/// revoked first, so each refresh token works exactly once.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let presented_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &presented_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Refresh token is invalid or expired".into(),
            ))
        })?;

    // Rotate before anything can fail below.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;

    ensure_active(&user)?;

    let role = resolve_role(&state, user.role_id).await?;

    Ok(Json(open_session(&state, &user, &role).await?))
}

/// POST /api/v1/auth/logout
///
/// Drop every session of the caller, not just the one behind the presented
/// access token. 204 on success.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;

    audit::record(
        &state.pool,
        Some(auth_user.user_id),
        actions::LOGOUT,
        entity_types::USER,
        Some(auth_user.user_id),
        None,
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/password-reset/request
///
/// Begin a reset by email address. The response is 204 whether or not the
/// address belongs to an account, so the endpoint cannot be used to probe
/// for registered addresses. A matching active account gets a single-use
/// token mailed to it.
pub async fn password_reset_request(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetRequest>,
) -> AppResult<StatusCode> {
    let Some(user) = UserRepo::find_by_email(&state.pool, &input.email).await? else {
        return Ok(StatusCode::NO_CONTENT);
    };
    if !user.is_active {
        return Ok(StatusCode::NO_CONTENT);
    }

    let token = generate_token();
    AuthTokenRepo::create(
        &state.pool,
        &CreateAuthToken {
            user_id: user.id,
            token_hash: token.hash,
            purpose: purposes::PASSWORD_RESET.to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(RESET_TTL_HOURS),
        },
    )
    .await?;

    match &state.mailer {
        Some(mailer) => {
            let link = format!(
                "{}/admin/reset-password?token={}",
                state.config.public_base_url, token.plaintext
            );
            // A delivery failure must not change the response, or the 204
            // contract would leak which addresses exist.
            if let Err(e) = mailer.send_password_reset_email(&user.email, &link).await {
                tracing::error!(error = %e, user_id = user.id, "Failed to send reset email");
            }
        }
        None => {
            tracing::warn!(user_id = user.id, "SMTP not configured, reset email skipped");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/password-reset/confirm
///
/// Finish a reset with the emailed token. The token is consumed, the new
/// hash stored, and every session of the account revoked so a thief who
/// had a refresh token is cut off too.
pub async fn password_reset_confirm(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetConfirm>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let token = AuthTokenRepo::find_valid(
        &state.pool,
        &hash_token(&input.token),
        purposes::PASSWORD_RESET,
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::Validation("Invalid or expired token".into())))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    AuthTokenRepo::mark_used(&state.pool, token.id).await?;
    UserRepo::set_password_hash(&state.pool, token.user_id, &hashed).await?;
    SessionRepo::revoke_all_for_user(&state.pool, token.user_id).await?;

    audit::record(
        &state.pool,
        Some(token.user_id),
        actions::PASSWORD_RESET,
        entity_types::USER,
        Some(token.user_id),
        None,
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Email verification
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/verify-email/request
///
/// Mail a fresh verification link to the caller's address. 409 when the
/// address is already verified.
pub async fn verify_email_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;

    if user.email_verified_at.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email address is already verified".into(),
        )));
    }

    let token = generate_token();
    AuthTokenRepo::create(
        &state.pool,
        &CreateAuthToken {
            user_id: user.id,
            token_hash: token.hash,
            purpose: purposes::EMAIL_VERIFICATION.to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(VERIFY_TOKEN_TTL_HOURS),
        },
    )
    .await?;

    let Some(mailer) = &state.mailer else {
        tracing::warn!(user_id = user.id, "SMTP not configured, verification email skipped");
        return Ok(StatusCode::NO_CONTENT);
    };

    let link = format!(
        "{}/admin/verify-email?token={}",
        state.config.public_base_url, token.plaintext
    );
    mailer
        .send_verification_email(&user.email, &link)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to send verification email: {e}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/verify-email/confirm
///
/// Redeem a verification token. Consumes the token and stamps
/// `email_verified_at`.
pub async fn verify_email_confirm(
    State(state): State<AppState>,
    Json(input): Json<VerifyEmailConfirm>,
) -> AppResult<StatusCode> {
    let token = AuthTokenRepo::find_valid(
        &state.pool,
        &hash_token(&input.token),
        purposes::EMAIL_VERIFICATION,
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::Validation("Invalid or expired token".into())))?;

    AuthTokenRepo::mark_used(&state.pool, token.id).await?;
    UserRepo::mark_email_verified(&state.pool, token.user_id).await?;

    audit::record(
        &state.pool,
        Some(token.user_id),
        actions::EMAIL_VERIFIED,
        entity_types::USER,
        Some(token.user_id),
        None,
        None,
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The deliberately vague 401 shared by unknown-username and wrong-password
/// failures.
fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

/// 403 for deactivated accounts. Checked on login and again on refresh, so
/// deactivation takes effect as soon as the current access token expires.
fn ensure_active(user: &User) -> AppResult<()> {
    if user.is_active {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )))
    }
}

/// Count a wrong password against the account and lock it at the limit.
/// The lockout itself is audited and announced on the event bus; individual
/// misses are not.
async fn register_failed_attempt(state: &AppState, user: &User) -> AppResult<()> {
    let failed_count = UserRepo::increment_failed_login(&state.pool, user.id).await?;
    if failed_count < FAILED_ATTEMPT_LIMIT {
        return Ok(());
    }

    let lock_until = Utc::now() + chrono::Duration::minutes(LOCKOUT_MINUTES);
    UserRepo::lock_account(&state.pool, user.id, lock_until).await?;

    audit::record(
        &state.pool,
        None,
        actions::LOCKOUT,
        entity_types::USER,
        Some(user.id),
        None,
        Some(format!("{failed_count} consecutive failed login attempts")),
    )
    .await;

    state.event_bus.publish(
        DomainEvent::new(names::AUTH_LOCKOUT)
            .with_entity(entity_types::USER, user.id)
            .with_payload(serde_json::json!({
                "username": user.username,
                "locked_until": lock_until,
            })),
    );

    Ok(())
}

/// Resolve a role id to its name, failing closed if the row is missing.
async fn resolve_role(state: &AppState, role_id: DbId) -> AppResult<String> {
    RoleRepo::resolve_name(&state.pool, role_id)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Unknown role id {role_id}")))
}

/// Mint an access token, persist a new session row for the refresh token,
/// and assemble the response body.
async fn open_session(state: &AppState, user: &User, role: &str) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Could not sign access token: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at: Utc::now()
                + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days),
            user_agent: None,
            ip_address: None,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserInfo {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: role.to_string(),
        },
    })
}
