//! Integration tests for user, session, and auth token storage.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use atelier_core::token::purposes;
use atelier_db::models::auth_token::CreateAuthToken;
use atelier_db::models::session::CreateSession;
use atelier_db::models::user::CreateUser;
use atelier_db::repositories::{AuthTokenRepo, RoleRepo, SessionRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_editor(pool: &PgPool, username: &str) -> atelier_db::models::user::User {
    let role = RoleRepo::find_by_name(pool, "editor")
        .await
        .unwrap()
        .expect("editor role is seeded by migrations");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            role_id: role.id,
        },
    )
    .await
    .unwrap()
}

fn session_input(user_id: i64, hash: &str, ttl_hours: i64) -> CreateSession {
    CreateSession {
        user_id,
        refresh_token_hash: hash.to_string(),
        expires_at: Utc::now() + Duration::hours(ttl_hours),
        user_agent: Some("test-agent".to_string()),
        ip_address: None,
    }
}

fn token_input(user_id: i64, hash: &str, purpose: &str, ttl_hours: i64) -> CreateAuthToken {
    CreateAuthToken {
        user_id,
        token_hash: hash.to_string(),
        purpose: purpose.to_string(),
        expires_at: Utc::now() + Duration::hours(ttl_hours),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn roles_are_seeded(pool: PgPool) {
    let roles = RoleRepo::list(&pool).await.unwrap();
    let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
    assert!(names.contains(&"admin"));
    assert!(names.contains(&"editor"));

    let admin = RoleRepo::find_by_name(&pool, "admin").await.unwrap().unwrap();
    assert_eq!(
        RoleRepo::resolve_name(&pool, admin.id).await.unwrap().as_deref(),
        Some("admin")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn failed_logins_accumulate_until_success(pool: PgPool) {
    let user = create_editor(&pool, "clumsy").await;
    assert_eq!(user.failed_login_count, 0);

    assert_eq!(UserRepo::increment_failed_login(&pool, user.id).await.unwrap(), 1);
    assert_eq!(UserRepo::increment_failed_login(&pool, user.id).await.unwrap(), 2);

    UserRepo::record_successful_login(&pool, user.id).await.unwrap();

    let refreshed = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(refreshed.failed_login_count, 0, "success resets the counter");
    assert!(refreshed.last_login_at.is_some());
    assert!(refreshed.locked_until.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn lock_account_sets_lockout_window(pool: PgPool) {
    let user = create_editor(&pool, "locked").await;
    let until = Utc::now() + Duration::minutes(15);

    UserRepo::lock_account(&pool, user.id, until).await.unwrap();

    let refreshed = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    let locked_until = refreshed.locked_until.expect("lockout timestamp set");
    assert!(locked_until > Utc::now());
}

#[sqlx::test(migrations = "./migrations")]
async fn mark_email_verified_is_single_shot(pool: PgPool) {
    let user = create_editor(&pool, "verifier").await;
    assert!(user.email_verified_at.is_none());

    assert!(UserRepo::mark_email_verified(&pool, user.id).await.unwrap());
    assert!(
        !UserRepo::mark_email_verified(&pool, user.id).await.unwrap(),
        "already-verified users are not re-stamped"
    );

    let refreshed = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(refreshed.email_verified_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn deactivate_flips_is_active(pool: PgPool) {
    let user = create_editor(&pool, "leaving").await;

    assert!(UserRepo::deactivate(&pool, user.id).await.unwrap());
    assert!(!UserRepo::deactivate(&pool, user.id).await.unwrap());

    let refreshed = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(!refreshed.is_active);
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn session_lookup_honors_revocation_and_expiry(pool: PgPool) {
    let user = create_editor(&pool, "sessions").await;

    let live = SessionRepo::create(&pool, &session_input(user.id, "hash-live", 24))
        .await
        .unwrap();
    SessionRepo::create(&pool, &session_input(user.id, "hash-stale", -1))
        .await
        .unwrap();
    let revoked = SessionRepo::create(&pool, &session_input(user.id, "hash-revoked", 24))
        .await
        .unwrap();
    SessionRepo::revoke(&pool, revoked.id).await.unwrap();

    let found = SessionRepo::find_by_refresh_token_hash(&pool, "hash-live")
        .await
        .unwrap();
    assert_eq!(found.unwrap().id, live.id);

    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "hash-stale")
        .await
        .unwrap()
        .is_none());
    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "hash-revoked")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn revoke_all_covers_every_session_of_the_user(pool: PgPool) {
    let user = create_editor(&pool, "everywhere").await;
    let other = create_editor(&pool, "bystander").await;

    SessionRepo::create(&pool, &session_input(user.id, "h1", 24)).await.unwrap();
    SessionRepo::create(&pool, &session_input(user.id, "h2", 24)).await.unwrap();
    SessionRepo::create(&pool, &session_input(other.id, "h3", 24)).await.unwrap();

    let revoked = SessionRepo::revoke_all_for_user(&pool, user.id).await.unwrap();
    assert_eq!(revoked, 2);

    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "h1").await.unwrap().is_none());
    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "h3").await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn cleanup_drops_expired_and_revoked_sessions(pool: PgPool) {
    let user = create_editor(&pool, "sweeper").await;

    SessionRepo::create(&pool, &session_input(user.id, "keep", 24)).await.unwrap();
    SessionRepo::create(&pool, &session_input(user.id, "old", -2)).await.unwrap();
    let dead = SessionRepo::create(&pool, &session_input(user.id, "dead", 24))
        .await
        .unwrap();
    SessionRepo::revoke(&pool, dead.id).await.unwrap();

    let removed = SessionRepo::cleanup_expired(&pool).await.unwrap();
    assert_eq!(removed, 2);

    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "keep").await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Auth tokens
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn new_token_invalidates_prior_unused_same_purpose(pool: PgPool) {
    let user = create_editor(&pool, "resetter").await;

    AuthTokenRepo::create(&pool, &token_input(user.id, "t1", purposes::PASSWORD_RESET, 2))
        .await
        .unwrap();
    AuthTokenRepo::create(&pool, &token_input(user.id, "t2", purposes::PASSWORD_RESET, 2))
        .await
        .unwrap();
    // A different purpose is untouched.
    AuthTokenRepo::create(&pool, &token_input(user.id, "v1", purposes::EMAIL_VERIFICATION, 24))
        .await
        .unwrap();

    assert!(
        AuthTokenRepo::find_valid(&pool, "t1", purposes::PASSWORD_RESET)
            .await
            .unwrap()
            .is_none(),
        "requesting a fresh token retires the previous one"
    );
    assert!(AuthTokenRepo::find_valid(&pool, "t2", purposes::PASSWORD_RESET)
        .await
        .unwrap()
        .is_some());
    assert!(AuthTokenRepo::find_valid(&pool, "v1", purposes::EMAIL_VERIFICATION)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn token_is_single_use(pool: PgPool) {
    let user = create_editor(&pool, "once").await;
    let token = AuthTokenRepo::create(
        &pool,
        &token_input(user.id, "single", purposes::EMAIL_VERIFICATION, 24),
    )
    .await
    .unwrap();

    assert!(AuthTokenRepo::mark_used(&pool, token.id).await.unwrap());
    assert!(!AuthTokenRepo::mark_used(&pool, token.id).await.unwrap());

    assert!(AuthTokenRepo::find_valid(&pool, "single", purposes::EMAIL_VERIFICATION)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn expired_token_is_not_valid(pool: PgPool) {
    let user = create_editor(&pool, "late").await;
    AuthTokenRepo::create(&pool, &token_input(user.id, "expired", purposes::PASSWORD_RESET, -1))
        .await
        .unwrap();

    assert!(AuthTokenRepo::find_valid(&pool, "expired", purposes::PASSWORD_RESET)
        .await
        .unwrap()
        .is_none());

    let removed = AuthTokenRepo::cleanup_expired(&pool).await.unwrap();
    assert_eq!(removed, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn find_valid_requires_matching_purpose(pool: PgPool) {
    let user = create_editor(&pool, "crossed").await;
    AuthTokenRepo::create(&pool, &token_input(user.id, "vtok", purposes::EMAIL_VERIFICATION, 24))
        .await
        .unwrap();

    assert!(
        AuthTokenRepo::find_valid(&pool, "vtok", purposes::PASSWORD_RESET)
            .await
            .unwrap()
            .is_none(),
        "a verification token must not reset passwords"
    );
}
