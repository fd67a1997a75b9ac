//! Access and refresh token primitives for the admin API.
//!
//! Access tokens are short-lived HS256 JWTs carrying a [`Claims`] payload;
//! they travel in the `Authorization: Bearer` header and are verified on
//! every request. Refresh tokens are opaque random strings tracked in the
//! `user_sessions` table -- only their SHA-256 digest is stored, so a
//! database leak never yields a usable token.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atelier_core::token::{generate_token, sha256_hex};
use atelier_core::types::DbId;

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's database id.
    pub sub: DbId,
    /// Role name at issue time (`"admin"` or `"editor"`).
    pub role: String,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
    /// Issue time as a Unix timestamp.
    pub iat: i64,
    /// Per-token UUID, so individual tokens can be identified in audits.
    pub jti: String,
}

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret shared by signing and verification.
    pub secret: String,
    /// Access token lifetime in minutes.
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days.
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Read the JWT settings from the environment.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics when `JWT_SECRET` is missing or empty. An API signing tokens
    /// with a default secret would be worse than one that refuses to start.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        Self {
            secret,
            access_token_expiry_mins: env_i64("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS),
            refresh_token_expiry_days: env_i64(
                "JWT_REFRESH_EXPIRY_DAYS",
                DEFAULT_REFRESH_EXPIRY_DAYS,
            ),
        }
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be an integer, got '{raw}'")),
        Err(_) => default,
    }
}

/// Sign a fresh access token for `user_id` with the given role.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let issued_at = chrono::Utc::now();
    let expires_at = issued_at + chrono::Duration::minutes(config.access_token_expiry_mins);

    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: expires_at.timestamp(),
        iat: issued_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify a token's signature and expiry, returning its [`Claims`].
///
/// `jsonwebtoken` applies its default 60-second leeway to `exp`, which
/// absorbs clock skew between the server and whatever issued the token.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let verified = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(verified.claims)
}

/// Mint an opaque refresh token as `(plaintext, sha256_hex)`.
///
/// The plaintext goes to the client and is never stored; the digest is what
/// `user_sessions.refresh_token_hash` holds.
pub fn generate_refresh_token() -> (String, String) {
    let token = generate_token();
    (token.plaintext, token.hash)
}

/// Digest an incoming refresh token for lookup against the stored hash.
pub fn hash_refresh_token(token: &str) -> String {
    sha256_hex(token.as_bytes())
}
