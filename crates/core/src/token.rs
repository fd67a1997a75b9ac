//! Opaque token generation and hashing.
//!
//! Email verification and password reset links carry a random token whose
//! SHA-256 digest is stored in `auth_tokens`. The plaintext appears once in
//! the outgoing email and is never persisted; redemption hashes the
//! presented token and looks the digest up.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a generated token string (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 48;

/// Token purposes matching the `auth_tokens.purpose` column.
pub mod purposes {
    pub const EMAIL_VERIFICATION: &str = "email_verification";
    pub const PASSWORD_RESET: &str = "password_reset";
}

/// The result of generating a new opaque token.
pub struct GeneratedToken {
    /// The plaintext token (emailed to the user, never stored).
    pub plaintext: String,
    /// The SHA-256 hex digest of the plaintext (stored in the database).
    pub hash: String,
}

/// Generate a new random opaque token.
pub fn generate_token() -> GeneratedToken {
    let plaintext: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let hash = hash_token(&plaintext);

    GeneratedToken { plaintext, hash }
}

/// Compute the SHA-256 hex digest of a token for storage or lookup.
pub fn hash_token(token: &str) -> String {
    sha256_hex(token.as_bytes())
}

/// SHA-256 hex digest of arbitrary bytes. Refresh-token storage uses this
/// directly; everything else goes through [`hash_token`].
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    format!("{digest:x}")
}
