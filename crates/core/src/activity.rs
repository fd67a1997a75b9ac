//! Activity log constants and snapshot redaction.
//!
//! Every admin mutation writes one `activity_log` row carrying the action
//! name, the affected entity, and a JSON snapshot of the entity after the
//! change. Snapshots pass through [`redact_snapshot`] before storage so
//! credential material never lands in the log.

// ---------------------------------------------------------------------------
// Action name constants
// ---------------------------------------------------------------------------

/// Known action names for activity log entries.
pub mod actions {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const TRASH: &str = "trash";
    pub const RESTORE: &str = "restore";
    pub const PURGE: &str = "purge";
    pub const PUBLISH: &str = "publish";
    pub const UNPUBLISH: &str = "unpublish";
    pub const ARCHIVE: &str = "archive";
    pub const LOGIN: &str = "login";
    pub const LOGOUT: &str = "logout";
    pub const LOCKOUT: &str = "lockout";
    pub const PASSWORD_RESET: &str = "password_reset";
    pub const EMAIL_VERIFIED: &str = "email_verified";
    pub const DEACTIVATE: &str = "deactivate";
}

// ---------------------------------------------------------------------------
// Entity type constants
// ---------------------------------------------------------------------------

/// Known entity types referenced by activity log entries.
pub mod entity_types {
    pub const ART_PIECE: &str = "art_piece";
    pub const USER: &str = "user";
    pub const SLUG_REDIRECT: &str = "slug_redirect";
}

// ---------------------------------------------------------------------------
// Snapshot redaction
// ---------------------------------------------------------------------------

/// Key fragments whose values are redacted from snapshots before storage.
/// Matching is by lowercase substring, so `password_hash` and
/// `refresh_token_hash` are caught by `password` and `token`.
pub const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "token",
    "secret",
    "hash",
    "authorization",
    "credential",
];

/// Redact sensitive fields from a JSON snapshot, recursively.
///
/// Replaces the value of any key matching [`SENSITIVE_KEYS`] with
/// `"[REDACTED]"` and returns a new `serde_json::Value`.
pub fn redact_snapshot(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_KEYS.iter().any(|k| lower_key.contains(k)) {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_snapshot(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_snapshot).collect())
        }
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_top_level_sensitive_keys() {
        let snapshot = json!({
            "username": "nika",
            "password_hash": "$argon2id$v=19$...",
        });
        let redacted = redact_snapshot(&snapshot);
        assert_eq!(redacted["username"], "nika");
        assert_eq!(redacted["password_hash"], "[REDACTED]");
    }

    #[test]
    fn redacts_nested_objects_and_arrays() {
        let snapshot = json!({
            "sessions": [
                { "refresh_token_hash": "abc", "user_agent": "curl" }
            ],
            "meta": { "api_secret": "xyz" }
        });
        let redacted = redact_snapshot(&snapshot);
        assert_eq!(redacted["sessions"][0]["refresh_token_hash"], "[REDACTED]");
        assert_eq!(redacted["sessions"][0]["user_agent"], "curl");
        assert_eq!(redacted["meta"]["api_secret"], "[REDACTED]");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let snapshot = json!({ "Password": "hunter2" });
        assert_eq!(redact_snapshot(&snapshot)["Password"], "[REDACTED]");
    }

    #[test]
    fn non_sensitive_snapshot_is_unchanged() {
        let snapshot = json!({
            "title": "Spinning Torus",
            "slug": "spinning-torus",
            "config_json": { "shapes": [{ "kind": "torus" }] }
        });
        assert_eq!(redact_snapshot(&snapshot), snapshot);
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(redact_snapshot(&json!(42)), json!(42));
        assert_eq!(redact_snapshot(&json!(null)), json!(null));
    }
}
