//! Domain error type shared by every layer above `core`.
//!
//! Variants correspond to the HTTP statuses the API hands out; the mapping
//! itself lives in the API crate so this one stays transport-free.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Lookup by numeric id came up empty.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Lookup by natural key (slug, username, token hash) came up empty.
    #[error("{entity} '{key}' not found")]
    NotFoundKey { entity: &'static str, key: String },

    /// Input rejected before touching storage.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request is well-formed but collides with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No usable credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role does not allow this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invariant breakage that is our bug, not the caller's.
    #[error("Internal error: {0}")]
    Internal(String),
}
