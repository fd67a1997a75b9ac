//! Activity log entity model and DTOs.
//!
//! The activity log is the append-only audit trail of admin actions. Rows
//! are immutable once written (no `updated_at`). Snapshots are redacted by
//! `atelier_core::activity::redact_snapshot` before they reach the insert.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atelier_core::types::{DbId, Timestamp};

/// A single activity log entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityEntry {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub snapshot_json: Option<serde_json::Value>,
    pub detail: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new activity log entry.
#[derive(Debug, Clone)]
pub struct CreateActivityEntry {
    pub user_id: Option<DbId>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub snapshot_json: Option<serde_json::Value>,
    pub detail: Option<String>,
}

/// Filter parameters for querying the activity log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityQuery {
    pub user_id: Option<DbId>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
