//! Activity log recording.
//!
//! Thin wrapper around [`ActivityRepo`] that applies snapshot redaction and
//! swallows insert failures. A lost audit row is logged loudly but must not
//! turn an otherwise successful state change into a 500.

use serde_json::Value;

use atelier_core::activity::redact_snapshot;
use atelier_core::types::DbId;
use atelier_db::models::activity::CreateActivityEntry;
use atelier_db::repositories::ActivityRepo;
use atelier_db::DbPool;

/// Record one activity log entry.
///
/// `action` is one of `atelier_core::activity::actions`, `entity_type` one
/// of `atelier_core::activity::entity_types`. The snapshot is redacted
/// before it is written.
pub async fn record(
    pool: &DbPool,
    user_id: Option<DbId>,
    action: &str,
    entity_type: &str,
    entity_id: Option<DbId>,
    snapshot: Option<Value>,
    detail: Option<String>,
) {
    let entry = CreateActivityEntry {
        user_id,
        action: action.to_string(),
        entity_type: Some(entity_type.to_string()),
        entity_id,
        snapshot_json: snapshot.map(|s| redact_snapshot(&s)),
        detail,
    };

    if let Err(e) = ActivityRepo::insert(pool, &entry).await {
        tracing::error!(error = %e, action, entity_type, "Failed to write activity log entry");
    }
}
