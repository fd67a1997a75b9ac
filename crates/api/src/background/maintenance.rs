//! Hourly maintenance sweep.
//!
//! One loop covers every kind of scheduled cleanup: trashed pieces past
//! their retention window, expired or revoked sessions, expired or used
//! auth tokens, and activity log rows past the retention horizon. Runs on
//! a fixed interval using `tokio::time::interval`.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use atelier_db::repositories::{ActivityRepo, AuthTokenRepo, SessionRepo, TrashRepo};

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Activity log retention in days. Entries older than this are dropped.
const ACTIVITY_RETENTION_DAYS: i64 = 365;

/// Run the maintenance loop until `cancel` is triggered.
///
/// `trash_retention_days` comes from server configuration; everything a
/// sweep deletes is unrecoverable, so each step logs what it removed.
pub async fn run(pool: PgPool, trash_retention_days: i64, cancel: CancellationToken) {
    tracing::info!(
        trash_retention_days,
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Maintenance sweep started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Maintenance sweep stopping");
                break;
            }
            _ = interval.tick() => {
                sweep(&pool, trash_retention_days).await;
            }
        }
    }
}

/// One pass over every cleanup target. Failures are logged per step so one
/// broken query does not stall the others.
async fn sweep(pool: &PgPool, trash_retention_days: i64) {
    match TrashRepo::purge_older_than(pool, trash_retention_days).await {
        Ok(purged) if purged > 0 => {
            tracing::info!(purged, "Maintenance: purged expired trash");
        }
        Ok(_) => tracing::debug!("Maintenance: no expired trash"),
        Err(e) => tracing::error!(error = %e, "Maintenance: trash purge failed"),
    }

    match SessionRepo::cleanup_expired(pool).await {
        Ok(deleted) if deleted > 0 => {
            tracing::info!(deleted, "Maintenance: dropped dead sessions");
        }
        Ok(_) => tracing::debug!("Maintenance: no dead sessions"),
        Err(e) => tracing::error!(error = %e, "Maintenance: session cleanup failed"),
    }

    match AuthTokenRepo::cleanup_expired(pool).await {
        Ok(deleted) if deleted > 0 => {
            tracing::info!(deleted, "Maintenance: dropped dead auth tokens");
        }
        Ok(_) => tracing::debug!("Maintenance: no dead auth tokens"),
        Err(e) => tracing::error!(error = %e, "Maintenance: token cleanup failed"),
    }

    let cutoff = Utc::now() - chrono::Duration::days(ACTIVITY_RETENTION_DAYS);
    match ActivityRepo::delete_older_than(pool, cutoff).await {
        Ok(deleted) if deleted > 0 => {
            tracing::info!(deleted, "Maintenance: trimmed activity log");
        }
        Ok(_) => tracing::debug!("Maintenance: activity log within retention"),
        Err(e) => tracing::error!(error = %e, "Maintenance: activity trim failed"),
    }
}
