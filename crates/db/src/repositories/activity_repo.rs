//! Storage for the activity log.
//!
//! The table is append-only from the application's point of view: handlers
//! insert, admins query, and the maintenance sweep trims by age. The filter
//! set matches the admin UI (actor, action, entity, time range), assembled
//! dynamically since any combination may be present.

use sqlx::PgPool;

use atelier_core::types::Timestamp;

use crate::models::activity::{ActivityEntry, ActivityQuery, CreateActivityEntry};

const COLUMNS: &str =
    "id, user_id, action, entity_type, entity_id, snapshot_json, detail, created_at";

pub struct ActivityRepo;

impl ActivityRepo {
    /// Insert a new activity entry, returning the created row.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateActivityEntry,
    ) -> Result<ActivityEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_log (user_id, action, entity_type, entity_id, snapshot_json, detail)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(input.user_id)
            .bind(&input.action)
            .bind(&input.entity_type)
            .bind(input.entity_id)
            .bind(&input.snapshot_json)
            .bind(&input.detail)
            .fetch_one(pool)
            .await
    }

    /// Query activity entries with filtering and pagination, newest first.
    pub async fn query(
        pool: &PgPool,
        params: &ActivityQuery,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let limit = params.limit.unwrap_or(50).clamp(1, 200);
        let offset = params.offset.unwrap_or(0).max(0);

        let (where_clause, bind_values, bind_idx) = build_activity_filter(params);

        // id tiebreak keeps the order stable when timestamps collide.
        let query = format!(
            "SELECT {COLUMNS} FROM activity_log {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_activity_values(sqlx::query_as::<_, ActivityEntry>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count activity entries matching the given filter (for pagination
    /// metadata).
    pub async fn count(pool: &PgPool, params: &ActivityQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_activity_filter(params);

        let query = format!("SELECT COUNT(*)::BIGINT FROM activity_log {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for val in &bind_values {
            match val {
                BindValue::BigInt(v) => q = q.bind(*v),
                BindValue::Text(v) => q = q.bind(v.as_str()),
                BindValue::Timestamp(v) => q = q.bind(*v),
            }
        }
        q.fetch_one(pool).await
    }

    /// Delete entries older than the given cutoff. Returns the count of
    /// deleted rows.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM activity_log WHERE created_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// ---------------------------------------------------------------------------
// Dynamic filter assembly
// ---------------------------------------------------------------------------

/// A pending bind for a dynamically-assembled query. sqlx binds are typed,
/// so the values collected while building the WHERE clause need a carrier
/// that remembers which type each one was.
enum BindValue {
    BigInt(i64),
    Text(String),
    Timestamp(Timestamp),
}

/// Translate `ActivityQuery` into `(where_clause, bind_values, next_index)`.
///
/// The clause is empty when no filters are set; `next_index` is where the
/// caller's own binds (LIMIT/OFFSET) continue the numbering.
fn build_activity_filter(params: &ActivityQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(user_id) = params.user_id {
        conditions.push(format!("user_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(user_id));
    }

    if let Some(ref action) = params.action {
        conditions.push(format!("action = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(action.clone()));
    }

    if let Some(ref entity_type) = params.entity_type {
        conditions.push(format!("entity_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(entity_type.clone()));
    }

    if let Some(entity_id) = params.entity_id {
        conditions.push(format!("entity_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(entity_id));
    }

    if let Some(from) = params.from {
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.to {
        conditions.push(format!("created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Replay collected binds onto a `QueryAs` in WHERE-clause order.
fn bind_activity_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
