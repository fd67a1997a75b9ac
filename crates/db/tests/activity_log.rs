//! Integration tests for the append-only activity log.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use atelier_core::activity::{actions, entity_types};
use atelier_db::models::activity::{ActivityQuery, CreateActivityEntry};
use atelier_db::models::user::CreateUser;
use atelier_db::repositories::{ActivityRepo, RoleRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn entry(action: &str, entity_id: i64) -> CreateActivityEntry {
    CreateActivityEntry {
        user_id: None,
        action: action.to_string(),
        entity_type: Some(entity_types::ART_PIECE.to_string()),
        entity_id: Some(entity_id),
        snapshot_json: Some(serde_json::json!({ "title": "Example" })),
        detail: None,
    }
}

// ---------------------------------------------------------------------------
// Insert and query
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn entries_come_back_newest_first(pool: PgPool) {
    for i in 1..=3 {
        ActivityRepo::insert(&pool, &entry(actions::UPDATE, i)).await.unwrap();
    }

    let entries = ActivityRepo::query(&pool, &ActivityQuery::default()).await.unwrap();
    assert_eq!(entries.len(), 3);
    assert!(
        entries[0].id > entries[1].id && entries[1].id > entries[2].id,
        "query orders by created_at descending"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn query_filters_compose(pool: PgPool) {
    let role = RoleRepo::find_by_name(&pool, "editor").await.unwrap().unwrap();
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            username: "auditor".to_string(),
            email: "auditor@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            role_id: role.id,
        },
    )
    .await
    .unwrap();

    ActivityRepo::insert(&pool, &entry(actions::CREATE, 10)).await.unwrap();
    ActivityRepo::insert(&pool, &entry(actions::TRASH, 10)).await.unwrap();
    let mut by_user = entry(actions::CREATE, 11);
    by_user.user_id = Some(user.id);
    ActivityRepo::insert(&pool, &by_user).await.unwrap();

    let creates = ActivityRepo::query(
        &pool,
        &ActivityQuery {
            action: Some(actions::CREATE.to_string()),
            ..ActivityQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(creates.len(), 2);

    let creates_by_user = ActivityRepo::query(
        &pool,
        &ActivityQuery {
            action: Some(actions::CREATE.to_string()),
            user_id: Some(user.id),
            ..ActivityQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(creates_by_user.len(), 1);
    assert_eq!(creates_by_user[0].entity_id, Some(11));

    let for_piece = ActivityRepo::query(
        &pool,
        &ActivityQuery {
            entity_type: Some(entity_types::ART_PIECE.to_string()),
            entity_id: Some(10),
            ..ActivityQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(for_piece.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn count_matches_filtered_total_ignoring_paging(pool: PgPool) {
    for i in 1..=5 {
        ActivityRepo::insert(&pool, &entry(actions::UPDATE, i)).await.unwrap();
    }

    let params = ActivityQuery {
        action: Some(actions::UPDATE.to_string()),
        limit: Some(2),
        offset: Some(2),
        ..ActivityQuery::default()
    };

    let page = ActivityRepo::query(&pool, &params).await.unwrap();
    assert_eq!(page.len(), 2);

    let total = ActivityRepo::count(&pool, &params).await.unwrap();
    assert_eq!(total, 5, "count reflects the filter, not the page");
}

#[sqlx::test(migrations = "./migrations")]
async fn limit_is_clamped_to_a_sane_range(pool: PgPool) {
    for i in 1..=3 {
        ActivityRepo::insert(&pool, &entry(actions::UPDATE, i)).await.unwrap();
    }

    let zero_limit = ActivityRepo::query(
        &pool,
        &ActivityQuery {
            limit: Some(0),
            ..ActivityQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(zero_limit.len(), 1, "limit 0 is clamped up to 1");

    let negative_offset = ActivityRepo::query(
        &pool,
        &ActivityQuery {
            offset: Some(-5),
            ..ActivityQuery::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(negative_offset.len(), 3, "negative offsets are treated as 0");
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_user_keeps_their_log_entries(pool: PgPool) {
    let role = RoleRepo::find_by_name(&pool, "editor").await.unwrap().unwrap();
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            username: "departed".to_string(),
            email: "departed@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            role_id: role.id,
        },
    )
    .await
    .unwrap();

    let mut by_user = entry(actions::CREATE, 1);
    by_user.user_id = Some(user.id);
    ActivityRepo::insert(&pool, &by_user).await.unwrap();

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let entries = ActivityRepo::query(&pool, &ActivityQuery::default()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].user_id, None, "user_id is nulled, not cascaded");
}

// ---------------------------------------------------------------------------
// Retention
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn retention_delete_respects_cutoff(pool: PgPool) {
    let old = ActivityRepo::insert(&pool, &entry(actions::CREATE, 1)).await.unwrap();
    ActivityRepo::insert(&pool, &entry(actions::UPDATE, 1)).await.unwrap();

    sqlx::query("UPDATE activity_log SET created_at = NOW() - INTERVAL '400 days' WHERE id = $1")
        .bind(old.id)
        .execute(&pool)
        .await
        .unwrap();

    let removed = ActivityRepo::delete_older_than(&pool, Utc::now() - Duration::days(365))
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let remaining = ActivityRepo::query(&pool, &ActivityQuery::default()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].action, actions::UPDATE);
}
