//! Integration tests for art piece soft-delete, restore, and purge.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Trashed pieces are hidden from `find_by_id`, `list`, and slug lookups
//! - Soft-delete is idempotent (second call returns `false`)
//! - Restore brings a piece back, demoting published pieces to draft
//! - Purge removes the row and its slug redirects, in FK order
//! - The retention sweep only removes pieces older than the cutoff

use sqlx::PgPool;

use atelier_db::models::piece::{CreatePiece, PieceFilter};
use atelier_db::repositories::{PieceRepo, SlugRedirectRepo, TrashRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_piece(slug: &str) -> CreatePiece {
    CreatePiece {
        art_type: "aframe".to_string(),
        title: "Test Piece".to_string(),
        slug: slug.to_string(),
        description: String::new(),
        config_json: serde_json::json!({ "shapes": [] }),
        status: "draft".to_string(),
        created_by: None,
    }
}

// ---------------------------------------------------------------------------
// Soft delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn soft_delete_hides_piece_from_reads(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("hidden")).await.unwrap();

    let deleted = PieceRepo::soft_delete(&pool, piece.id).await.unwrap();
    assert!(deleted, "soft_delete should return true on first call");

    assert!(PieceRepo::find_by_id(&pool, piece.id)
        .await
        .unwrap()
        .is_none());
    assert!(PieceRepo::find_by_slug(&pool, "aframe", "hidden")
        .await
        .unwrap()
        .is_none());

    let listed = PieceRepo::list(&pool, &PieceFilter::default()).await.unwrap();
    assert!(!listed.iter().any(|p| p.id == piece.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn soft_delete_is_idempotent(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("twice")).await.unwrap();

    assert!(PieceRepo::soft_delete(&pool, piece.id).await.unwrap());
    assert!(
        !PieceRepo::soft_delete(&pool, piece.id).await.unwrap(),
        "second soft_delete should report false"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn trashed_slug_stays_reserved(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("reserved")).await.unwrap();
    PieceRepo::soft_delete(&pool, piece.id).await.unwrap();

    assert!(
        PieceRepo::slug_exists(&pool, "aframe", "reserved").await.unwrap(),
        "trashed pieces still hold their slug"
    );
    // Same slug under another art type is free.
    assert!(!PieceRepo::slug_exists(&pool, "three", "reserved").await.unwrap());
}

// ---------------------------------------------------------------------------
// Restore
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn restore_makes_piece_visible_again(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("restore-me")).await.unwrap();
    PieceRepo::soft_delete(&pool, piece.id).await.unwrap();

    let restored = PieceRepo::restore(&pool, piece.id).await.unwrap();
    assert!(restored, "restore should return true");

    let found = PieceRepo::find_by_id(&pool, piece.id).await.unwrap();
    assert_eq!(found.unwrap().slug, "restore-me");
}

#[sqlx::test(migrations = "./migrations")]
async fn restore_demotes_published_piece_to_draft(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("was-live")).await.unwrap();
    PieceRepo::set_status(&pool, piece.id, "published").await.unwrap();
    PieceRepo::soft_delete(&pool, piece.id).await.unwrap();

    PieceRepo::restore(&pool, piece.id).await.unwrap();

    let restored = PieceRepo::find_by_id(&pool, piece.id).await.unwrap().unwrap();
    assert_eq!(
        restored.status, "draft",
        "publication must not resume silently after the trash"
    );
    assert!(
        restored.published_at.is_some(),
        "original publication date is kept"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn restore_of_live_piece_reports_false(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("never-trashed")).await.unwrap();
    assert!(!PieceRepo::restore(&pool, piece.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Trash listing and purge
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn trash_lists_only_trashed_pieces(pool: PgPool) {
    let keep = PieceRepo::create(&pool, &new_piece("keep")).await.unwrap();
    let toss = PieceRepo::create(&pool, &new_piece("toss")).await.unwrap();
    PieceRepo::soft_delete(&pool, toss.id).await.unwrap();

    let trashed = TrashRepo::list_trashed(&pool).await.unwrap();
    assert_eq!(trashed.len(), 1);
    assert_eq!(trashed[0].id, toss.id);
    assert!(TrashRepo::find_trashed(&pool, keep.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn purge_one_removes_row_and_redirects(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("current")).await.unwrap();
    SlugRedirectRepo::record(&pool, "aframe", "former", piece.id)
        .await
        .unwrap();
    PieceRepo::soft_delete(&pool, piece.id).await.unwrap();

    let purged = TrashRepo::purge_one(&pool, piece.id).await.unwrap();
    assert!(purged);

    assert!(TrashRepo::find_trashed(&pool, piece.id).await.unwrap().is_none());
    assert!(
        SlugRedirectRepo::resolve(&pool, "aframe", "former").await.unwrap().is_none(),
        "redirects must not outlive the piece"
    );
    // The slug is free again after a purge.
    assert!(!PieceRepo::slug_exists(&pool, "aframe", "current").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn purge_one_refuses_live_pieces(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("still-live")).await.unwrap();

    assert!(!TrashRepo::purge_one(&pool, piece.id).await.unwrap());
    assert!(PieceRepo::find_by_id(&pool, piece.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn purge_all_empties_the_trash(pool: PgPool) {
    let a = PieceRepo::create(&pool, &new_piece("a")).await.unwrap();
    let b = PieceRepo::create(&pool, &new_piece("b")).await.unwrap();
    let live = PieceRepo::create(&pool, &new_piece("live")).await.unwrap();
    PieceRepo::soft_delete(&pool, a.id).await.unwrap();
    PieceRepo::soft_delete(&pool, b.id).await.unwrap();

    let purged = TrashRepo::purge_all(&pool).await.unwrap();
    assert_eq!(purged, 2);

    assert!(TrashRepo::list_trashed(&pool).await.unwrap().is_empty());
    assert!(PieceRepo::find_by_id(&pool, live.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn retention_sweep_only_purges_old_pieces(pool: PgPool) {
    let old = PieceRepo::create(&pool, &new_piece("old")).await.unwrap();
    let fresh = PieceRepo::create(&pool, &new_piece("fresh")).await.unwrap();
    PieceRepo::soft_delete(&pool, old.id).await.unwrap();
    PieceRepo::soft_delete(&pool, fresh.id).await.unwrap();

    // Age the first piece past the retention window.
    sqlx::query("UPDATE art_pieces SET deleted_at = NOW() - INTERVAL '40 days' WHERE id = $1")
        .bind(old.id)
        .execute(&pool)
        .await
        .unwrap();

    let purged = TrashRepo::purge_older_than(&pool, 30).await.unwrap();
    assert_eq!(purged, 1);

    assert!(TrashRepo::find_trashed(&pool, old.id).await.unwrap().is_none());
    assert!(TrashRepo::find_trashed(&pool, fresh.id).await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Publication bookkeeping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn first_publish_stamps_published_at_once(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("stamp")).await.unwrap();
    assert!(piece.published_at.is_none());

    let published = PieceRepo::set_status(&pool, piece.id, "published")
        .await
        .unwrap()
        .unwrap();
    let first_stamp = published.published_at.expect("publish stamps published_at");

    let drafted = PieceRepo::set_status(&pool, piece.id, "draft").await.unwrap().unwrap();
    assert_eq!(drafted.published_at, Some(first_stamp));

    let republished = PieceRepo::set_status(&pool, piece.id, "published")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        republished.published_at,
        Some(first_stamp),
        "republish keeps the original publication date"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_type_and_status(pool: PgPool) {
    let a = PieceRepo::create(&pool, &new_piece("af")).await.unwrap();
    let mut three = new_piece("th");
    three.art_type = "three".to_string();
    let t = PieceRepo::create(&pool, &three).await.unwrap();
    PieceRepo::set_status(&pool, t.id, "published").await.unwrap();

    let aframe_only = PieceRepo::list(
        &pool,
        &PieceFilter {
            art_type: Some("aframe".to_string()),
            status: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(aframe_only.len(), 1);
    assert_eq!(aframe_only[0].id, a.id);

    let published_only = PieceRepo::list(
        &pool,
        &PieceFilter {
            art_type: None,
            status: Some("published".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(published_only.len(), 1);
    assert_eq!(published_only[0].id, t.id);

    let gallery = PieceRepo::list_published(&pool).await.unwrap();
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery[0].id, t.id);
}
