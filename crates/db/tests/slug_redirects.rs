//! Integration tests for slug uniqueness and redirect resolution.

use sqlx::PgPool;

use atelier_db::models::piece::{CreatePiece, UpdatePiece};
use atelier_db::repositories::{PieceRepo, SlugRedirectRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_piece(art_type: &str, slug: &str) -> CreatePiece {
    CreatePiece {
        art_type: art_type.to_string(),
        title: slug.to_string(),
        slug: slug.to_string(),
        description: String::new(),
        config_json: serde_json::json!({ "shapes": [] }),
        status: "draft".to_string(),
        created_by: None,
    }
}

fn slug_update(slug: &str) -> UpdatePiece {
    UpdatePiece {
        slug: Some(slug.to_string()),
        ..UpdatePiece::default()
    }
}

// ---------------------------------------------------------------------------
// Uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_slug_per_type_is_rejected(pool: PgPool) {
    PieceRepo::create(&pool, &new_piece("p5", "waves")).await.unwrap();

    let err = PieceRepo::create(&pool, &new_piece("p5", "waves")).await.unwrap_err();
    let db_err = err.as_database_error().expect("unique violation");
    assert_eq!(db_err.constraint(), Some("uq_art_pieces_type_slug"));

    // The same slug is fine under a different art type.
    PieceRepo::create(&pool, &new_piece("c2", "waves")).await.unwrap();
}

// ---------------------------------------------------------------------------
// Redirect recording and resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn rename_redirect_resolves_to_current_slug(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("aframe", "first")).await.unwrap();

    PieceRepo::update(&pool, piece.id, &slug_update("second")).await.unwrap();
    SlugRedirectRepo::record(&pool, "aframe", "first", piece.id).await.unwrap();

    let resolved = SlugRedirectRepo::resolve(&pool, "aframe", "first").await.unwrap();
    assert_eq!(resolved.as_deref(), Some("second"));
}

#[sqlx::test(migrations = "./migrations")]
async fn redirect_chain_collapses_to_one_hop(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("aframe", "v1")).await.unwrap();

    PieceRepo::update(&pool, piece.id, &slug_update("v2")).await.unwrap();
    SlugRedirectRepo::record(&pool, "aframe", "v1", piece.id).await.unwrap();

    PieceRepo::update(&pool, piece.id, &slug_update("v3")).await.unwrap();
    SlugRedirectRepo::record(&pool, "aframe", "v2", piece.id).await.unwrap();

    // Both stale slugs point straight at the piece, so both resolve to the
    // newest slug without hopping through intermediate redirects.
    assert_eq!(
        SlugRedirectRepo::resolve(&pool, "aframe", "v1").await.unwrap().as_deref(),
        Some("v3")
    );
    assert_eq!(
        SlugRedirectRepo::resolve(&pool, "aframe", "v2").await.unwrap().as_deref(),
        Some("v3")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn redirect_upsert_repoints_existing_row(pool: PgPool) {
    let old = PieceRepo::create(&pool, &new_piece("three", "shared")).await.unwrap();
    PieceRepo::update(&pool, old.id, &slug_update("shared-moved")).await.unwrap();
    SlugRedirectRepo::record(&pool, "three", "shared", old.id).await.unwrap();

    // A new piece claims the freed slug and later renames away from it too.
    let new = PieceRepo::create(&pool, &new_piece("three", "shared")).await.unwrap();
    PieceRepo::update(&pool, new.id, &slug_update("shared-final")).await.unwrap();
    SlugRedirectRepo::record(&pool, "three", "shared", new.id).await.unwrap();

    assert_eq!(
        SlugRedirectRepo::resolve(&pool, "three", "shared").await.unwrap().as_deref(),
        Some("shared-final"),
        "the redirect row is repointed, not duplicated"
    );

    let all = SlugRedirectRepo::list(&pool).await.unwrap();
    let for_slug: Vec<_> = all.iter().filter(|r| r.old_slug == "shared").collect();
    assert_eq!(for_slug.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn resolve_ignores_trashed_targets(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("c2", "gone")).await.unwrap();
    PieceRepo::update(&pool, piece.id, &slug_update("gone-now")).await.unwrap();
    SlugRedirectRepo::record(&pool, "c2", "gone", piece.id).await.unwrap();

    PieceRepo::soft_delete(&pool, piece.id).await.unwrap();

    assert!(
        SlugRedirectRepo::resolve(&pool, "c2", "gone").await.unwrap().is_none(),
        "redirects to trashed pieces act like missing pages"
    );
}

// ---------------------------------------------------------------------------
// Redirect cleanup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn reclaiming_a_slug_deletes_the_shadowing_redirect(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("p5", "orbit")).await.unwrap();
    PieceRepo::update(&pool, piece.id, &slug_update("orbit-2")).await.unwrap();
    SlugRedirectRepo::record(&pool, "p5", "orbit", piece.id).await.unwrap();

    // Renaming back to the old slug makes the redirect self-referential, so
    // the caller drops it. Resolution for the slug then falls to the piece.
    PieceRepo::update(&pool, piece.id, &slug_update("orbit")).await.unwrap();
    let removed = SlugRedirectRepo::delete_for_slug(&pool, "p5", "orbit").await.unwrap();
    assert!(removed);

    assert!(SlugRedirectRepo::resolve(&pool, "p5", "orbit").await.unwrap().is_none());
    let live = PieceRepo::find_by_slug(&pool, "p5", "orbit").await.unwrap();
    assert_eq!(live.unwrap().id, piece.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_for_piece_removes_all_its_redirects(pool: PgPool) {
    let piece = PieceRepo::create(&pool, &new_piece("aframe", "s1")).await.unwrap();
    PieceRepo::update(&pool, piece.id, &slug_update("s2")).await.unwrap();
    SlugRedirectRepo::record(&pool, "aframe", "s1", piece.id).await.unwrap();
    PieceRepo::update(&pool, piece.id, &slug_update("s3")).await.unwrap();
    SlugRedirectRepo::record(&pool, "aframe", "s2", piece.id).await.unwrap();

    let removed = SlugRedirectRepo::delete_for_piece(&pool, piece.id).await.unwrap();
    assert_eq!(removed, 2);
    assert!(SlugRedirectRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_missing_redirect_reports_false(pool: PgPool) {
    assert!(!SlugRedirectRepo::delete(&pool, 9999).await.unwrap());
    assert!(!SlugRedirectRepo::delete_for_slug(&pool, "aframe", "nope").await.unwrap());
}
