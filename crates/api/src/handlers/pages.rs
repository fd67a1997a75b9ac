//! Public HTML pages: the gallery index and the per-piece art pages.
//!
//! These routes are unauthenticated. Only published pieces are visible;
//! drafts and archived pieces 404 here exactly like pieces that never
//! existed, so URLs leak nothing about unpublished work.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use atelier_core::markup::{escape_attr, escape_html, page, render_piece_page};
use atelier_core::piece::ArtType;
use atelier_db::repositories::{PieceRepo, SlugRedirectRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// Head fragment for the framed pages (gallery, 404). Art piece pages are
/// full-screen scenes and skip the site stylesheet.
const SITE_HEAD: &str = "<link rel=\"stylesheet\" href=\"/static/site.css\">";

/// GET /
///
/// Gallery index listing every published piece with its type badge.
pub async fn gallery(State(state): State<AppState>) -> AppResult<Html<String>> {
    let pieces = PieceRepo::list_published(&state.pool).await?;

    let mut items = String::new();
    for piece in &pieces {
        let badge = match ArtType::from_str_db(&piece.art_type) {
            Ok(t) => t.display_name(),
            Err(_) => continue,
        };
        items.push_str(&format!(
            "<li><a href=\"/art/{}/{}\">{}</a> <span class=\"badge\">{}</span></li>\n",
            escape_attr(&piece.art_type),
            escape_attr(&piece.slug),
            escape_html(&piece.title),
            escape_html(badge),
        ));
    }

    let body = if items.is_empty() {
        "<h1>Gallery</h1>\n<p>Nothing here yet.</p>".to_string()
    } else {
        format!("<h1>Gallery</h1>\n<ul class=\"gallery\">\n{items}</ul>")
    };

    Ok(Html(page("Gallery", SITE_HEAD, &body)))
}

/// GET /art/{type}/{slug}
///
/// Resolution order: a live published piece renders its page; a known old
/// slug answers 301 to the current URL; anything else is 404. Unknown art
/// types 404 without touching the database.
pub async fn art_page(
    State(state): State<AppState>,
    Path((art_type, slug)): Path<(String, String)>,
) -> AppResult<Response> {
    let Ok(parsed) = ArtType::from_str_db(&art_type) else {
        return Ok(not_found_page());
    };

    if let Some(piece) = PieceRepo::find_published_by_slug(&state.pool, parsed.as_str(), &slug).await?
    {
        let html = render_piece_page(&piece.title, parsed, &piece.config_json)?;
        return Ok(Html(html).into_response());
    }

    if let Some(current) = SlugRedirectRepo::resolve(&state.pool, parsed.as_str(), &slug).await? {
        return Ok(moved_permanently(&format!(
            "/art/{}/{current}",
            parsed.as_str()
        )));
    }

    Ok(not_found_page())
}

/// Plain 301 response. Built by hand since [`axum::response::Redirect`]
/// prefers 308, and crawlers that indexed the old URLs expect 301.
fn moved_permanently(location: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

/// Minimal HTML 404 in the same shell as every other public page.
fn not_found_page() -> Response {
    let body = "<h1>Not found</h1>\n<p>This piece does not exist. <a href=\"/\">Back to the gallery.</a></p>";
    (StatusCode::NOT_FOUND, Html(page("Not found", SITE_HEAD, body))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moved_permanently_sets_301_and_location() {
        let response = moved_permanently("/art/aframe/new-slug");
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/art/aframe/new-slug"
        );
    }

    #[test]
    fn not_found_page_is_html() {
        let response = not_found_page();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }
}
