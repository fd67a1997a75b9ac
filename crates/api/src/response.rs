//! Response envelopes shared by the JSON handlers.
//!
//! Single resources go out as `{ "data": ... }`, listings as
//! `{ "items": [...], "total": n }`. Typed wrappers keep the shape uniform
//! without `serde_json::json!` scattered through the handlers.

use serde::Serialize;

/// `{ "data": T }` around a single resource.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "items": [...], "total": n }` around a page of a filtered listing.
/// `total` counts the whole filtered set, not the returned page, so clients
/// can render pagination.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
}
