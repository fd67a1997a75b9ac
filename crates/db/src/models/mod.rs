//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches, where the table
//!   supports partial updates

pub mod activity;
pub mod auth_token;
pub mod piece;
pub mod role;
pub mod session;
pub mod slug_redirect;
pub mod user;
