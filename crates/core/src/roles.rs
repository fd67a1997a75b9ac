//! The two role names the backend knows.
//!
//! Kept in sync with the rows seeded by
//! `20260301000001_create_roles_table.sql`; JWT claims and the RBAC
//! extractors compare against these strings.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
