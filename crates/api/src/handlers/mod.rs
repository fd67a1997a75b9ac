//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `atelier_db`, map errors via
//! [`AppError`](crate::error::AppError), record activity log entries, and
//! publish domain events.

pub mod activity;
pub mod admin;
pub mod auth;
pub mod pages;
pub mod pieces;
pub mod redirects;
pub mod trash;
