//! Library crate behind the `atelier-api` binary. Everything the server
//! is made of lives here as a public module so the integration tests can
//! assemble the same router the binary runs.

pub mod audit;
pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
