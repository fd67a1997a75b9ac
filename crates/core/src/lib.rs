//! Pure domain logic for the atelier platform.
//!
//! Everything in this crate is side-effect free (no database, no IO, no
//! async) so it can be used by the repository layer, the HTTP handlers, and
//! any future CLI tooling without dragging in the server stack.

pub mod activity;
pub mod error;
pub mod markup;
pub mod piece;
pub mod roles;
pub mod scene;
pub mod slug;
pub mod token;
pub mod types;
