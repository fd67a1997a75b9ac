//! One repository per table, each a zero-sized struct of async methods
//! taking `&PgPool`. No repository holds state; transactions, where needed,
//! are sequenced inside the individual methods.

pub mod activity_repo;
pub mod auth_token_repo;
pub mod piece_repo;
pub mod role_repo;
pub mod session_repo;
pub mod slug_redirect_repo;
pub mod trash_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use auth_token_repo::AuthTokenRepo;
pub use piece_repo::PieceRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use slug_redirect_repo::SlugRedirectRepo;
pub use trash_repo::TrashRepo;
pub use user_repo::UserRepo;
