//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or any executor, inside transactions) as the
//! first argument.

pub mod comment_repo;
pub mod complaint_repo;
pub mod status_history_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use complaint_repo::ComplaintRepo;
pub use status_history_repo::StatusHistoryRepo;
pub use user_repo::UserRepo;
