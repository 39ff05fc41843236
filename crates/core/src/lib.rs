//! Domain core for the Redress complaint desk.
//!
//! Pure logic only: no database, no HTTP. The `db` and `api` crates build
//! on these types.

pub mod access;
pub mod account;
pub mod comment;
pub mod complaint;
pub mod error;
pub mod lifecycle;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod validation;
