//! Request handlers.
//!
//! Handlers validate input through `redress_core`, run the ownership guard,
//! delegate persistence to the stores in [`AppState`](crate::state::AppState)
//! and map errors via [`AppError`](crate::error::AppError).

pub mod admin;
pub mod auth;
pub mod complaints;
pub mod users;
