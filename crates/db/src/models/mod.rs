//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs consumed by the API handlers

pub mod complaint;
pub mod user;
