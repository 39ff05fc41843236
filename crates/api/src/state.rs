use std::sync::Arc;

use redress_db::store::{ComplaintStore, MemoryStore, PgStore, UserStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Complaint persistence (PostgreSQL or in-memory).
    pub complaints: Arc<dyn ComplaintStore>,
    /// User persistence (PostgreSQL or in-memory).
    pub users: Arc<dyn UserStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// State backed by a PostgreSQL pool.
    pub fn with_postgres(pool: redress_db::DbPool, config: ServerConfig) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            complaints: store.clone(),
            users: store,
            config: Arc::new(config),
        }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(config: ServerConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            complaints: store.clone(),
            users: store,
            config: Arc::new(config),
        }
    }
}
