use crate::cache::AccountCache;
use crate::config::ServerConfig;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub cache: AccountCache,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, cache: AccountCache, config: ServerConfig) -> Self {
        Self {
            pool,
            cache,
            config: Arc::new(config),
        }
    }
}
