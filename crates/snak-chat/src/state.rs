use crate::client::AccountClient;
use crate::config::ChatConfig;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub accounts: AccountClient,
    pub config: Arc<ChatConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, accounts: AccountClient, config: ChatConfig) -> Self {
        Self {
            pool,
            accounts,
            config: Arc::new(config),
        }
    }
}
