use deadpool_redis::{Pool, Runtime};
use redis::AsyncCommands;
use snak_common::models::account::AccountSnapshot;
use std::time::Duration;

const USER_KEY_PREFIX: &str = "user:";
const USERS_ALL_KEY: &str = "users:all";

/// Redis-backed snapshot cache in front of the account store.
///
/// The cache is a pure accelerator: every redis failure (no connection,
/// command error, undecodable payload) degrades to a miss or a no-op and is
/// never surfaced to the caller. Expiry is enforced server-side via SET EX,
/// so an expired entry is indistinguishable from one that was never cached.
#[derive(Clone)]
pub struct AccountCache {
    pool: Pool,
    user_ttl: Duration,
    all_ttl: Duration,
}

impl AccountCache {
    pub fn new(url: &str, user_ttl: Duration, all_ttl: Duration) -> anyhow::Result<Self> {
        let pool = deadpool_redis::Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| anyhow::anyhow!("Failed to create redis pool: {}", e))?;
        Ok(Self {
            pool,
            user_ttl,
            all_ttl,
        })
    }

    pub async fn get_user(&self, id: i64) -> Option<AccountSnapshot> {
        self.get_json(&format!("{}{}", USER_KEY_PREFIX, id)).await
    }

    pub async fn put_user(&self, snapshot: &AccountSnapshot) {
        self.put_json(
            &format!("{}{}", USER_KEY_PREFIX, snapshot.id),
            snapshot,
            self.user_ttl,
        )
        .await;
    }

    pub async fn get_all(&self) -> Option<Vec<AccountSnapshot>> {
        self.get_json(USERS_ALL_KEY).await
    }

    pub async fn put_all(&self, snapshots: &[AccountSnapshot]) {
        self.put_json(USERS_ALL_KEY, &snapshots, self.all_ttl).await;
    }

    /// Drop the single-account entry and the aggregate list. Called on every
    /// account mutation so reads inside the TTL window never see stale data.
    pub async fn invalidate_user(&self, id: i64) {
        self.del(&format!("{}{}", USER_KEY_PREFIX, id)).await;
        self.del(USERS_ALL_KEY).await;
    }

    /// Drop only the aggregate list; registration makes it stale without
    /// touching any single-account entry.
    pub async fn invalidate_all(&self) {
        self.del(USERS_ALL_KEY).await;
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = match self.pool.get().await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to get redis connection");
                return None;
            }
        };
        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    tracing::debug!(key = %key, "cache hit");
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(key = %key, "cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis GET error");
                None
            }
        }
    }

    async fn put_json<T: serde::Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to serialize cache entry");
                return;
            }
        };
        let mut conn = match self.pool.get().await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to get redis connection");
                return;
            }
        };
        if let Err(e) = conn.set_ex::<_, _, ()>(key, raw, ttl.as_secs()).await {
            tracing::warn!(key = %key, error = %e, "Redis SET error");
        } else {
            tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "cache set");
        }
    }

    async fn del(&self, key: &str) {
        let mut conn = match self.pool.get().await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to get redis connection");
                return;
            }
        };
        if let Err(e) = conn.del::<_, ()>(key).await {
            tracing::warn!(key = %key, error = %e, "Redis DEL error");
        } else {
            tracing::debug!(key = %key, "cache invalidated");
        }
    }
}
