//! Redis storage implementation.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

use crate::error::Result;
use crate::models::StoreConfig;
use crate::storage::QueueStore;

/// Redis-backed queue store.
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    /// Wrap an already established connection.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Connect using the configured URL.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        let conn = client.get_multiplexed_async_connection().await?;
        log::info!("Connected to store at {}", config.redis_url);
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl QueueStore for RedisStore {
    async fn push(&mut self, list: &str, record: &str) -> Result<()> {
        let _: i64 = self.conn.rpush(list, record).await?;
        Ok(())
    }

    async fn append(&mut self, key: &str, record: &str) -> Result<()> {
        let _: i64 = self.conn.append(key, record).await?;
        Ok(())
    }

    async fn expire(&mut self, key: &str, ttl_secs: i64) -> Result<()> {
        let applied: bool = self.conn.expire(key, ttl_secs).await?;
        if !applied {
            log::warn!("EXPIRE {} had no effect: key does not exist", key);
        }
        Ok(())
    }
}
