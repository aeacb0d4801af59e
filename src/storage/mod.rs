//! Key-value / queue store backends.
//!
//! The distributor needs three commands from the store:
//!
//! ```text
//! RPUSH  <convolutional queue> {"token":..,"ts":..,"tid":..}   one per strong token
//! APPEND <tid>                 <enriched post json>             one per post
//! EXPIRE <tid>                 <ttl secs>                       right after APPEND
//! ```
//!
//! `RedisStore` talks to a real server, `MemoryStore` keeps everything in
//! process for dry runs and tests.

pub mod memory;
pub mod redis;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use memory::MemoryStore;
pub use self::redis::RedisStore;

/// Trait for queue store backends.
#[async_trait]
pub trait QueueStore: Send {
    /// Append a record to the tail of a list.
    async fn push(&mut self, list: &str, record: &str) -> Result<()>;

    /// Append a record to the string value stored at `key`, creating it if absent.
    async fn append(&mut self, key: &str, record: &str) -> Result<()>;

    /// Set the time-to-live of an existing key.
    async fn expire(&mut self, key: &str, ttl_secs: i64) -> Result<()>;
}
