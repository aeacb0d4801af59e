//! In-process storage implementation.
//!
//! Mirrors the Redis semantics the distributor relies on: lists grow on every
//! push, appends concatenate onto the existing value, and expiry only applies
//! to keys that already exist. Nothing actually expires; the TTL is recorded
//! so callers can inspect it.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::storage::QueueStore;

/// A string value and its time-to-live, if one was set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredValue {
    pub value: String,
    pub ttl_secs: Option<i64>,
}

/// In-memory queue store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lists: HashMap<String, Vec<String>>,
    keys: HashMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records pushed onto a list, oldest first.
    pub fn list(&self, name: &str) -> &[String] {
        self.lists.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Value and TTL stored under a key.
    pub fn get(&self, key: &str) -> Option<&StoredValue> {
        self.keys.get(key)
    }

    /// Number of keys holding a string value.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

#[async_trait]
impl QueueStore for MemoryStore {
    async fn push(&mut self, list: &str, record: &str) -> Result<()> {
        self.lists
            .entry(list.to_string())
            .or_default()
            .push(record.to_string());
        Ok(())
    }

    async fn append(&mut self, key: &str, record: &str) -> Result<()> {
        self.keys
            .entry(key.to_string())
            .or_default()
            .value
            .push_str(record);
        Ok(())
    }

    async fn expire(&mut self, key: &str, ttl_secs: i64) -> Result<()> {
        match self.keys.get_mut(key) {
            Some(stored) => stored.ttl_secs = Some(ttl_secs),
            None => log::warn!("EXPIRE {} had no effect: key does not exist", key),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_keeps_order() {
        let mut store = MemoryStore::new();
        store.push("q", "a").await.unwrap();
        store.push("q", "b").await.unwrap();

        assert_eq!(store.list("q"), ["a".to_string(), "b".to_string()]);
        assert!(store.list("other").is_empty());
    }

    #[tokio::test]
    async fn test_append_concatenates() {
        let mut store = MemoryStore::new();
        store.append("1", "{}").await.unwrap();
        store.append("1", "{}").await.unwrap();

        assert_eq!(store.get("1").unwrap().value, "{}{}");
    }

    #[tokio::test]
    async fn test_expire_requires_existing_key() {
        let mut store = MemoryStore::new();
        store.expire("missing", 60).await.unwrap();
        assert!(store.get("missing").is_none());

        store.append("present", "x").await.unwrap();
        store.expire("present", 60).await.unwrap();
        assert_eq!(store.get("present").unwrap().ttl_secs, Some(60));
    }
}
