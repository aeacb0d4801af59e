//! Entries handed to the convolutional and expiring queues.

use serde::{Deserialize, Serialize};

use super::post::EnrichedPost;

/// One strong-context token of one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvolutionalEntry {
    pub token: String,
    pub post_id: u64,
    pub timestamp: i64,
}

impl ConvolutionalEntry {
    /// Wire form pushed onto the convolutional list.
    pub fn record(&self) -> ConvolutionalRecord<'_> {
        ConvolutionalRecord {
            token: &self.token,
            ts: self.timestamp,
            tid: self.post_id,
        }
    }
}

/// `{"token": ..., "ts": ..., "tid": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvolutionalRecord<'a> {
    #[serde(borrow)]
    pub token: &'a str,
    pub ts: i64,
    pub tid: u64,
}

/// A whole enriched post keyed by its id.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiringEntry {
    pub post_id: u64,
    pub post: EnrichedPost,
}
