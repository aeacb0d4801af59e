// src/pipeline/distribute.rs

//! Fan-out of enriched posts to the convolutional and expiring queues.
//!
//! Every entry goes two ways: into a bounded in-process channel for local
//! consumers, and into the external store. Sends wait while a channel is
//! full, so a slow consumer throttles the pipeline instead of letting an
//! archive pile up in memory. Something must be reading the receivers (for
//! instance [`QueueReceivers::drain`] on a spawned task), otherwise the first
//! send past capacity waits forever.

use tokio::sync::mpsc;

use crate::error::{AppError, Result};
use crate::models::{ConvolutionalEntry, EnrichedPost, ExpiringEntry, QueueConfig};
use crate::storage::QueueStore;

/// Sending half of the in-process queues.
#[derive(Debug, Clone)]
pub struct QueueSink {
    convolutional: mpsc::Sender<ConvolutionalEntry>,
    expiring: mpsc::Sender<ExpiringEntry>,
}

/// Receiving half of the in-process queues.
#[derive(Debug)]
pub struct QueueReceivers {
    pub convolutional: mpsc::Receiver<ConvolutionalEntry>,
    pub expiring: mpsc::Receiver<ExpiringEntry>,
}

impl QueueSink {
    /// Create both channels with the given capacity each.
    ///
    /// The returned receivers need a running consumer once more than
    /// `capacity` entries are in flight.
    pub fn bounded(capacity: usize) -> (Self, QueueReceivers) {
        let (conv_tx, conv_rx) = mpsc::channel(capacity);
        let (exp_tx, exp_rx) = mpsc::channel(capacity);
        (
            Self {
                convolutional: conv_tx,
                expiring: exp_tx,
            },
            QueueReceivers {
                convolutional: conv_rx,
                expiring: exp_rx,
            },
        )
    }

    async fn send_convolutional(&self, entry: ConvolutionalEntry) -> Result<()> {
        self.convolutional
            .send(entry)
            .await
            .map_err(|_| AppError::ChannelClosed("convolutional"))
    }

    async fn send_expiring(&self, entry: ExpiringEntry) -> Result<()> {
        self.expiring
            .send(entry)
            .await
            .map_err(|_| AppError::ChannelClosed("expiring"))
    }
}

/// Entries taken off the in-process queues by [`QueueReceivers::drain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Drained {
    pub convolutional: usize,
    pub expiring: usize,
}

impl QueueReceivers {
    /// Consume both queues until every sender is gone, counting entries.
    pub async fn drain(self) -> Drained {
        let Self {
            convolutional: mut conv_rx,
            expiring: mut exp_rx,
        } = self;

        let convolutional = async move {
            let mut n = 0;
            while conv_rx.recv().await.is_some() {
                n += 1;
            }
            n
        };
        let expiring = async move {
            let mut n = 0;
            while exp_rx.recv().await.is_some() {
                n += 1;
            }
            n
        };

        let (convolutional, expiring) = tokio::join!(convolutional, expiring);
        Drained {
            convolutional,
            expiring,
        }
    }
}

/// What a single `distribute` call published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Distributed {
    pub convolutional: usize,
    pub expiring: usize,
}

/// Publishes enriched posts to both queues.
pub struct Distributor<S> {
    store: S,
    sink: QueueSink,
    queue_name: String,
    ttl_secs: i64,
}

impl<S: QueueStore> Distributor<S> {
    pub fn new(store: S, sink: QueueSink, config: &QueueConfig) -> Self {
        Self {
            store,
            sink,
            queue_name: config.convolutional_queue.clone(),
            ttl_secs: config.expiring_ttl_secs,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the store, closing this distributor's side of the channels.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Publish one post.
    ///
    /// One convolutional entry per strong-context token, then the whole post
    /// under its id with the configured expiry. Calling this twice for the
    /// same post publishes everything twice.
    pub async fn distribute(&mut self, post: &EnrichedPost) -> Result<Distributed> {
        let mut report = Distributed::default();

        for token in &post.context_strong {
            let entry = ConvolutionalEntry {
                token: token.clone(),
                post_id: post.tid,
                timestamp: post.ts,
            };
            let record = serde_json::to_string(&entry.record())?;

            self.sink.send_convolutional(entry).await?;
            self.store.push(&self.queue_name, &record).await?;
            report.convolutional += 1;
        }

        let key = post.key();
        let record = serde_json::to_string(post)?;

        self.sink
            .send_expiring(ExpiringEntry {
                post_id: post.tid,
                post: post.clone(),
            })
            .await?;
        // The key has to exist before EXPIRE can apply.
        self.store.append(&key, &record).await?;
        self.store.expire(&key, self.ttl_secs).await?;
        report.expiring += 1;

        log::debug!(
            "Distributed post {} ({} strong tokens)",
            post.tid,
            report.convolutional
        );
        Ok(report)
    }
}
