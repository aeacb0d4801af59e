//! Pipeline stages, leaf-first.
//!
//! - `archive`: find archives and decode their lines
//! - `normalize`: language gate and text cleaning
//! - `partition`: strong/weak context from annotations
//! - `enrich`: timestamp, id and context attached to the post
//! - `distribute`: fan-out to the convolutional and expiring queues
//! - `process`: the above wired together per archive

pub mod archive;
pub mod distribute;
pub mod enrich;
pub mod normalize;
pub mod partition;
pub mod process;

pub use archive::{list_archives, read_posts};
pub use distribute::{Distributed, Distributor, Drained, QueueReceivers, QueueSink};
pub use enrich::{enrich, parse_post_id, parse_timestamp};
pub use normalize::{CleanedText, Normalizer, Screened};
pub use partition::{ContextSets, Partitioner};
pub use process::{ArchiveReport, Pipeline, RunReport};
