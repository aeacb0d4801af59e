// src/models/mod.rs

//! Domain models for the preprocessor.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod annotation;
mod config;
mod post;
mod queue;

// Re-export all public types
pub use annotation::{AnnotatedToken, Annotation, EntitySpan};
pub use config::{
    AnnotatorConfig, Config, ContextConfig, FilterConfig, InputConfig, LoggingConfig,
    PipelineConfig, PostErrorPolicy, QueueConfig, StoreConfig,
};
pub use post::{EnrichedPost, Entities, Hashtag, RawPost};
pub use queue::{ConvolutionalEntry, ConvolutionalRecord, ExpiringEntry};
