//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where archives are discovered
    #[serde(default)]
    pub input: InputConfig,

    /// Language gate and content floor
    #[serde(default)]
    pub filter: FilterConfig,

    /// Strong-context allow-lists
    #[serde(default)]
    pub context: ContextConfig,

    /// Annotation service settings
    #[serde(default)]
    pub annotator: AnnotatorConfig,

    /// Key-value store connection
    #[serde(default)]
    pub store: StoreConfig,

    /// Queue names, expiry and in-process channel sizing
    #[serde(default)]
    pub queues: QueueConfig,

    /// Per-post failure policy
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.filter.language.trim().is_empty() {
            return Err(AppError::validation("filter.language is empty"));
        }
        if self.filter.min_tokens == 0 {
            return Err(AppError::validation("filter.min_tokens must be > 0"));
        }
        if self.context.strong_pos.is_empty() && self.context.entity_labels.is_empty() {
            return Err(AppError::validation(
                "context.strong_pos and context.entity_labels are both empty",
            ));
        }
        if self.annotator.url.trim().is_empty() {
            return Err(AppError::validation("annotator.url is empty"));
        }
        if self.annotator.timeout_secs == 0 {
            return Err(AppError::validation("annotator.timeout_secs must be > 0"));
        }
        if self.annotator.batch_size == 0 {
            return Err(AppError::validation("annotator.batch_size must be > 0"));
        }
        if self.store.redis_url.trim().is_empty() {
            return Err(AppError::validation("store.redis_url is empty"));
        }
        if self.queues.convolutional_queue.trim().is_empty() {
            return Err(AppError::validation("queues.convolutional_queue is empty"));
        }
        if self.queues.expiring_ttl_secs <= 0 {
            return Err(AppError::validation(
                "queues.expiring_ttl_secs must be > 0",
            ));
        }
        if self.queues.channel_capacity == 0 {
            return Err(AppError::validation("queues.channel_capacity must be > 0"));
        }
        Ok(())
    }
}

/// Archive discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory scanned for archive files
    #[serde(default = "defaults::input_dir")]
    pub dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::input_dir(),
        }
    }
}

/// Pre-annotation filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Only posts with this language code are processed
    #[serde(default = "defaults::language")]
    pub language: String,

    /// Minimum number of tokens left after normalization
    #[serde(default = "defaults::min_tokens")]
    pub min_tokens: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            language: defaults::language(),
            min_tokens: defaults::min_tokens(),
        }
    }
}

/// Which annotations count as strong context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Part-of-speech tags routed into strong context
    #[serde(default = "defaults::strong_pos")]
    pub strong_pos: Vec<String>,

    /// Named-entity labels routed into strong context
    #[serde(default = "defaults::entity_labels")]
    pub entity_labels: Vec<String>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            strong_pos: defaults::strong_pos(),
            entity_labels: defaults::entity_labels(),
        }
    }
}

/// Annotation service client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    /// Endpoint accepting `{"texts": [...]}`
    #[serde(default = "defaults::annotator_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::annotator_timeout")]
    pub timeout_secs: u64,

    /// Texts sent per request
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            url: defaults::annotator_url(),
            timeout_secs: defaults::annotator_timeout(),
            batch_size: defaults::batch_size(),
        }
    }
}

/// External store connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "defaults::redis_url")]
    pub redis_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: defaults::redis_url(),
        }
    }
}

/// Queue naming and sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// List receiving one record per strong-context token
    #[serde(default = "defaults::convolutional_queue")]
    pub convolutional_queue: String,

    /// Time-to-live of each expiring-queue key, in seconds
    #[serde(default = "defaults::expiring_ttl")]
    pub expiring_ttl_secs: i64,

    /// Capacity of each bounded in-process channel
    #[serde(default = "defaults::channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            convolutional_queue: defaults::convolutional_queue(),
            expiring_ttl_secs: defaults::expiring_ttl(),
            channel_capacity: defaults::channel_capacity(),
        }
    }
}

/// What to do when a single post cannot be enriched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostErrorPolicy {
    /// Propagate the error and stop the current archive
    #[default]
    Abort,
    /// Log the error and continue with the next post
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    #[serde(default)]
    pub on_post_error: PostErrorPolicy,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Optional log file; stderr when absent
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            file: None,
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Input defaults
    pub fn input_dir() -> PathBuf {
        PathBuf::from("data/posts")
    }

    // Filter defaults
    pub fn language() -> String {
        "en".into()
    }
    pub fn min_tokens() -> usize {
        3
    }

    // Context defaults
    pub fn strong_pos() -> Vec<String> {
        vec!["NOUN".into(), "PROPN".into()]
    }
    pub fn entity_labels() -> Vec<String> {
        vec!["PERSON".into(), "ORG".into(), "GPE".into()]
    }

    // Annotator defaults
    pub fn annotator_url() -> String {
        "http://localhost:8080/annotate".into()
    }
    pub fn annotator_timeout() -> u64 {
        300
    }
    pub fn batch_size() -> usize {
        1000
    }

    // Store defaults
    pub fn redis_url() -> String {
        "redis://localhost:6379/0".into()
    }

    // Queue defaults
    pub fn convolutional_queue() -> String {
        "ADBC-ConvolutionalQueue".into()
    }
    pub fn expiring_ttl() -> i64 {
        60
    }
    pub fn channel_capacity() -> usize {
        1024
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn defaults_match_queue_contract() {
        let config = Config::default();
        assert_eq!(config.queues.convolutional_queue, "ADBC-ConvolutionalQueue");
        assert_eq!(config.queues.expiring_ttl_secs, 60);
        assert_eq!(config.filter.language, "en");
        assert_eq!(config.filter.min_tokens, 3);
        assert_eq!(config.pipeline.on_post_error, PostErrorPolicy::Abort);
    }

    #[test]
    fn validate_rejects_zero_ttl() {
        let mut config = Config::default();
        config.queues.expiring_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_allow_lists() {
        let mut config = Config::default();
        config.context.strong_pos.clear();
        config.context.entity_labels.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [queues]
            expiring_ttl_secs = 120

            [pipeline]
            on_post_error = "skip"
            "#,
        )
        .unwrap();

        assert_eq!(config.queues.expiring_ttl_secs, 120);
        assert_eq!(config.queues.channel_capacity, 1024);
        assert_eq!(config.pipeline.on_post_error, PostErrorPolicy::Skip);
        assert_eq!(config.context.entity_labels, vec!["PERSON", "ORG", "GPE"]);
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config.annotator.batch_size, 1000);
    }
}
