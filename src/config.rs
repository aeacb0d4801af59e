// src/config.rs

//! Configuration loading utilities.
//!
//! The TOML file is optional; missing values fall back to defaults, and a few
//! deployment-specific settings can be overridden from the environment:
//!
//! | variable                     | setting          |
//! |------------------------------|------------------|
//! | `PREPROCESSOR_INPUT_DIR`     | `input.dir`      |
//! | `PREPROCESSOR_ANNOTATOR_URL` | `annotator.url`  |
//! | `PREPROCESSOR_REDIS_URL`     | `store.redis_url`|

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load configuration from a TOML file.
///
/// Falls back to defaults if loading fails.
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Config::default();
    }
    Config::load_or_default(path)
}

/// Apply overrides from an environment lookup.
pub fn apply_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(dir) = var("PREPROCESSOR_INPUT_DIR") {
        config.input.dir = dir.into();
    }
    if let Some(url) = var("PREPROCESSOR_ANNOTATOR_URL") {
        config.annotator.url = url;
    }
    if let Some(url) = var("PREPROCESSOR_REDIS_URL") {
        config.store.redis_url = url;
    }
}

/// Load, apply environment overrides and validate.
pub fn load_all(path: &Path) -> Result<Config> {
    let mut config = load_config(path);
    apply_overrides(&mut config, |name| std::env::var(name).ok());

    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration: {e}")))?;

    Ok(config)
}
