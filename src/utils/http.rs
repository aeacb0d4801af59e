// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::AnnotatorConfig;

/// Create a configured asynchronous HTTP client for the annotation service.
pub fn create_client(config: &AnnotatorConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("preprocessor/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}
