// src/pipeline/normalize.rs

//! Post text normalization.
//!
//! Stages run in a fixed order, each on the output of the previous one:
//!
//! 1. drop URLs (`http://...`, `https://...` up to the next whitespace)
//! 2. drop `@mentions`
//! 3. line breaks and tabs become spaces
//! 4. drop everything that is not an ASCII letter or a space
//! 5. drop words of one or two characters
//! 6. collapse whitespace and trim
//!
//! Texts left with fewer than `min_tokens` words are rejected.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::models::{FilterConfig, RawPost};

static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S*").unwrap());
static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").unwrap());
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\n\t]").unwrap());
static NON_LATIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z ]").unwrap());
static SHORT_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w{1,2}\b").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Cleaned post text: ASCII letters separated by single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedText(String);

impl CleanedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Number of space-separated tokens.
    pub fn token_count(&self) -> usize {
        self.0.split(' ').count()
    }
}

/// Outcome of running a post through the pre-annotation filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screened {
    /// Passed both filters
    Accepted(CleanedText),
    /// Wrong or missing language code
    OtherLanguage,
    /// Too little text left after cleaning
    BelowContentFloor,
}

/// Language gate plus text cleaning.
#[derive(Debug, Clone)]
pub struct Normalizer {
    language: String,
    min_tokens: usize,
}

impl Normalizer {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            language: config.language.clone(),
            min_tokens: config.min_tokens,
        }
    }

    /// Clean raw text, returning `None` if it falls below the content floor.
    pub fn normalize(&self, raw: &str) -> Option<CleanedText> {
        let text = URL.replace_all(raw, "");
        let text = MENTION.replace_all(&text, "");
        let text = LINE_BREAK.replace_all(&text, " ");
        let text = NON_LATIN.replace_all(&text, "");
        let text = SHORT_WORD.replace_all(&text, "");
        let text = WHITESPACE.replace_all(&text, " ");

        let cleaned = CleanedText(text.trim().to_string());
        (cleaned.token_count() >= self.min_tokens).then_some(cleaned)
    }

    /// Apply the language gate, then clean the post text.
    ///
    /// A post in the target language without a `text` field is an error.
    pub fn screen(&self, post: &RawPost) -> Result<Screened> {
        if !post.is_language(&self.language) {
            return Ok(Screened::OtherLanguage);
        }

        Ok(match self.normalize(post.text()?) {
            Some(cleaned) => Screened::Accepted(cleaned),
            None => Screened::BelowContentFloor,
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
