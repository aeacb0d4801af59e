//! Output contract of the linguistic annotator.

use serde::{Deserialize, Serialize};

/// One token of an annotated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    /// Surface form as it appears in the cleaned text
    pub text: String,

    /// Dictionary form
    pub lemma: String,

    #[serde(default)]
    pub is_stop: bool,

    /// Universal part-of-speech tag (`NOUN`, `PROPN`, `VERB`, ...)
    pub pos: String,
}

impl AnnotatedToken {
    pub fn new(text: &str, lemma: &str, pos: &str, is_stop: bool) -> Self {
        Self {
            text: text.to_string(),
            lemma: lemma.to_string(),
            is_stop,
            pos: pos.to_string(),
        }
    }
}

/// A named-entity span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: String,
}

impl EntitySpan {
    pub fn new(text: &str, label: &str) -> Self {
        Self {
            text: text.to_string(),
            label: label.to_string(),
        }
    }
}

/// Annotation of one cleaned text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub tokens: Vec<AnnotatedToken>,

    #[serde(default, alias = "ents")]
    pub entities: Vec<EntitySpan>,
}
