//! Post records as read from archives and as published to the expiring queue.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

/// One archive line.
///
/// Only the fields the pipeline reads are typed. Everything else is kept in
/// `extra` so the expiring-queue record carries the complete post. The typed
/// fields are optional because stream archives interleave non-post records
/// (deletion notices, limit messages) that must be filtered, not rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// e.g. `Wed Oct 10 20:19:24 +0000 2018`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_str: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Entities>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `entities` object of a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<Hashtag>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hashtag {
    pub text: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Hashtag {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra: Map::new(),
        }
    }
}

impl RawPost {
    /// Whether the post carries the given language code.
    pub fn is_language(&self, language: &str) -> bool {
        self.lang.as_deref() == Some(language)
    }

    /// Raw post text.
    pub fn text(&self) -> Result<&str> {
        self.text
            .as_deref()
            .ok_or(AppError::MissingField { field: "text" })
    }

    /// Creation time string.
    pub fn created_at(&self) -> Result<&str> {
        self.created_at
            .as_deref()
            .ok_or(AppError::MissingField { field: "created_at" })
    }

    /// Numeric-string identifier.
    pub fn id_str(&self) -> Result<&str> {
        self.id_str
            .as_deref()
            .ok_or(AppError::MissingField { field: "id_str" })
    }

    /// Hashtag texts without a leading `#`.
    ///
    /// The hashtag list has to be present; an empty list is fine.
    pub fn hashtags(&self) -> Result<impl Iterator<Item = &str>> {
        let hashtags = self
            .entities
            .as_ref()
            .and_then(|e| e.hashtags.as_ref())
            .ok_or(AppError::MissingField {
                field: "entities.hashtags",
            })?;

        Ok(hashtags.iter().map(|h| h.text.trim_start_matches('#')))
    }
}

/// A post that survived filtering, with its context attached.
///
/// Serializes as one flat object: the raw post fields plus `tokens`,
/// `context_strong`, `context_weak`, `ts` and `tid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPost {
    #[serde(flatten)]
    pub post: RawPost,

    /// Non-stopword lemmas in document order
    pub tokens: Vec<String>,

    pub context_strong: BTreeSet<String>,

    pub context_weak: BTreeSet<String>,

    /// Creation time as epoch seconds
    pub ts: i64,

    /// Numeric post identifier
    pub tid: u64,
}

impl EnrichedPost {
    /// Key of this post in the expiring queue.
    pub fn key(&self) -> String {
        self.tid.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r##"{"created_at":"Wed Oct 10 20:19:24 +0000 2018","id":1050118621198921728,"id_str":"1050118621198921728","text":"Storm #Michael hits Florida","lang":"en","user":{"screen_name":"wx"},"entities":{"hashtags":[{"text":"Michael","indices":[6,14]}],"urls":[]}}"##;

    #[test]
    fn decodes_typed_fields_and_keeps_the_rest() {
        let post: RawPost = serde_json::from_str(LINE).unwrap();

        assert!(post.is_language("en"));
        assert_eq!(post.id_str().unwrap(), "1050118621198921728");
        assert_eq!(post.hashtags().unwrap().collect::<Vec<_>>(), vec!["Michael"]);
        assert!(post.extra.contains_key("user"));
        assert!(post.entities.as_ref().unwrap().extra.contains_key("urls"));
    }

    #[test]
    fn non_post_lines_decode_without_fields() {
        let post: RawPost =
            serde_json::from_str(r#"{"delete":{"status":{"id":1,"id_str":"1"}}}"#).unwrap();

        assert!(!post.is_language("en"));
        assert!(matches!(
            post.text(),
            Err(AppError::MissingField { field: "text" })
        ));
    }

    #[test]
    fn missing_hashtag_list_is_an_error_but_empty_is_not() {
        let mut post = RawPost::default();
        assert!(post.hashtags().is_err());

        post.entities = Some(Entities {
            hashtags: Some(Vec::new()),
            extra: Map::new(),
        });
        assert_eq!(post.hashtags().unwrap().count(), 0);
    }

    #[test]
    fn hashtag_prefix_is_stripped() {
        let post = RawPost {
            entities: Some(Entities {
                hashtags: Some(vec![Hashtag::new("#Alpha")]),
                extra: Map::new(),
            }),
            ..RawPost::default()
        };
        assert_eq!(post.hashtags().unwrap().collect::<Vec<_>>(), vec!["Alpha"]);
    }

    #[test]
    fn enriched_post_serializes_flat() {
        let post: RawPost = serde_json::from_str(LINE).unwrap();
        let enriched = EnrichedPost {
            post,
            tokens: vec!["storm".into(), "hit".into()],
            context_strong: ["Michael".to_string(), "Storm".to_string()].into(),
            context_weak: ["hit".to_string()].into(),
            ts: 1539202764,
            tid: 1050118621198921728,
        };

        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["id_str"], "1050118621198921728");
        assert_eq!(value["user"]["screen_name"], "wx");
        assert_eq!(value["tid"], 1050118621198921728u64);
        assert_eq!(value["context_weak"], serde_json::json!(["hit"]));
        assert_eq!(enriched.key(), "1050118621198921728");
    }
}
