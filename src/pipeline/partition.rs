// src/pipeline/partition.rs

//! Strong/weak context partitioning.
//!
//! Strong context holds the topical anchors of a post: surface forms of
//! nouns and proper nouns, selected named entities, and the post's hashtags.
//! Weak context is every remaining non-stopword lemma. A post without any
//! strong context is dropped.

use std::collections::{BTreeSet, HashSet};

use crate::error::Result;
use crate::models::{Annotation, ContextConfig, RawPost};

/// Context derived from one annotated post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSets {
    /// Non-stopword lemmas in document order, duplicates kept
    pub tokens: Vec<String>,
    pub strong: BTreeSet<String>,
    /// Never shares a member with `strong`
    pub weak: BTreeSet<String>,
}

/// Classifies annotated tokens into strong and weak context.
#[derive(Debug, Clone)]
pub struct Partitioner {
    strong_pos: HashSet<String>,
    entity_labels: HashSet<String>,
}

impl Partitioner {
    pub fn new(config: &ContextConfig) -> Self {
        Self {
            strong_pos: config.strong_pos.iter().cloned().collect(),
            entity_labels: config.entity_labels.iter().cloned().collect(),
        }
    }

    /// Partition one post.
    ///
    /// Returns `Ok(None)` when no strong context was found. Fails only if the
    /// post has no hashtag list at all.
    pub fn partition(
        &self,
        post: &RawPost,
        annotation: &Annotation,
    ) -> Result<Option<ContextSets>> {
        let tokens: Vec<String> = annotation
            .tokens
            .iter()
            .filter(|t| !t.is_stop)
            .map(|t| t.lemma.clone())
            .collect();

        let nouns = annotation
            .tokens
            .iter()
            .filter(|t| self.strong_pos.contains(&t.pos))
            .map(|t| t.text.as_str());
        let entities = annotation
            .entities
            .iter()
            .filter(|e| self.entity_labels.contains(&e.label))
            .map(|e| e.text.as_str());

        let strong: BTreeSet<String> = nouns
            .chain(entities)
            .chain(post.hashtags()?)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if strong.is_empty() {
            return Ok(None);
        }

        let weak = tokens
            .iter()
            .filter(|t| !strong.contains(*t))
            .cloned()
            .collect();

        Ok(Some(ContextSets {
            tokens,
            strong,
            weak,
        }))
    }
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::new(&ContextConfig::default())
    }
}
