// src/pipeline/enrich.rs

//! Attaching context, timestamp and numeric id to a post.

use chrono::DateTime;

use crate::error::{AppError, Result};
use crate::models::{EnrichedPost, RawPost};

use super::partition::ContextSets;

/// Format of `created_at`, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Parse a `created_at` value into epoch seconds.
pub fn parse_timestamp(value: &str) -> Result<i64> {
    DateTime::parse_from_str(value, CREATED_AT_FORMAT)
        .map(|dt| dt.timestamp())
        .map_err(|source| AppError::Timestamp {
            value: value.to_string(),
            source,
        })
}

/// Parse an `id_str` value as a base-10 integer.
pub fn parse_post_id(value: &str) -> Result<u64> {
    value.parse().map_err(|source| AppError::PostId {
        value: value.to_string(),
        source,
    })
}

/// Build the enriched record for a post that passed partitioning.
pub fn enrich(post: RawPost, context: ContextSets) -> Result<EnrichedPost> {
    let ts = parse_timestamp(post.created_at()?)?;
    let tid = parse_post_id(post.id_str()?)?;

    Ok(EnrichedPost {
        post,
        tokens: context.tokens,
        context_strong: context.strong,
        context_weak: context.weak,
        ts,
        tid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ContextSets {
        ContextSets {
            tokens: vec!["storm".into(), "hit".into()],
            strong: ["storm".to_string()].into(),
            weak: ["hit".to_string()].into(),
        }
    }

    fn post(created_at: &str, id_str: &str) -> RawPost {
        RawPost {
            created_at: Some(created_at.into()),
            id_str: Some(id_str.into()),
            ..RawPost::default()
        }
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(
            parse_timestamp("Wed Oct 10 20:19:24 +0000 2018").unwrap(),
            1539202764
        );
        // Offset is honoured
        assert_eq!(
            parse_timestamp("Wed Oct 10 22:19:24 +0200 2018").unwrap(),
            1539202764
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_other_formats() {
        for value in ["2018-10-10T20:19:24Z", "Wed Oct 10 20:19:24 2018", ""] {
            assert!(matches!(
                parse_timestamp(value),
                Err(AppError::Timestamp { .. })
            ));
        }
    }

    #[test]
    fn test_parse_post_id() {
        assert_eq!(
            parse_post_id("1050118621198921728").unwrap(),
            1050118621198921728
        );
        assert!(matches!(parse_post_id("12ab"), Err(AppError::PostId { .. })));
        assert!(matches!(parse_post_id(""), Err(AppError::PostId { .. })));
    }

    #[test]
    fn test_enrich_attaches_context() {
        let enriched = enrich(
            post("Wed Oct 10 20:19:24 +0000 2018", "1050118621198921728"),
            context(),
        )
        .unwrap();

        assert_eq!(enriched.ts, 1539202764);
        assert_eq!(enriched.tid, 1050118621198921728);
        assert!(enriched.context_strong.contains("storm"));
        assert_eq!(enriched.tokens, vec!["storm", "hit"]);
    }

    #[test]
    fn test_enrich_never_guesses() {
        let bad_time = enrich(post("yesterday", "1"), context());
        assert!(matches!(bad_time, Err(AppError::Timestamp { .. })));

        let bad_id = enrich(post("Wed Oct 10 20:19:24 +0000 2018", "n/a"), context());
        assert!(matches!(bad_id, Err(AppError::PostId { .. })));

        let missing = enrich(RawPost::default(), context());
        assert!(matches!(
            missing,
            Err(AppError::MissingField {
                field: "created_at"
            })
        ));
    }
}
