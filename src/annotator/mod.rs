//! Linguistic annotation boundary.
//!
//! The pipeline hands the annotator every cleaned text of an archive in one
//! call and pairs the results back with the posts by position, so an
//! implementation must return exactly one [`Annotation`] per input, in input
//! order.

pub mod http;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::Annotation;

pub use http::HttpAnnotator;

/// Produces token and entity annotations for cleaned texts.
#[async_trait]
pub trait Annotator: Send + Sync {
    /// Annotate a batch. Output order and length must match `batch`.
    async fn annotate(&self, batch: &[String]) -> Result<Vec<Annotation>>;
}

/// Annotate a batch and reject results that cannot be paired with the input.
pub async fn annotate_checked(
    annotator: &dyn Annotator,
    batch: &[String],
) -> Result<Vec<Annotation>> {
    if batch.is_empty() {
        return Ok(Vec::new());
    }

    let annotations = annotator.annotate(batch).await?;
    if annotations.len() != batch.len() {
        return Err(AppError::AnnotationMismatch {
            expected: batch.len(),
            actual: annotations.len(),
        });
    }
    Ok(annotations)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drops the last document of every batch.
    struct Truncating;

    #[async_trait]
    impl Annotator for Truncating {
        async fn annotate(&self, batch: &[String]) -> Result<Vec<Annotation>> {
            Ok(vec![Annotation::default(); batch.len().saturating_sub(1)])
        }
    }

    struct Exact;

    #[async_trait]
    impl Annotator for Exact {
        async fn annotate(&self, batch: &[String]) -> Result<Vec<Annotation>> {
            Ok(vec![Annotation::default(); batch.len()])
        }
    }

    #[tokio::test]
    async fn test_short_result_is_rejected() {
        let batch = vec!["one two three".to_string(), "four five six".to_string()];
        let err = annotate_checked(&Truncating, &batch).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::AnnotationMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_matching_result_passes() {
        let batch = vec!["one two three".to_string()];
        assert_eq!(annotate_checked(&Exact, &batch).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch_skips_annotator() {
        assert!(annotate_checked(&Truncating, &[]).await.unwrap().is_empty());
    }
}
