//! Annotation service client.
//!
//! Talks to an HTTP service wrapping an NLP pipeline:
//!
//! ```text
//! POST {url}   {"texts": ["...", "..."]}
//! 200          {"docs": [{"tokens": [{"text","lemma","is_stop","pos"}], "entities": [{"text","label"}]}, ...]}
//! ```
//!
//! Large batches are split into requests of `batch_size` texts, sent one
//! after another so the concatenated result keeps input order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::annotator::Annotator;
use crate::error::{AppError, Result};
use crate::models::{Annotation, AnnotatorConfig};
use crate::utils::http;

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    texts: &'a [String],
}

#[derive(Deserialize)]
struct AnnotateResponse {
    docs: Vec<Annotation>,
}

/// Annotator backed by a remote service.
pub struct HttpAnnotator {
    client: reqwest::Client,
    url: String,
    batch_size: usize,
}

impl HttpAnnotator {
    /// Create a client for the configured service.
    pub fn new(config: &AnnotatorConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(AppError::config("annotator.batch_size must be > 0"));
        }
        Ok(Self {
            client: http::create_client(config)?,
            url: config.url.clone(),
            batch_size: config.batch_size,
        })
    }

    async fn annotate_chunk(&self, chunk: &[String]) -> Result<Vec<Annotation>> {
        let response = self
            .client
            .post(&self.url)
            .json(&AnnotateRequest { texts: chunk })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::annotator(format!(
                "{} returned {}: {}",
                self.url, status, body
            )));
        }

        let parsed: AnnotateResponse = response.json().await?;
        if parsed.docs.len() != chunk.len() {
            return Err(AppError::AnnotationMismatch {
                expected: chunk.len(),
                actual: parsed.docs.len(),
            });
        }
        Ok(parsed.docs)
    }
}

#[async_trait]
impl Annotator for HttpAnnotator {
    async fn annotate(&self, batch: &[String]) -> Result<Vec<Annotation>> {
        let mut docs = Vec::with_capacity(batch.len());
        for (i, chunk) in batch.chunks(self.batch_size).enumerate() {
            log::debug!(
                "Annotating chunk {} ({} texts) via {}",
                i + 1,
                chunk.len(),
                self.url
            );
            docs.extend(self.annotate_chunk(chunk).await?);
        }
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer, batch_size: usize) -> AnnotatorConfig {
        AnnotatorConfig {
            url: format!("{}/annotate", server.uri()),
            timeout_secs: 5,
            batch_size,
        }
    }

    fn one_doc() -> serde_json::Value {
        json!({
            "docs": [{
                "tokens": [
                    {"text": "Storm", "lemma": "storm", "is_stop": false, "pos": "NOUN"},
                    {"text": "hits", "lemma": "hit", "is_stop": false, "pos": "VERB"}
                ],
                "entities": [{"text": "Florida", "label": "GPE"}]
            }]
        })
    }

    #[tokio::test]
    async fn test_batches_are_split_by_batch_size() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/annotate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_doc()))
            .expect(2)
            .mount(&server)
            .await;

        let annotator = HttpAnnotator::new(&config(&server, 1)).unwrap();
        let batch = vec!["Storm hits Florida".to_string(), "Storm hits Texas".to_string()];
        let docs = annotator.annotate(&batch).await.unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].tokens[1].lemma, "hit");
        assert_eq!(docs[1].entities[0].label, "GPE");
    }

    #[tokio::test]
    async fn test_extra_documents_are_a_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/annotate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "docs": [{"tokens": [], "entities": []}, {"tokens": [], "entities": []}]
            })))
            .mount(&server)
            .await;

        let annotator = HttpAnnotator::new(&config(&server, 10)).unwrap();
        let err = annotator
            .annotate(&["only one text".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::AnnotationMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
            .mount(&server)
            .await;

        let annotator = HttpAnnotator::new(&config(&server, 10)).unwrap();
        let err = annotator
            .annotate(&["some cleaned text".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Annotator(msg) if msg.contains("503")));
    }
}
