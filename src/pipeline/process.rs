// src/pipeline/process.rs

//! Archive processing driver.
//!
//! One archive at a time: decode, screen, annotate the survivors in a single
//! batch, then partition, enrich and distribute in file order.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::annotator::{Annotator, annotate_checked};
use crate::error::{AppError, Result};
use crate::models::{Config, PostErrorPolicy, RawPost};
use crate::storage::QueueStore;
use crate::utils;

use super::archive::{list_archives, read_posts_blocking};
use super::distribute::Distributor;
use super::enrich::enrich;
use super::normalize::{Normalizer, Screened};
use super::partition::Partitioner;

/// Counters for one archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    /// Decoded records
    pub records: usize,
    /// Dropped by the language gate
    pub other_language: usize,
    /// Dropped by the content floor
    pub below_content_floor: usize,
    /// Dropped for lack of strong context
    pub no_strong_context: usize,
    /// Per-post failures skipped under the `skip` policy
    pub skipped: usize,
    /// Posts published to the expiring queue
    pub posts: usize,
    /// Entries published to the convolutional queue
    pub tokens: usize,
}

impl ArchiveReport {
    fn absorb(&mut self, other: &ArchiveReport) {
        self.records += other.records;
        self.other_language += other.other_language;
        self.below_content_floor += other.below_content_floor;
        self.no_strong_context += other.no_strong_context;
        self.skipped += other.skipped;
        self.posts += other.posts;
        self.tokens += other.tokens;
    }
}

/// Result of processing a directory of archives.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub archives: Vec<(PathBuf, ArchiveReport)>,
    pub totals: ArchiveReport,
}

impl RunReport {
    /// Write the totals to the log.
    pub fn log_summary(&self) {
        let t = &self.totals;
        utils::log::summary(
            "Run complete",
            &[
                ("Archives", self.archives.len().to_string()),
                ("Records", t.records.to_string()),
                ("Other language", t.other_language.to_string()),
                ("Below content floor", t.below_content_floor.to_string()),
                ("No strong context", t.no_strong_context.to_string()),
                ("Skipped (errors)", t.skipped.to_string()),
                ("Posts in expiring queue", t.posts.to_string()),
                ("Tokens in convolutional queue", t.tokens.to_string()),
                (
                    "Elapsed",
                    format!(
                        "{}s",
                        (self.finished_at - self.started_at).num_seconds()
                    ),
                ),
            ],
        );
    }
}

/// Normalizer, annotator, partitioner and distributor wired together.
///
/// The distributor's queue receivers must be drained while the pipeline runs
/// (see [`QueueReceivers::drain`](super::distribute::QueueReceivers::drain)),
/// or distribution stalls once a channel fills up.
pub struct Pipeline<S> {
    normalizer: Normalizer,
    partitioner: Partitioner,
    annotator: Box<dyn Annotator>,
    distributor: Distributor<S>,
    on_post_error: PostErrorPolicy,
}

impl<S: QueueStore> Pipeline<S> {
    pub fn new(config: &Config, annotator: Box<dyn Annotator>, distributor: Distributor<S>) -> Self {
        Self {
            normalizer: Normalizer::new(&config.filter),
            partitioner: Partitioner::new(&config.context),
            annotator,
            distributor,
            on_post_error: config.pipeline.on_post_error,
        }
    }

    pub fn distributor(&self) -> &Distributor<S> {
        &self.distributor
    }

    pub fn into_distributor(self) -> Distributor<S> {
        self.distributor
    }

    /// Skip a per-post failure if the policy allows it, otherwise propagate.
    fn tolerate(&self, err: AppError, report: &mut ArchiveReport) -> Result<()> {
        if self.on_post_error == PostErrorPolicy::Skip && err.is_per_post() {
            log::warn!("Skipping post: {}", err);
            report.skipped += 1;
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Process already decoded posts.
    pub async fn process_posts(&mut self, records: Vec<RawPost>) -> Result<ArchiveReport> {
        let mut report = ArchiveReport {
            records: records.len(),
            ..ArchiveReport::default()
        };

        let mut posts = Vec::new();
        let mut texts = Vec::new();
        for post in records {
            match self.normalizer.screen(&post) {
                Ok(Screened::Accepted(cleaned)) => {
                    posts.push(post);
                    texts.push(cleaned.into_inner());
                }
                Ok(Screened::OtherLanguage) => report.other_language += 1,
                Ok(Screened::BelowContentFloor) => report.below_content_floor += 1,
                Err(e) => self.tolerate(e, &mut report)?,
            }
        }

        log::debug!("Annotating {} posts", texts.len());
        let annotations = annotate_checked(self.annotator.as_ref(), &texts).await?;

        for (post, annotation) in posts.into_iter().zip(annotations) {
            let context = match self.partitioner.partition(&post, &annotation) {
                Ok(Some(context)) => context,
                Ok(None) => {
                    report.no_strong_context += 1;
                    continue;
                }
                Err(e) => {
                    self.tolerate(e, &mut report)?;
                    continue;
                }
            };

            let enriched = match enrich(post, context) {
                Ok(enriched) => enriched,
                Err(e) => {
                    self.tolerate(e, &mut report)?;
                    continue;
                }
            };

            let published = self.distributor.distribute(&enriched).await?;
            report.posts += published.expiring;
            report.tokens += published.convolutional;
        }

        Ok(report)
    }

    /// Process one archive file.
    pub async fn process_archive(&mut self, path: &Path) -> Result<ArchiveReport> {
        log::info!("Processing file {}", path.display());
        let records = read_posts_blocking(path.to_path_buf()).await?;
        let report = self.process_posts(records).await?;

        utils::log::sub_item(&format!(
            "{} records, {} posts, {} tokens",
            report.records, report.posts, report.tokens
        ));
        Ok(report)
    }

    /// Process every archive in `dir`, in sorted order.
    pub async fn run_directory(&mut self, dir: &Path) -> Result<RunReport> {
        let files = list_archives(dir).await?;
        utils::log::header(&format!("Processing {}", dir.display()));
        self.run_files(&files).await
    }

    /// Process the given archives in order.
    pub async fn run_files(&mut self, files: &[PathBuf]) -> Result<RunReport> {
        let started_at = Utc::now();
        log::info!("Files to process: {}", files.len());

        let mut archives = Vec::with_capacity(files.len());
        let mut totals = ArchiveReport::default();
        for (i, path) in files.iter().enumerate() {
            utils::log::step(i + 1, files.len(), &path.display().to_string());
            let report = self.process_archive(path).await?;
            totals.absorb(&report);
            archives.push((path.clone(), report));
        }

        Ok(RunReport {
            started_at,
            finished_at: Utc::now(),
            archives,
            totals,
        })
    }
}
