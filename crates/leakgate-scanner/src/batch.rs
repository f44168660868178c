//! Batch scanner for coordinating path classification and content scans.
//!
//! This module provides the `BatchScanner` which evaluates a batch of
//! candidate files against the forbidden rules and the personal-information
//! scanner, reading content concurrently and producing a single verdict.

use crate::error::{Result, ScanError};
use crate::result::{ScanReport, ScanResult, SkipReason, SkippedFile};
use crate::source::ContentSource;
use futures::stream::{FuturesUnordered, StreamExt};
use leakgate_core::{BatchId, Timestamp};
use leakgate_discovery::{sniff_content, FileContent, PiiScanner, ReferenceCorpus, DEFAULT_SNIFF_BYTES};
use leakgate_rules::RuleSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Default number of concurrent content reads.
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// A candidate file with optional content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the repository root
    pub path: String,
    /// Content, or `None` to classify by path only (e.g. a deleted file)
    pub content: Option<FileContent>,
}

impl FileEntry {
    /// An entry classified by path only.
    #[must_use]
    pub fn path_only(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: None,
        }
    }

    /// An entry with text content.
    #[must_use]
    pub fn text(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: Some(FileContent::Text(content.into())),
        }
    }

    /// An entry with binary content.
    #[must_use]
    pub fn binary(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: Some(FileContent::Binary),
        }
    }
}

/// What is known about a file's content before evaluation.
enum Prepared {
    Text(String),
    PathOnly,
    Skipped(SkipReason),
}

impl From<Option<FileContent>> for Prepared {
    fn from(content: Option<FileContent>) -> Self {
        match content {
            Some(FileContent::Text(text)) => Self::Text(text),
            Some(FileContent::Binary) => Self::Skipped(SkipReason::Binary),
            None => Self::PathOnly,
        }
    }
}

/// Evaluates batches of candidate files.
pub struct BatchScanner {
    /// Forbidden rules, shared across batches
    rules: Arc<RuleSet>,
    /// Content scanner over the reference corpus
    scanner: PiiScanner,
    /// Maximum concurrent content reads
    max_concurrent: usize,
    /// Aborts a batch without a verdict
    cancel: CancellationToken,
    /// Leading bytes inspected when sniffing read content
    sniff_bytes: usize,
}

impl BatchScanner {
    /// Create a new batch scanner.
    #[must_use]
    pub fn new(rules: Arc<RuleSet>, corpus: Arc<ReferenceCorpus>) -> Self {
        Self {
            rules,
            scanner: PiiScanner::new(corpus),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            cancel: CancellationToken::new(),
            sniff_bytes: DEFAULT_SNIFF_BYTES,
        }
    }

    /// Set the maximum number of concurrent content reads.
    #[must_use]
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    /// Use a caller-owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Set how many leading bytes are checked for NUL when sniffing content.
    #[must_use]
    pub fn with_sniff_bytes(mut self, sniff_bytes: usize) -> Self {
        self.sniff_bytes = sniff_bytes;
        self
    }

    /// The rules this scanner classifies against.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Evaluate a batch whose content is already in memory.
    pub async fn scan_entries(&self, entries: Vec<FileEntry>) -> Result<ScanReport> {
        let prepared = entries
            .into_iter()
            .map(|entry| (entry.path, Prepared::from(entry.content)))
            .collect();

        self.evaluate(BatchId::generate(), prepared).await
    }

    /// Read, sniff and evaluate a batch of paths.
    ///
    /// Up to `max_concurrent` reads run at once. Files that cannot be read
    /// are still classified by path and reported as skipped; results keep
    /// the input order regardless of which read finishes first.
    pub async fn scan_paths(
        &self,
        source: &dyn ContentSource,
        paths: Vec<String>,
    ) -> Result<ScanReport> {
        let batch_id = BatchId::generate();
        tracing::debug!("Batch {} reading {} files", batch_id, paths.len());

        let read_all = self.read_all(source, paths);
        let prepared = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(ScanError::Cancelled),
            prepared = read_all => prepared,
        };

        self.evaluate(batch_id, prepared).await
    }

    /// Read every path, at most `max_concurrent` at a time, keeping input order.
    async fn read_all(&self, source: &dyn ContentSource, paths: Vec<String>) -> Vec<(String, Prepared)> {
        let mut slots: Vec<Option<Prepared>> = Vec::with_capacity(paths.len());
        slots.resize_with(paths.len(), || None);
        let mut futures = FuturesUnordered::new();

        for (index, path) in paths.iter().enumerate() {
            futures.push(async move { (index, self.read_one(source, path).await) });

            // Respect concurrency limit
            while futures.len() >= self.max_concurrent {
                if let Some((index, prepared)) = futures.next().await {
                    slots[index] = Some(prepared);
                }
            }
        }

        while let Some((index, prepared)) = futures.next().await {
            slots[index] = Some(prepared);
        }
        drop(futures);

        paths
            .into_iter()
            .zip(slots)
            .map(|(path, slot)| (path, slot.unwrap_or(Prepared::PathOnly)))
            .collect()
    }

    async fn read_one(&self, source: &dyn ContentSource, path: &str) -> Prepared {
        match source.read(path).await {
            Ok(bytes) => Prepared::from(Some(sniff_content(bytes, self.sniff_bytes))),
            Err(ScanError::TooLarge { size, limit, .. }) => {
                tracing::warn!("Skipping content scan of {} ({} bytes, limit {})", path, size, limit);
                Prepared::Skipped(SkipReason::TooLarge { size })
            }
            Err(ScanError::UnreadableContent { reason, .. }) => {
                tracing::warn!("Skipping content scan of {}: {}", path, reason);
                Prepared::Skipped(SkipReason::Unreadable { reason })
            }
            Err(e) => {
                tracing::warn!("Skipping content scan of {}: {}", path, e);
                Prepared::Skipped(SkipReason::Unreadable {
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn evaluate(&self, batch_id: BatchId, prepared: Vec<(String, Prepared)>) -> Result<ScanReport> {
        let mut classifications = Vec::with_capacity(prepared.len());
        let mut findings = Vec::new();
        let mut skipped = Vec::new();

        for (path, content) in prepared {
            if self.cancel.is_cancelled() {
                return Err(ScanError::Cancelled);
            }

            classifications.push(self.rules.classify(&path));

            match content {
                Prepared::Text(text) => findings.extend(self.scanner.scan(&path, &text)),
                Prepared::PathOnly => {}
                Prepared::Skipped(reason) => skipped.push(SkippedFile { path, reason }),
            }

            tokio::task::yield_now().await;
        }

        let result = ScanResult::aggregate(classifications, findings).with_skipped(skipped);

        tracing::info!(
            batch_id = %batch_id,
            files = result.classifications.len(),
            blocked_paths = result.blocked_paths().count(),
            findings = result.findings.len(),
            skipped = result.skipped.len(),
            blocked = result.blocked,
            "Batch evaluated"
        );

        Ok(ScanReport {
            batch_id,
            scanned_at: Timestamp::now(),
            result,
        })
    }
}
