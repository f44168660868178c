//! Batch verdict aggregation.
//!
//! [`ScanResult::aggregate`] is pure composition: the verdict is blocked
//! iff any path classification is blocked or any finding exists.

use leakgate_core::{BatchId, Finding, PiiCategory, Timestamp};
use leakgate_rules::Classification;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a file was classified by path only, without a content scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Content is binary
    Binary,
    /// Content exceeds the configured size limit
    TooLarge {
        /// Size in bytes
        size: u64,
    },
    /// Content could not be read
    Unreadable {
        /// Read failure description
        reason: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "binary content"),
            Self::TooLarge { size } => write!(f, "too large ({size} bytes)"),
            Self::Unreadable { reason } => write!(f, "unreadable: {reason}"),
        }
    }
}

/// A file whose content was not PII-scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Path as supplied by the caller
    pub path: String,
    /// Why the content scan was skipped
    pub reason: SkipReason,
}

/// All classifications and findings of a batch, with the overall verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// One classification per input path, in input order
    pub classifications: Vec<Classification>,
    /// Findings, grouped by file in input order
    pub findings: Vec<Finding>,
    /// Files that were classified but not content-scanned
    pub skipped: Vec<SkippedFile>,
    /// Any path blocked or any finding present
    pub blocked: bool,
}

impl ScanResult {
    /// Combine classifications and findings into a verdict.
    #[must_use]
    pub fn aggregate(classifications: Vec<Classification>, findings: Vec<Finding>) -> Self {
        let blocked = !findings.is_empty() || classifications.iter().any(Classification::is_blocked);
        Self {
            classifications,
            findings,
            skipped: Vec::new(),
            blocked,
        }
    }

    /// Attach the list of files that were not content-scanned.
    #[must_use]
    pub fn with_skipped(mut self, skipped: Vec<SkippedFile>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Classifications with a blocked verdict.
    pub fn blocked_paths(&self) -> impl Iterator<Item = &Classification> {
        self.classifications.iter().filter(|c| c.is_blocked())
    }

    /// Findings of one category.
    pub fn findings_for(&self, category: PiiCategory) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.category == category)
    }

    /// Findings grouped per file, files in the order they were scanned.
    #[must_use]
    pub fn findings_by_file(&self) -> Vec<(&str, Vec<&Finding>)> {
        let mut groups: Vec<(&str, Vec<&Finding>)> = Vec::new();
        for finding in &self.findings {
            match groups.iter_mut().find(|(file, _)| *file == finding.file) {
                Some((_, group)) => group.push(finding),
                None => groups.push((finding.file.as_str(), vec![finding])),
            }
        }
        groups
    }

    /// Blocked paths plus findings.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.blocked_paths().count() + self.findings.len()
    }
}

/// A batch result with its identity and time of evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Batch identifier, also logged with every batch event
    pub batch_id: BatchId,
    /// When the batch was evaluated
    pub scanned_at: Timestamp,
    /// The verdict and its evidence
    #[serde(flatten)]
    pub result: ScanResult,
}

impl ScanReport {
    /// Check the overall verdict.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.result.blocked
    }
}
