//! Shared types used across the leakgate crates.
//!
//! This module defines common newtypes and enums that provide type safety
//! and clear domain modeling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for batch identifiers.
///
/// Generated as a random UUID v4 when a batch starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(String);

impl BatchId {
    /// Create a new random `BatchId` using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Categories of personal information the content scanner reports.
///
/// Variant order is the phase order used to sort findings on the same line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiCategory {
    /// Seven-digit patient identifier
    PatientId,
    /// First name and surname
    FullName,
    /// Street name followed by a house number
    Address,
}

impl PiiCategory {
    /// All categories in phase order.
    pub const ALL: [Self; 3] = [Self::PatientId, Self::FullName, Self::Address];

    /// Get a human-readable display name for the category.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PatientId => "Patient ID",
            Self::FullName => "Full Name",
            Self::Address => "Address",
        }
    }
}

impl fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One instance of suspected personal information in file content.
///
/// Immutable once created; owned by the scan result it is appended to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finding {
    /// What kind of information was matched
    pub category: PiiCategory,
    /// Path of the file, relative to the batch root
    pub file: String,
    /// 1-based line number
    pub line: usize,
    /// 1-based byte column of the match start within the line
    pub column: usize,
    /// The matched span
    pub matched_text: String,
}

impl Finding {
    /// Create a new finding.
    #[must_use]
    pub fn new(
        category: PiiCategory,
        file: impl Into<String>,
        line: usize,
        column: usize,
        matched_text: impl Into<String>,
    ) -> Self {
        Self {
            category,
            file: file.into(),
            line,
            column,
            matched_text: matched_text.into(),
        }
    }

    /// Stable report order within one file: line, then phase, then column.
    #[must_use]
    pub fn sort_key(&self) -> (usize, PiiCategory, usize) {
        (self.line, self.category, self.column)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.file, self.line, self.category, self.matched_text
        )
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
