//! Leakgate Scanner - batch evaluation of candidate files.
//!
//! This crate ties the rule matcher and the personal-information scanner
//! together. A batch of candidate paths is classified against the forbidden
//! rules, text content is scanned for personal information, and everything
//! is folded into one pass/block verdict.
//!
//! # Features
//!
//! - Concurrent content reads with a configurable limit
//! - Per-read timeout and bounded retries for filesystem sources
//! - Binary and oversized files classified by path only
//! - Cancellation that aborts a batch without a partial verdict
//!
//! # Example
//!
//! ```rust,ignore
//! use leakgate_scanner::{BatchScanner, FsContentSource};
//! use std::sync::Arc;
//!
//! let scanner = BatchScanner::new(Arc::new(rules), Arc::new(corpus))
//!     .with_max_concurrent(config.scanning.max_concurrent_reads);
//! let source = FsContentSource::from_config(".", &config.scanning);
//!
//! let report = scanner.scan_paths(&source, staged_paths).await?;
//! if report.is_blocked() {
//!     std::process::exit(1);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod batch;
#[allow(missing_docs)]
pub mod error;
pub mod result;
pub mod source;

// Re-export commonly used types
pub use batch::{BatchScanner, FileEntry};
pub use error::{Result, ScanError};
pub use result::{ScanReport, ScanResult, SkipReason, SkippedFile};
pub use source::{ContentSource, FsContentSource};
