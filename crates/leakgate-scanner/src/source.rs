//! Content sources for batch scans.
//!
//! The engine never reads files by itself; a [`ContentSource`] supplies the
//! bytes for a candidate path. [`FsContentSource`] reads from a working tree
//! with a per-attempt timeout and bounded retries.

use crate::error::{Result, ScanError};
use async_trait::async_trait;
use leakgate_core::ScanningConfig;
use leakgate_rules::normalize_path;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Supplies raw file content for a path relative to the batch root.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Read the content of `path`.
    async fn read(&self, path: &str) -> Result<Vec<u8>>;
}

/// Reads content from a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsContentSource {
    root: PathBuf,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
    max_file_size: u64,
}

impl FsContentSource {
    /// Create a source rooted at `root` with default limits.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(root, &ScanningConfig::default())
    }

    /// Create a source using the configured timeout, retries and size limit.
    #[must_use]
    pub fn from_config(root: impl Into<PathBuf>, config: &ScanningConfig) -> Self {
        Self {
            root: root.into(),
            timeout: Duration::from_secs(config.read_timeout_secs),
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            max_file_size: config.max_file_size_bytes,
        }
    }

    async fn read_once(&self, path: &str, full_path: &Path) -> Result<Vec<u8>> {
        let unreadable = |reason: String| ScanError::UnreadableContent {
            path: path.to_string(),
            reason,
        };
        let timed_out = || unreadable(format!("read timed out after {:?}", self.timeout));

        let metadata = tokio::time::timeout(self.timeout, tokio::fs::metadata(full_path))
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| unreadable(io_reason(&e)))?;

        if metadata.len() > self.max_file_size {
            return Err(ScanError::TooLarge {
                path: path.to_string(),
                size: metadata.len(),
                limit: self.max_file_size,
            });
        }

        tokio::time::timeout(self.timeout, tokio::fs::read(full_path))
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| unreadable(io_reason(&e)))
    }
}

#[async_trait]
impl ContentSource for FsContentSource {
    /// Read with retries; missing files and oversized files are not retried.
    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.root.join(normalize_path(path));
        let mut last_error = None;

        for attempt in 0..self.max_retries {
            match self.read_once(path, &full_path).await {
                Ok(bytes) => return Ok(bytes),
                Err(e @ ScanError::TooLarge { .. }) => return Err(e),
                Err(e) => {
                    if !tokio::fs::try_exists(&full_path).await.unwrap_or(true) {
                        return Err(e);
                    }
                    last_error = Some(e);

                    if attempt + 1 < self.max_retries {
                        let delay = self.retry_delay * (attempt + 1);
                        tracing::warn!(
                            "Read failed for {} (attempt {}/{}), retrying in {:?}...",
                            path,
                            attempt + 1,
                            self.max_retries,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ScanError::UnreadableContent {
            path: path.to_string(),
            reason: "no read attempts were made".to_string(),
        }))
    }
}

fn io_reason(error: &std::io::Error) -> String {
    match error.kind() {
        ErrorKind::NotFound => "file not found".to_string(),
        ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => error.to_string(),
    }
}
