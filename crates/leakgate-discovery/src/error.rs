use crate::corpus::ReferenceList;
use leakgate_core::LeakgateError;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for the reference corpus.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A reference list is absent or holds no tokens.
    ///
    /// Fatal for the batch: scanning must not silently run without it.
    #[error("missing reference data: {list} list{}", location(.path))]
    MissingReferenceData {
        /// Which list is missing
        list: ReferenceList,
        /// Where it was expected, if it came from disk
        path: Option<PathBuf>,
    },

    /// A reference list exists but could not be read.
    #[error("failed to read {list} list at {path}: {source}")]
    Io {
        /// Which list failed
        list: ReferenceList,
        /// Path of the list
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl From<DiscoveryError> for LeakgateError {
    fn from(err: DiscoveryError) -> Self {
        match err {
            DiscoveryError::Io { source, .. } => LeakgateError::Io(source),
            missing @ DiscoveryError::MissingReferenceData { .. } => {
                LeakgateError::MissingReferenceData(missing.to_string())
            }
        }
    }
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
