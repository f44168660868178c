use leakgate_core::LeakgateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Rules error: {0}")]
    Rules(#[from] leakgate_rules::RulesError),

    #[error("Reference data error: {0}")]
    Discovery(#[from] leakgate_discovery::DiscoveryError),

    #[error("Unreadable content at {path}: {reason}")]
    UnreadableContent { path: String, reason: String },

    #[error("File too large to scan: {path} ({size} bytes, limit {limit})")]
    TooLarge { path: String, size: u64, limit: u64 },

    #[error("Batch cancelled before a verdict was produced")]
    Cancelled,
}

impl From<ScanError> for LeakgateError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Rules(e) => e.into(),
            ScanError::Discovery(e) => e.into(),
            ScanError::UnreadableContent { .. } | ScanError::TooLarge { .. } => {
                LeakgateError::UnreadableContent(err.to_string())
            }
            ScanError::Cancelled => LeakgateError::Internal(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
