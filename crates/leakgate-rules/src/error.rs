use leakgate_core::LeakgateError;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for rule loading and export.
#[derive(Debug, Error)]
pub enum RulesError {
    /// No blocked patterns were found between the section markers.
    ///
    /// Callers decide whether this is a pass-through or a configuration error.
    #[error("rule set contains no blocked patterns ({exceptions} exception rules ignored)")]
    EmptyRuleSet {
        /// Exception rules that were loaded anyway
        exceptions: usize,
    },

    /// Rule source could not be read.
    #[error("failed to read rule source {path}: {source}")]
    Io {
        /// Path of the rule source
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Ruleset document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RulesError> for LeakgateError {
    fn from(err: RulesError) -> Self {
        match err {
            RulesError::EmptyRuleSet { .. } => LeakgateError::EmptyRuleSet,
            RulesError::Io { source, .. } => LeakgateError::Io(source),
            RulesError::Serialization(e) => LeakgateError::Internal(e.to_string()),
        }
    }
}

/// Result type alias for rule operations.
pub type Result<T> = std::result::Result<T, RulesError>;
