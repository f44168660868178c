//! Core error types for leakgate.
//!
//! This module defines the central error type used across all crates. The
//! rules, discovery and scanner crates keep their own error enums and convert
//! into [`LeakgateError`] at crate boundaries.

use thiserror::Error;

/// Central error type for all leakgate operations.
#[derive(Error, Debug)]
pub enum LeakgateError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A reference list (first names, surnames, street names) is absent.
    ///
    /// Fatal for the whole batch: no partial scan is meaningful without it.
    #[error("missing reference data: {0}")]
    MissingReferenceData(String),

    /// The forbidden list contains no blocked patterns.
    #[error("rule set contains no blocked patterns")]
    EmptyRuleSet,

    /// File content could not be read or decoded.
    #[error("unreadable content: {0}")]
    UnreadableContent(String),

    /// A rule line was rejected by the loader.
    #[error("malformed rule line: {0}")]
    MalformedRuleLine(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl LeakgateError {
    /// Whether this error must stop the batch before any verdict is produced.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::EmptyRuleSet | Self::UnreadableContent(_) | Self::MalformedRuleLine(_)
        )
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Config file not found
    #[error("config file not found at {path}")]
    NotFound {
        /// Path where config was expected
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `LeakgateError`.
pub type Result<T> = std::result::Result<T, LeakgateError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
