//! Leakgate Core - Foundation crate for the leakgate detection engine.
//!
//! This crate provides the shared types, error handling and configuration
//! management that the rules, discovery and scanner crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`BatchId`, `PiiCategory`, `Finding`, `Timestamp`)
//!
//! # Example
//!
//! ```rust
//! use leakgate_core::{AppConfig, PiiCategory};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.rules.begin_marker, "# BEGIN FORBIDDEN");
//! assert_eq!(PiiCategory::PatientId.display_name(), "Patient ID");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, CorpusConfig, RulesConfig, ScanningConfig};
pub use error::{ConfigError, ConfigResult, LeakgateError, Result};
pub use types::{BatchId, Finding, PiiCategory, Timestamp};
