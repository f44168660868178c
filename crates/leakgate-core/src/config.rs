//! Configuration management for leakgate.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Reference-list locations are explicit
//! fields here; the engine itself never reads the environment.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the rule file location.
pub const ENV_RULES: &str = "LEAKGATE_RULES";
/// Environment variable overriding the first-name list location.
pub const ENV_FIRST_NAMES: &str = "LEAKGATE_FIRST_NAMES";
/// Environment variable overriding the surname list location.
pub const ENV_SURNAMES: &str = "LEAKGATE_SURNAMES";
/// Environment variable overriding the street-name list location.
pub const ENV_STREET_NAMES: &str = "LEAKGATE_STREET_NAMES";
/// Environment variable overriding the read concurrency.
pub const ENV_MAX_CONCURRENT_READS: &str = "LEAKGATE_MAX_CONCURRENT_READS";

/// Main application configuration.
///
/// This is loaded from `~/.config/leakgate/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Forbidden-list settings
    pub rules: RulesConfig,
    /// Reference corpus locations
    pub corpus: CorpusConfig,
    /// Batch scanning behavior
    pub scanning: ScanningConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `LEAKGATE_RULES`: rule file path
    /// - `LEAKGATE_FIRST_NAMES`, `LEAKGATE_SURNAMES`, `LEAKGATE_STREET_NAMES`: reference lists
    /// - `LEAKGATE_MAX_CONCURRENT_READS`: read concurrency
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] when a numeric override doesn't parse.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_RULES) {
            tracing::debug!("Override rules.path from env: {}", val);
            self.rules.path = Some(PathBuf::from(val));
        }

        if let Some(val) = lookup(ENV_FIRST_NAMES) {
            tracing::debug!("Override corpus.first_names from env: {}", val);
            self.corpus.first_names = PathBuf::from(val);
        }

        if let Some(val) = lookup(ENV_SURNAMES) {
            tracing::debug!("Override corpus.surnames from env: {}", val);
            self.corpus.surnames = PathBuf::from(val);
        }

        if let Some(val) = lookup(ENV_STREET_NAMES) {
            tracing::debug!("Override corpus.street_names from env: {}", val);
            self.corpus.street_names = PathBuf::from(val);
        }

        if let Some(val) = lookup(ENV_MAX_CONCURRENT_READS) {
            let n = val.trim().parse().map_err(|_| {
                invalid(
                    ENV_MAX_CONCURRENT_READS,
                    &format!("expected a whole number, got '{val}'"),
                )
            })?;
            self.scanning.max_concurrent_reads = n;
            tracing::debug!("Override scanning.max_concurrent_reads from env: {}", n);
        }

        Ok(())
    }

    /// Reject values the scanner cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanning.max_concurrent_reads == 0 {
            return Err(invalid("scanning.max_concurrent_reads", "must be at least 1"));
        }
        if self.scanning.max_retries == 0 {
            return Err(invalid("scanning.max_retries", "must be at least 1"));
        }
        if self.scanning.read_timeout_secs == 0 {
            return Err(invalid("scanning.read_timeout_secs", "must be at least 1"));
        }
        if self.rules.begin_marker.trim().is_empty() || self.rules.end_marker.trim().is_empty() {
            return Err(invalid("rules.begin_marker/end_marker", "markers must not be blank"));
        }
        if self.rules.begin_marker.trim() == self.rules.end_marker.trim() {
            return Err(invalid("rules.begin_marker/end_marker", "markers must differ"));
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/leakgate/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = project_dirs().ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path, where reference lists live by default.
    ///
    /// Uses XDG base directories: `~/.local/share/leakgate`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs = project_dirs().ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "leakgate", "leakgate")
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Forbidden-list settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule file; `None` leaves the choice to the caller
    pub path: Option<PathBuf>,
    /// Line opening a forbidden section
    pub begin_marker: String,
    /// Line closing a forbidden section
    pub end_marker: String,
    /// Treat a list without blocked patterns as a configuration error
    pub empty_is_error: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: None,
            begin_marker: "# BEGIN FORBIDDEN".to_string(),
            end_marker: "# END FORBIDDEN".to_string(),
            empty_is_error: false,
        }
    }
}

/// Reference corpus locations, one plain-text list per category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// First names, one per line
    pub first_names: PathBuf,
    /// Surnames, one per line
    pub surnames: PathBuf,
    /// Street names, one per line
    pub street_names: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        let base = AppConfig::data_dir().unwrap_or_default();
        Self {
            first_names: base.join("voornamen.txt"),
            surnames: base.join("achternamen.txt"),
            street_names: base.join("straatnamen.txt"),
        }
    }
}

/// Batch scanning behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Files read concurrently
    pub max_concurrent_reads: usize,
    /// Per-attempt read timeout in seconds
    pub read_timeout_secs: u64,
    /// Read attempts per file
    pub max_retries: u32,
    /// Base delay between read attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Files larger than this are classified but not PII-scanned
    pub max_file_size_bytes: u64,
    /// Leading bytes inspected when sniffing for binary content
    pub binary_sniff_bytes: usize,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            max_concurrent_reads: 8,
            read_timeout_secs: 10,
            max_retries: 3,
            retry_delay_ms: 200,
            max_file_size_bytes: 10 * 1024 * 1024,
            binary_sniff_bytes: 8000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.rules.begin_marker, "# BEGIN FORBIDDEN");
        assert_eq!(config.rules.end_marker, "# END FORBIDDEN");
        assert!(!config.rules.empty_is_error);
        assert_eq!(config.scanning.max_concurrent_reads, 8);
        assert!(config.corpus.first_names.ends_with("voornamen.txt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[rules]"));
        assert!(toml_str.contains("[corpus]"));
        assert!(toml_str.contains("[scanning]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.rules.begin_marker, config.rules.begin_marker);
    }

    #[test]
    fn test_config_load_from() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.rules.empty_is_error = true;
        config.scanning.max_retries = 5;

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded = AppConfig::load_from(&config_path).expect("load config");
        assert!(loaded.rules.empty_is_error);
        assert_eq!(loaded.scanning.max_retries, 5);
    }

    #[test]
    fn test_load_from_missing_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let result = AppConfig::load_from(&tmp.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_RULES, "/etc/leakgate/forbidden.txt"),
            (ENV_FIRST_NAMES, "/data/first.txt"),
            (ENV_MAX_CONCURRENT_READS, "2"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(ToString::to_string))
            .expect("apply overrides");

        assert_eq!(
            config.rules.path.as_deref(),
            Some(Path::new("/etc/leakgate/forbidden.txt"))
        );
        assert_eq!(config.corpus.first_names, PathBuf::from("/data/first.txt"));
        assert!(config.corpus.surnames.ends_with("achternamen.txt"));
        assert_eq!(config.scanning.max_concurrent_reads, 2);
    }

    #[test]
    fn test_unparseable_override_is_rejected() {
        let mut config = AppConfig::default();
        let result =
            config.apply_overrides(|key| (key == ENV_MAX_CONCURRENT_READS).then(|| "many".to_string()));

        match result {
            Err(ConfigError::InvalidValue { field, reason }) => {
                assert_eq!(field, ENV_MAX_CONCURRENT_READS);
                assert!(reason.contains("'many'"));
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
        assert_eq!(config.scanning.max_concurrent_reads, 8);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = AppConfig::default();
        config.scanning.max_concurrent_reads = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_identical_markers() {
        let mut config = AppConfig::default();
        config.rules.end_marker = config.rules.begin_marker.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[rules]
path = "forbidden.txt"

[scanning]
max_retries = 1
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.rules.path, Some(PathBuf::from("forbidden.txt")));
        assert_eq!(config.scanning.max_retries, 1);
        // These should be defaults
        assert_eq!(config.rules.end_marker, "# END FORBIDDEN");
        assert_eq!(config.scanning.read_timeout_secs, 10);
    }
}
