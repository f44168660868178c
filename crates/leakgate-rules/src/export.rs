//! Hosted push-ruleset export.
//!
//! Turns a forbidden-extension list (or the blocked patterns of a loaded
//! [`RuleSet`]) into the push ruleset document a hosting service enforces on
//! its side, so the remote gate blocks the same file types as the local one.

use crate::error::Result;
use crate::rule::RuleSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default ruleset name.
pub const DEFAULT_RULESET_NAME: &str = "Block Forbidden File Types";

/// Parse a forbidden-extension list into `*.ext` patterns.
///
/// One extension per line; blank and `#` lines are skipped. Multi-dot
/// extensions such as `nii.gz` are kept whole, and entries already written
/// as `.ext` or `*.ext` are not prefixed twice.
#[must_use]
pub fn parse_extension_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let ext = line.trim_start_matches('*').trim_start_matches('.');
            format!("*.{ext}")
        })
        .collect()
}

/// Push ruleset document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushRuleset {
    /// Ruleset name
    pub name: String,
    /// Always `push`
    pub target: String,
    /// Always `active`
    pub enforcement: String,
    /// Where the ruleset applies
    pub conditions: RulesetConditions,
    /// Restrictions enforced on push
    pub rules: Vec<RulesetRule>,
}

/// Ruleset conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesetConditions {
    /// File paths the ruleset covers
    pub file_paths: IncludedPaths,
    /// Branches the ruleset covers
    pub branches: IncludedBranches,
}

/// File path condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedPaths {
    /// Covered patterns
    pub included: Vec<String>,
}

/// Branch condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedBranches {
    /// Covered branch patterns
    pub includes: Vec<String>,
}

/// A single ruleset restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesetRule {
    /// Restriction type
    #[serde(rename = "type")]
    pub rule_type: String,
    /// Restriction parameters
    pub parameters: RestrictionParameters,
}

/// Parameters of a file path restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionParameters {
    /// Patterns refused on push
    pub restricted_file_patterns: Vec<String>,
}

impl PushRuleset {
    /// Build a ruleset restricting the given patterns on every branch.
    #[must_use]
    pub fn from_patterns(name: impl Into<String>, patterns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            target: "push".to_string(),
            enforcement: "active".to_string(),
            conditions: RulesetConditions {
                file_paths: IncludedPaths {
                    included: patterns.clone(),
                },
                branches: IncludedBranches {
                    includes: vec!["*".to_string()],
                },
            },
            rules: vec![RulesetRule {
                rule_type: "file_path_restriction".to_string(),
                parameters: RestrictionParameters {
                    restricted_file_patterns: patterns,
                },
            }],
        }
    }

    /// Build a ruleset from the blocked patterns of a rule set.
    ///
    /// Exceptions have no push-ruleset equivalent and are dropped.
    #[must_use]
    pub fn from_rule_set(name: impl Into<String>, rules: &RuleSet) -> Self {
        let mut patterns = Vec::new();
        for rule in rules.rules() {
            if rule.is_exception() {
                warn!(rule = %rule, "exception rule cannot be exported, dropping");
            } else if !patterns.contains(&rule.pattern) {
                patterns.push(rule.pattern.clone());
            }
        }
        Self::from_patterns(name, patterns)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
