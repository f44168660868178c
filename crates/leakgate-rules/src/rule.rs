//! Rules, rule sets and path classification.

use crate::matcher::{normalize_path, GlobPattern};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Whether a rule blocks or re-allows the paths it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Forbidden pattern
    Blocked,
    /// `!`-prefixed exception that re-allows a path
    Exception,
}

/// A single forbidden or exception pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    /// Glob pattern, without the `!` prefix
    pub pattern: String,
    /// Blocked or exception
    pub kind: RuleKind,
    /// Position in the rule set; the only tie-break between rules
    pub source_order: usize,
    /// 1-based line in the rule source, 0 when built in code
    pub line: usize,
}

impl Rule {
    /// A forbidden pattern.
    #[must_use]
    pub fn blocked(pattern: impl Into<String>) -> Self {
        Self::new(pattern, RuleKind::Blocked)
    }

    /// An exception pattern.
    #[must_use]
    pub fn exception(pattern: impl Into<String>) -> Self {
        Self::new(pattern, RuleKind::Exception)
    }

    fn new(pattern: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
            source_order: 0,
            line: 0,
        }
    }

    /// Set the source line this rule was read from.
    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Check if this is an exception rule.
    #[must_use]
    pub fn is_exception(&self) -> bool {
        self.kind == RuleKind::Exception
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exception() {
            write!(f, "!{}", self.pattern)?;
        } else {
            write!(f, "{}", self.pattern)?;
        }
        if self.line > 0 {
            write!(f, " (line {})", self.line)?;
        }
        Ok(())
    }
}

/// Outcome of matching a path against a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The path may be submitted
    Allowed,
    /// The path matches a forbidden pattern
    Blocked,
}

/// Classification of one path, with the last matching rule for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Path as supplied by the caller
    pub path: String,
    /// Final state after all rules were applied
    pub verdict: Verdict,
    /// Last rule that matched, if any
    pub rule: Option<Rule>,
}

impl Classification {
    /// Check if the path is blocked.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.verdict == Verdict::Blocked
    }
}

/// Ordered, immutable list of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    compiled: Vec<GlobPattern>,
}

impl RuleSet {
    /// Build a rule set; `source_order` is assigned from the vector position.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        let rules: Vec<Rule> = rules
            .into_iter()
            .enumerate()
            .map(|(source_order, rule)| Rule {
                source_order,
                ..rule
            })
            .collect();
        let compiled = rules
            .iter()
            .map(|rule| {
                GlobPattern::compile(&rule.pattern).unwrap_or_else(|e| {
                    warn!(rule = %rule, error = %e, "invalid pattern never matches");
                    GlobPattern::never()
                })
            })
            .collect();

        Self { rules, compiled }
    }

    /// A rule set that allows every path.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rules in source order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of blocked (non-exception) rules.
    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.rules.iter().filter(|r| !r.is_exception()).count()
    }

    /// Classify a path with last-match-wins semantics.
    ///
    /// Every rule is evaluated; a later match always overrides an earlier
    /// one, so an exception re-allows a path only when it follows the block.
    #[must_use]
    pub fn classify(&self, path: &str) -> Classification {
        let normalized = normalize_path(path);
        let mut verdict = Verdict::Allowed;
        let mut winning: Option<&Rule> = None;

        for (rule, pattern) in self.rules.iter().zip(&self.compiled) {
            if pattern.matches(&normalized) {
                verdict = match rule.kind {
                    RuleKind::Blocked => Verdict::Blocked,
                    RuleKind::Exception => Verdict::Allowed,
                };
                winning = Some(rule);
            }
        }

        if verdict == Verdict::Blocked {
            if let Some(rule) = winning {
                debug!(path = %path, rule = %rule, "path blocked");
            }
        }

        Classification {
            path: path.to_string(),
            verdict,
            rule: winning.cloned(),
        }
    }
}
