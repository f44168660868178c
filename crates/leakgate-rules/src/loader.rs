//! Rule loading from forbidden-list text.
//!
//! Only lines between a begin marker and an end marker are read. A file may
//! carry several marked sections; their rules accumulate in file order.

use crate::error::{Result, RulesError};
use crate::matcher::GlobPattern;
use crate::rule::{Rule, RuleKind, RuleSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default line opening a forbidden section.
pub const DEFAULT_BEGIN_MARKER: &str = "# BEGIN FORBIDDEN";

/// Default line closing a forbidden section.
pub const DEFAULT_END_MARKER: &str = "# END FORBIDDEN";

/// The pair of lines delimiting a forbidden section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMarkers {
    /// Line opening a section
    pub begin: String,
    /// Line closing a section
    pub end: String,
}

impl SectionMarkers {
    /// Custom markers.
    #[must_use]
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin: begin.into(),
            end: end.into(),
        }
    }
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_BEGIN_MARKER, DEFAULT_END_MARKER)
    }
}

/// A rule line that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedLine {
    /// 1-based line number
    pub line: usize,
    /// The trimmed line text
    pub content: String,
    /// Why it was rejected
    pub reason: String,
}

impl fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {:?}: {}", self.line, self.content, self.reason)
    }
}

impl From<MalformedLine> for leakgate_core::LeakgateError {
    fn from(line: MalformedLine) -> Self {
        Self::MalformedRuleLine(line.to_string())
    }
}

/// Result of loading rule text.
#[derive(Debug, Clone)]
pub struct LoadedRules {
    /// The loaded rules
    pub rules: RuleSet,
    /// Lines skipped as malformed
    pub malformed: Vec<MalformedLine>,
    /// Number of marked sections seen
    pub sections: usize,
}

/// Parses forbidden-list text into a [`RuleSet`].
#[derive(Debug, Clone, Default)]
pub struct RuleSetLoader {
    markers: SectionMarkers,
}

impl RuleSetLoader {
    /// Create a loader with the given section markers.
    #[must_use]
    pub fn new(markers: SectionMarkers) -> Self {
        Self { markers }
    }

    /// Read a rule file and parse it.
    ///
    /// # Errors
    /// Returns `Io` if the file can't be read, or `EmptyRuleSet` if it
    /// contains no blocked patterns.
    pub fn load_file(&self, path: &Path) -> Result<LoadedRules> {
        let text = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let loaded = self.parse(&text)?;

        info!(
            rules = loaded.rules.len(),
            sections = loaded.sections,
            path = %path.display(),
            "loaded forbidden rules"
        );

        Ok(loaded)
    }

    /// Parse rule text.
    ///
    /// Blank and `#` lines are skipped, `!` marks an exception, and malformed
    /// lines are reported in [`LoadedRules::malformed`] without aborting.
    ///
    /// # Errors
    /// Returns `EmptyRuleSet` if no blocked pattern was loaded.
    pub fn parse(&self, text: &str) -> Result<LoadedRules> {
        let begin = self.markers.begin.trim();
        let end = self.markers.end.trim();

        let mut rules = Vec::new();
        let mut malformed = Vec::new();
        let mut sections = 0;
        let mut open_since: Option<usize> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line == begin {
                if let Some(start) = open_since {
                    warn!(line = line_no, open_since = start, "nested begin marker ignored");
                } else {
                    open_since = Some(line_no);
                    sections += 1;
                }
                continue;
            }

            if line == end {
                if open_since.take().is_none() {
                    debug!(line = line_no, "end marker without begin marker");
                }
                continue;
            }

            if open_since.is_none() || line.is_empty() || line.starts_with('#') {
                continue;
            }

            match parse_rule_line(line) {
                Ok((kind, pattern)) => {
                    let rule = match kind {
                        RuleKind::Blocked => Rule::blocked(pattern),
                        RuleKind::Exception => Rule::exception(pattern),
                    };
                    rules.push(rule.at_line(line_no));
                }
                Err(reason) => {
                    let skipped = MalformedLine {
                        line: line_no,
                        content: line.to_string(),
                        reason,
                    };
                    warn!("skipping malformed rule {}", skipped);
                    malformed.push(skipped);
                }
            }
        }

        if let Some(start) = open_since {
            warn!(
                line = start,
                "forbidden section is never closed; rules up to end of input were loaded"
            );
        }

        let rules = RuleSet::new(rules);
        let blocked = rules.blocked_count();
        if blocked == 0 {
            return Err(RulesError::EmptyRuleSet {
                exceptions: rules.len(),
            });
        }

        debug!(
            blocked,
            exceptions = rules.len() - blocked,
            malformed = malformed.len(),
            "parsed forbidden rules"
        );

        Ok(LoadedRules {
            rules,
            malformed,
            sections,
        })
    }
}

/// Split a trimmed, non-comment line into its kind and pattern.
fn parse_rule_line(line: &str) -> std::result::Result<(RuleKind, String), String> {
    let (kind, body) = match line.strip_prefix('!') {
        Some(rest) => (RuleKind::Exception, rest.trim()),
        None => (RuleKind::Blocked, line),
    };

    // `\!` and `\#` escape a literal leading character.
    let body = body.strip_prefix('\\').unwrap_or(body);

    if body.is_empty() {
        return Err("exception marker without a pattern".to_string());
    }
    if body.chars().any(char::is_control) {
        return Err("pattern contains control characters".to_string());
    }
    if body.chars().all(|c| c == '/') {
        return Err("pattern matches no file".to_string());
    }
    if let Err(e) = GlobPattern::compile(body) {
        return Err(format!("invalid pattern: {e}"));
    }

    Ok((kind, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> LoadedRules {
        RuleSetLoader::default().parse(text).expect("parse rules")
    }

    #[test]
    fn test_only_marked_lines_loaded() {
        let text = "\
*.outside
# BEGIN FORBIDDEN
*.csv
# a comment

!demo.csv
# END FORBIDDEN
*.also-outside
";
        let loaded = parse(text);
        let patterns: Vec<&str> = loaded
            .rules
            .rules()
            .iter()
            .map(|r| r.pattern.as_str())
            .collect();
        assert_eq!(patterns, vec!["*.csv", "demo.csv"]);
        assert_eq!(loaded.rules.rules()[1].kind, RuleKind::Exception);
        assert_eq!(loaded.rules.rules()[1].line, 6);
        assert_eq!(loaded.sections, 1);
    }

    #[test]
    fn test_multiple_sections_accumulate() {
        let text = "\
# BEGIN FORBIDDEN
*.sav
# END FORBIDDEN
advisory text
# BEGIN FORBIDDEN
*.json
!package.json
# END FORBIDDEN
";
        let loaded = parse(text);
        assert_eq!(loaded.sections, 2);
        let orders: Vec<(usize, &str)> = loaded
            .rules
            .rules()
            .iter()
            .map(|r| (r.source_order, r.pattern.as_str()))
            .collect();
        assert_eq!(
            orders,
            vec![(0, "*.sav"), (1, "*.json"), (2, "package.json")]
        );
    }

    #[test]
    fn test_markers_are_trimmed() {
        let loaded = parse("   # BEGIN FORBIDDEN   \n*.csv\n\t# END FORBIDDEN\n");
        assert_eq!(loaded.rules.len(), 1);
    }

    #[test]
    fn test_no_blocked_rules_is_empty_rule_set() {
        let result = RuleSetLoader::default().parse("# BEGIN FORBIDDEN\n!keep.json\n# END FORBIDDEN\n");
        assert!(matches!(
            result,
            Err(RulesError::EmptyRuleSet { exceptions: 1 })
        ));

        let result = RuleSetLoader::default().parse("*.csv\n");
        assert!(matches!(
            result,
            Err(RulesError::EmptyRuleSet { exceptions: 0 })
        ));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "# BEGIN FORBIDDEN\n!\n*.csv\n/\nbad\u{7}name\n*.sav\n# END FORBIDDEN\n";
        let loaded = parse(text);
        assert_eq!(loaded.rules.len(), 2);
        assert_eq!(loaded.malformed.len(), 3);
        assert_eq!(loaded.malformed[0].line, 2);
        assert_eq!(loaded.malformed[1].content, "/");
    }

    #[test]
    fn test_escaped_leading_characters() {
        let loaded = parse("# BEGIN FORBIDDEN\n\\#notes.txt\n\\!bang.txt\n# END FORBIDDEN\n");
        let patterns: Vec<&str> = loaded
            .rules
            .rules()
            .iter()
            .map(|r| r.pattern.as_str())
            .collect();
        assert_eq!(patterns, vec!["#notes.txt", "!bang.txt"]);
        assert!(loaded.rules.rules().iter().all(|r| !r.is_exception()));
    }

    #[test]
    fn test_unterminated_section_loads_to_end() {
        let loaded = parse("# BEGIN FORBIDDEN\n*.csv\n*.sav\n");
        assert_eq!(loaded.rules.len(), 2);
    }

    #[test]
    fn test_custom_markers() {
        let loader = RuleSetLoader::new(SectionMarkers::new("## start", "## stop"));
        let loaded = loader
            .parse("## start\n*.xlsx\n## stop\n# BEGIN FORBIDDEN\n*.csv\n# END FORBIDDEN\n")
            .expect("parse rules");
        assert_eq!(loaded.rules.len(), 1);
        assert_eq!(loaded.rules.rules()[0].pattern, "*.xlsx");
    }

    #[test]
    fn test_malformed_line_converts_to_core_error() {
        let line = MalformedLine {
            line: 3,
            content: "!".to_string(),
            reason: "exception marker without a pattern".to_string(),
        };
        let err: leakgate_core::LeakgateError = line.into();
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("line 3"));
    }
}
