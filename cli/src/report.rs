//! Human-readable rendering of a batch report.

use leakgate_core::PiiCategory;
use leakgate_scanner::ScanReport;
use std::fmt;

/// Default number of examples shown per category per file.
pub const DEFAULT_MAX_EXAMPLES: usize = 5;

/// Output format for `check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text for terminals and hook output
    Text,
    /// The full report as JSON
    Json,
}

/// Render the report as text.
///
/// Blocked paths are listed with the rule that decided them. Findings are
/// grouped per file and category, capped at `max_examples` each.
#[must_use]
pub fn render_text(report: &ScanReport, max_examples: usize) -> String {
    TextReport {
        report,
        max_examples,
    }
    .to_string()
}

struct TextReport<'a> {
    report: &'a ScanReport,
    max_examples: usize,
}

impl TextReport<'_> {
    fn write_blocked(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blocked: Vec<_> = self.report.result.blocked_paths().collect();
        if blocked.is_empty() {
            return Ok(());
        }

        writeln!(f, "Forbidden files ({}):", blocked.len())?;
        for classification in blocked {
            match &classification.rule {
                Some(rule) => writeln!(f, "  {}  [rule: {rule}]", classification.path)?,
                None => writeln!(f, "  {}", classification.path)?,
            }
        }
        writeln!(f)
    }

    fn write_findings(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = &self.report.result;
        let by_file = result.findings_by_file();
        if by_file.is_empty() {
            return Ok(());
        }

        writeln!(f, "Personal information ({} findings):", result.findings.len())?;
        for (file, findings) in by_file {
            writeln!(f, "  {file}")?;
            for category in PiiCategory::ALL {
                let matches: Vec<_> = findings
                    .iter()
                    .filter(|finding| finding.category == category)
                    .collect();
                if matches.is_empty() {
                    continue;
                }

                writeln!(f, "    {} ({}):", category, matches.len())?;
                for finding in matches.iter().take(self.max_examples) {
                    writeln!(f, "      line {}: {}", finding.line, finding.matched_text)?;
                }
                if matches.len() > self.max_examples {
                    writeln!(f, "      ... and {} more", matches.len() - self.max_examples)?;
                }
            }
        }
        writeln!(f)
    }

    fn write_skipped(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let skipped = &self.report.result.skipped;
        if skipped.is_empty() {
            return Ok(());
        }

        writeln!(f, "Not scanned for personal information:")?;
        for entry in skipped {
            writeln!(f, "  {}: {}", entry.path, entry.reason)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_blocked(f)?;
        self.write_findings(f)?;
        self.write_skipped(f)?;

        let result = &self.report.result;
        if result.blocked {
            writeln!(
                f,
                "BLOCKED: {} forbidden file(s), {} finding(s) in {} file(s) checked",
                result.blocked_paths().count(),
                result.findings.len(),
                result.classifications.len()
            )
        } else {
            writeln!(
                f,
                "OK: {} file(s) checked, nothing forbidden found",
                result.classifications.len()
            )
        }
    }
}
