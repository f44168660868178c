//! Heuristic personal-information scanner
//!
//! Flags patient identifiers, full names and street addresses in text
//! content. Four independent phases run over a line-indexed view of the
//! content:
//!
//! - A: seven-digit patient identifiers (lexical only)
//! - B: first-name-led full names (corpus first name + capitalized word)
//! - C: surname-led full names, only when B found nothing in the file
//! - D: street names followed by a house number
//!
//! The name phases first check whether the content contains any corpus
//! name at all and skip the pair search entirely when it doesn't. A name
//! pair whose text contains a street suffix anywhere is discarded.

use crate::corpus::{contains_street_suffix, has_street_suffix, ReferenceCorpus};
use leakgate_core::{Finding, PiiCategory};
use once_cell::sync::Lazy;
use regex::{Match, Regex};
use std::sync::Arc;
use tracing::debug;

/// Compiled regex patterns (initialized once at startup)
static PATIENT_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9]{7}\b").expect("Patient ID regex is hardcoded and valid"));

static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+").expect("Word regex is hardcoded and valid"));

/// Minimum letters in the capitalized half of a name pair.
const MIN_NAME_LETTERS: usize = 3;

/// Minimum letters in a suffix-matched street name.
const MIN_STREET_LETTERS: usize = 5;

/// Scans decoded text for personal information.
#[derive(Debug, Clone)]
pub struct PiiScanner {
    corpus: Arc<ReferenceCorpus>,
}

impl PiiScanner {
    /// Create a scanner over a shared corpus.
    #[must_use]
    pub fn new(corpus: Arc<ReferenceCorpus>) -> Self {
        Self { corpus }
    }

    /// The corpus this scanner uses.
    #[must_use]
    pub fn corpus(&self) -> &ReferenceCorpus {
        &self.corpus
    }

    /// Scan one file's text content.
    ///
    /// Findings are ordered by line, then phase, then column. Binary content
    /// must be filtered out by the caller.
    #[must_use]
    pub fn scan(&self, path: &str, content: &str) -> Vec<Finding> {
        let lines: Vec<(usize, &str)> = content
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .collect();

        let mut findings = patient_ids(path, &lines);

        let first_led = if self.mentions_any(content, ReferenceCorpus::is_first_name) {
            self.name_pairs(path, &lines, NameLead::FirstName)
        } else {
            Vec::new()
        };

        if first_led.is_empty() {
            if self.mentions_any(content, ReferenceCorpus::is_surname) {
                findings.extend(self.name_pairs(path, &lines, NameLead::Surname));
            }
        } else {
            findings.extend(first_led);
        }

        findings.extend(self.addresses(path, &lines));
        findings.sort_by_key(Finding::sort_key);

        if !findings.is_empty() {
            debug!(path = %path, count = findings.len(), "personal information found");
        }

        findings
    }

    /// Whole-content pre-test: does any word satisfy the lookup?
    fn mentions_any(&self, content: &str, lookup: fn(&ReferenceCorpus, &str) -> bool) -> bool {
        WORD_PATTERN
            .find_iter(content)
            .any(|word| lookup(&self.corpus, word.as_str()))
    }

    /// Adjacent word pairs shaped like a full name.
    ///
    /// Reported pairs never overlap: after a hit the search resumes past
    /// its second word.
    fn name_pairs(&self, path: &str, lines: &[(usize, &str)], lead: NameLead) -> Vec<Finding> {
        let mut findings = Vec::new();

        for &(line_no, line) in lines {
            let words: Vec<Match<'_>> = WORD_PATTERN.find_iter(line).collect();

            let mut idx = 0;
            while idx + 1 < words.len() {
                let (left, right) = (words[idx], words[idx + 1]);
                let span = &line[left.start()..right.end()];

                // "Jan Kerkstraat", "Kerkstraat Noord": street references, not people
                if separated_by_spaces(line, left, right)
                    && self.is_name_pair(left.as_str(), right.as_str(), lead)
                    && !contains_street_suffix(span)
                {
                    findings.push(Finding::new(
                        PiiCategory::FullName,
                        path,
                        line_no,
                        left.start() + 1,
                        span,
                    ));
                    idx += 2;
                } else {
                    idx += 1;
                }
            }
        }

        findings
    }

    fn is_name_pair(&self, left: &str, right: &str, lead: NameLead) -> bool {
        match lead {
            NameLead::FirstName => {
                self.corpus.is_first_name(left) && is_capitalized(right, MIN_NAME_LETTERS)
            }
            NameLead::Surname => {
                is_capitalized(left, MIN_NAME_LETTERS) && self.corpus.is_surname(right)
            }
        }
    }

    /// Street names directly followed by a house number.
    fn addresses(&self, path: &str, lines: &[(usize, &str)]) -> Vec<Finding> {
        let mut findings = Vec::new();

        for &(line_no, line) in lines {
            for word in WORD_PATTERN.find_iter(line) {
                let Some(number_end) = house_number_end(line, word.end()) else {
                    continue;
                };

                let text = word.as_str();
                let known_street = self.corpus.is_street_name(text);
                let suffixed_street =
                    is_capitalized(text, MIN_STREET_LETTERS) && has_street_suffix(text);

                if known_street || suffixed_street {
                    findings.push(Finding::new(
                        PiiCategory::Address,
                        path,
                        line_no,
                        word.start() + 1,
                        &line[word.start()..number_end],
                    ));
                }
            }
        }

        findings
    }
}

/// Which half of a name pair comes from the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameLead {
    FirstName,
    Surname,
}

/// Seven-digit runs with word boundaries on both sides.
fn patient_ids(path: &str, lines: &[(usize, &str)]) -> Vec<Finding> {
    lines
        .iter()
        .flat_map(|&(line_no, line)| {
            PATIENT_ID_PATTERN.find_iter(line).map(move |m| {
                Finding::new(PiiCategory::PatientId, path, line_no, m.start() + 1, m.as_str())
            })
        })
        .collect()
}

/// One or more spaces, and nothing else, between two words.
fn separated_by_spaces(line: &str, left: Match<'_>, right: Match<'_>) -> bool {
    let gap = &line[left.end()..right.start()];
    !gap.is_empty() && gap.bytes().all(|b| b == b' ')
}

/// An uppercase letter followed only by lowercase letters, `min_letters` in total.
fn is_capitalized(word: &str, min_letters: usize) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_uppercase()
        && chars.clone().all(char::is_lowercase)
        && 1 + chars.count() >= min_letters
}

/// End offset of a house number starting after whitespace at `from`.
fn house_number_end(line: &str, from: usize) -> Option<usize> {
    let rest = &line[from..];
    let after_space = rest.trim_start_matches([' ', '\t']);
    if after_space.len() == rest.len() {
        return None;
    }

    let digits = after_space
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }

    Some(from + (rest.len() - after_space.len()) + digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> PiiScanner {
        let corpus = ReferenceCorpus::from_lists(
            "Jan\nPiet\nAnna\n",
            "Jansen\nBakker\nNoord\n",
            "Kerkstraat\nDorpsstraat\n",
        )
        .expect("build corpus");
        PiiScanner::new(Arc::new(corpus))
    }

    fn categories(findings: &[Finding]) -> Vec<PiiCategory> {
        findings.iter().map(|f| f.category).collect()
    }

    #[test]
    fn test_patient_id_exact_seven_digits() {
        let scanner = scanner();

        let findings = scanner.scan("a.txt", "id: 1234567 end");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, PiiCategory::PatientId);
        assert_eq!(findings[0].line, 1);
        assert_eq!(findings[0].column, 5);
        assert_eq!(findings[0].matched_text, "1234567");

        assert!(scanner.scan("a.txt", "id: 123456").is_empty());
        assert!(scanner.scan("a.txt", "id: 12345678").is_empty());
        assert!(scanner.scan("a.txt", "ref x1234567").is_empty());
    }

    #[test]
    fn test_patient_id_line_numbers() {
        let findings = scanner().scan("a.csv", "header\n\n1234567,7654321\n");
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.line == 3));
        assert_eq!(findings[1].matched_text, "7654321");
    }

    #[test]
    fn test_first_name_led_full_name() {
        let findings = scanner().scan("notes.md", "Contact: jan Visser about the study");
        assert_eq!(categories(&findings), vec![PiiCategory::FullName]);
        assert_eq!(findings[0].matched_text, "jan Visser");
        assert_eq!(findings[0].column, 10);
    }

    #[test]
    fn test_capitalized_word_needs_three_letters() {
        assert!(scanner().scan("a.txt", "Jan Vo").is_empty());
        assert!(scanner().scan("a.txt", "Jan VISSER").is_empty());
        assert!(scanner().scan("a.txt", "Jan  visser").is_empty());
    }

    #[test]
    fn test_street_suffix_excludes_name() {
        let findings = scanner().scan("a.txt", "Jan Kerkstraat");
        assert!(findings.is_empty());

        let findings = scanner().scan("a.txt", "Meet at Kerkstraat Noord");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_street_suffix_inside_a_word_excludes_name() {
        assert!(scanner().scan("a.txt", "Jan Weggeman").is_empty());
        assert!(scanner().scan("a.txt", "Jan Hofstede").is_empty());
        assert!(scanner().scan("a.txt", "Dr Wilhof Bakker").is_empty());
    }

    #[test]
    fn test_name_pairs_do_not_overlap() {
        let findings = scanner().scan("a.txt", "Jan Piet Jansen");
        assert_eq!(categories(&findings), vec![PiiCategory::FullName]);
        assert_eq!(findings[0].matched_text, "Jan Piet");

        // After a hit the search continues with the next unused word.
        let findings = scanner().scan("a.txt", "Jan Piet Anna Visser");
        let names: Vec<&str> = findings.iter().map(|f| f.matched_text.as_str()).collect();
        assert_eq!(names, vec!["Jan Piet", "Anna Visser"]);
    }

    #[test]
    fn test_surname_led_runs_only_without_first_name_hits() {
        let findings = scanner().scan("a.txt", "Dr Willem Bakker signed");
        assert_eq!(categories(&findings), vec![PiiCategory::FullName]);
        assert_eq!(findings[0].matched_text, "Willem Bakker");

        // "Piet Jansen" is found by the first-name phase; the surname phase
        // would report "Willem Bakker" but doesn't run.
        let findings = scanner().scan("a.txt", "Piet Jansen\nWillem Bakker");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].matched_text, "Piet Jansen");
    }

    #[test]
    fn test_first_name_alone_falls_through_to_surname_phase() {
        // "Anna" is a first name but isn't followed by a capitalized word.
        let findings = scanner().scan("a.txt", "anna said: Willem Bakker");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].matched_text, "Willem Bakker");
    }

    #[test]
    fn test_address_requires_house_number() {
        assert!(scanner().scan("a.txt", "Hoofdweg").is_empty());

        let findings = scanner().scan("a.txt", "Hoofdweg 12");
        assert_eq!(categories(&findings), vec![PiiCategory::Address]);
        assert_eq!(findings[0].matched_text, "Hoofdweg 12");
    }

    #[test]
    fn test_address_from_corpus_and_suffix() {
        let findings = scanner().scan("a.txt", "kerkstraat\t4a and Stationstraat 123");
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].matched_text, "kerkstraat\t4");
        assert_eq!(findings[1].matched_text, "Stationstraat 123");
    }

    #[test]
    fn test_short_suffix_word_is_not_address() {
        // Capitalized suffix match needs five letters; "Weg" alone is too short.
        assert!(scanner().scan("a.txt", "Weg 5").is_empty());
        assert!(scanner().scan("a.txt", "Hoofdweg12").is_empty());
    }

    #[test]
    fn test_ordering_by_line_then_phase() {
        let content = "Hoofdweg 3, Jan Visser, 1234567\nPiet Jansen";
        let findings = scanner().scan("a.txt", content);
        assert_eq!(
            categories(&findings),
            vec![
                PiiCategory::PatientId,
                PiiCategory::FullName,
                PiiCategory::Address,
                PiiCategory::FullName,
            ]
        );
        assert_eq!(findings[3].line, 2);
    }

    #[test]
    fn test_scan_is_idempotent() {
        let scanner = scanner();
        let content = "Jan Visser\nHoofdweg 12\n1234567";
        assert_eq!(scanner.scan("a.txt", content), scanner.scan("a.txt", content));
    }

    #[test]
    fn test_clean_content() {
        let findings = scanner().scan("src/lib.rs", "fn main() {\n    println!(\"hello\");\n}\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_is_capitalized() {
        assert!(is_capitalized("Visser", 3));
        assert!(is_capitalized("Élise", 3));
        assert!(!is_capitalized("visser", 3));
        assert!(!is_capitalized("VanDam", 3));
        assert!(!is_capitalized("Vo", 3));
        assert!(!is_capitalized("Jan2", 3));
    }

    #[test]
    fn test_house_number_end() {
        assert_eq!(house_number_end("Weg 12b", 3), Some(6));
        assert_eq!(house_number_end("Weg12", 3), None);
        assert_eq!(house_number_end("Weg x", 3), None);
        assert_eq!(house_number_end("Weg", 3), None);
    }
}
