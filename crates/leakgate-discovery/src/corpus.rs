//! Reference corpus of names and street names.
//!
//! Three case-insensitive token sets drive the name and address heuristics.
//! The corpus is built once per batch and shared read-only.

use crate::error::{DiscoveryError, Result};
use leakgate_core::CorpusConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Street-name suffixes recognized without a corpus entry.
pub const STREET_SUFFIXES: &[&str] = &[
    "straat", "laan", "weg", "plein", "gracht", "kade", "singel", "dijk", "dreef", "steeg",
    "markt", "hof", "baan", "park",
];

/// The three backing lists of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceList {
    /// First names
    FirstNames,
    /// Surnames
    Surnames,
    /// Street names
    StreetNames,
}

impl fmt::Display for ReferenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FirstNames => "first-name",
            Self::Surnames => "surname",
            Self::StreetNames => "street-name",
        };
        write!(f, "{name}")
    }
}

/// Immutable lookup sets for the personal-information heuristics.
#[derive(Debug, Clone)]
pub struct ReferenceCorpus {
    first_names: HashSet<String>,
    surnames: HashSet<String>,
    street_names: HashSet<String>,
}

impl ReferenceCorpus {
    /// Build a corpus from the text of the three lists.
    ///
    /// # Errors
    /// Returns `MissingReferenceData` if any list holds no tokens.
    pub fn from_lists(first_names: &str, surnames: &str, street_names: &str) -> Result<Self> {
        Ok(Self {
            first_names: parse_list(first_names, ReferenceList::FirstNames, None)?,
            surnames: parse_list(surnames, ReferenceList::Surnames, None)?,
            street_names: parse_list(street_names, ReferenceList::StreetNames, None)?,
        })
    }

    /// Load the three lists from the configured locations.
    ///
    /// # Errors
    /// Returns `MissingReferenceData` if a list file is absent or empty,
    /// and `Io` if one exists but can't be read.
    pub fn load(config: &CorpusConfig) -> Result<Self> {
        let corpus = Self {
            first_names: load_list(&config.first_names, ReferenceList::FirstNames)?,
            surnames: load_list(&config.surnames, ReferenceList::Surnames)?,
            street_names: load_list(&config.street_names, ReferenceList::StreetNames)?,
        };

        info!(
            first_names = corpus.first_names.len(),
            surnames = corpus.surnames.len(),
            street_names = corpus.street_names.len(),
            "loaded reference corpus"
        );

        Ok(corpus)
    }

    /// Check if a token is a known first name.
    #[must_use]
    pub fn is_first_name(&self, token: &str) -> bool {
        contains_folded(&self.first_names, token)
    }

    /// Check if a token is a known surname.
    #[must_use]
    pub fn is_surname(&self, token: &str) -> bool {
        contains_folded(&self.surnames, token)
    }

    /// Check if a token is a known street name.
    #[must_use]
    pub fn is_street_name(&self, token: &str) -> bool {
        contains_folded(&self.street_names, token)
    }

    /// The fixed street-suffix tokens.
    #[must_use]
    pub fn street_suffixes(&self) -> &'static [&'static str] {
        STREET_SUFFIXES
    }

    /// Sizes of the first-name, surname and street-name sets.
    #[must_use]
    pub fn sizes(&self) -> (usize, usize, usize) {
        (
            self.first_names.len(),
            self.surnames.len(),
            self.street_names.len(),
        )
    }
}

/// Check whether a word ends in one of the street suffixes, ignoring case.
#[must_use]
pub fn has_street_suffix(word: &str) -> bool {
    let lower = word.to_lowercase();
    STREET_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// Check whether text contains a street suffix anywhere, ignoring case.
#[must_use]
pub fn contains_street_suffix(text: &str) -> bool {
    let lower = text.to_lowercase();
    STREET_SUFFIXES.iter().any(|suffix| lower.contains(suffix))
}

fn contains_folded(set: &HashSet<String>, token: &str) -> bool {
    set.contains(token) || set.contains(&token.to_lowercase())
}

fn load_list(path: &Path, list: ReferenceList) -> Result<HashSet<String>> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DiscoveryError::MissingReferenceData {
                list,
                path: Some(path.to_path_buf()),
            }
        } else {
            DiscoveryError::Io {
                list,
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    // Name lists are not always clean UTF-8; stray bytes only affect the token they're in.
    let text = String::from_utf8_lossy(&bytes);
    parse_list(&text, list, Some(path))
}

fn parse_list(text: &str, list: ReferenceList, path: Option<&Path>) -> Result<HashSet<String>> {
    let mut tokens = HashSet::new();
    let mut multi_word = 0;

    for line in text.lines() {
        let line = line.trim().trim_start_matches('\u{feff}');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.split_whitespace().nth(1).is_some() {
            multi_word += 1;
            continue;
        }
        tokens.insert(line.to_lowercase());
    }

    if multi_word > 0 {
        debug!(list = %list, skipped = multi_word, "skipped multi-word reference entries");
    }

    if tokens.is_empty() {
        return Err(DiscoveryError::MissingReferenceData {
            list,
            path: path.map(Path::to_path_buf),
        });
    }

    Ok(tokens)
}
