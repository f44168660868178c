//! Leakgate Discovery - personal-information detection in file content.
//!
//! Holds the reference corpus (first names, surnames, street names) and the
//! multi-phase heuristic scanner that reports patient identifiers, full
//! names and addresses with their line numbers.

pub mod content;
pub mod corpus;
/// Error types for corpus loading.
pub mod error;
pub mod pii;

// Re-export main types
pub use content::{sniff_content, FileContent, DEFAULT_SNIFF_BYTES};
pub use corpus::{
    contains_street_suffix, has_street_suffix, ReferenceCorpus, ReferenceList, STREET_SUFFIXES,
};
pub use error::{DiscoveryError, Result};
pub use pii::PiiScanner;
