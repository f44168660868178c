//! Leakgate Rules - forbidden-pattern loading and path classification.
//!
//! Loads the rule sections of a forbidden list and classifies candidate
//! paths with gitignore-style last-match-wins precedence: every rule is
//! evaluated in source order and the last one to match decides.
//!
//! # Example
//!
//! ```rust
//! use leakgate_rules::{RuleSetLoader, Verdict};
//!
//! let text = "# BEGIN FORBIDDEN\n*.json\n!package.json\n# END FORBIDDEN\n";
//! let loaded = RuleSetLoader::default().parse(text).expect("valid rules");
//!
//! assert_eq!(loaded.rules.classify("data/export.json").verdict, Verdict::Blocked);
//! assert_eq!(loaded.rules.classify("package.json").verdict, Verdict::Allowed);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

/// Error types for rule operations.
pub mod error;
pub mod export;
pub mod loader;
pub mod matcher;
pub mod rule;

pub use error::{Result, RulesError};
pub use export::{parse_extension_list, PushRuleset, DEFAULT_RULESET_NAME};
pub use loader::{LoadedRules, MalformedLine, RuleSetLoader, SectionMarkers};
pub use matcher::normalize_path;
pub use rule::{Classification, Rule, RuleKind, RuleSet, Verdict};
