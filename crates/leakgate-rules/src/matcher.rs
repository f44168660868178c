//! Gitignore-style pattern compilation and path matching.
//!
//! Each rule compiles to its own single-line [`Gitignore`] matcher so that
//! precedence stays with the rule set, not the matcher. Patterns follow
//! gitignore rules: no `/` matches at any depth, a leading or inner `/`
//! anchors to the root, a trailing `/` matches directories only, and a path
//! is matched when it or any parent directory matches. Character classes
//! and braces are not special; `[` matches itself.

use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// Normalize a candidate path to the `/`-separated form rules are matched against.
///
/// Backslashes become slashes and leading `./` and `/` are removed.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");
    loop {
        if let Some(rest) = normalized.strip_prefix("./") {
            normalized = rest.to_string();
        } else if let Some(rest) = normalized.strip_prefix('/') {
            normalized = rest.to_string();
        } else {
            break;
        }
    }
    normalized
}

/// A compiled rule pattern.
#[derive(Debug, Clone)]
pub(crate) struct GlobPattern {
    matcher: Gitignore,
}

impl GlobPattern {
    /// Compile a rule pattern (without its `!` exception marker).
    pub(crate) fn compile(pattern: &str) -> Result<Self, ignore::Error> {
        let mut builder = GitignoreBuilder::new(".");
        builder.add_line(None, &escape_pattern(pattern))?;
        Ok(Self {
            matcher: builder.build()?,
        })
    }

    /// A pattern that matches nothing.
    pub(crate) fn never() -> Self {
        Self {
            matcher: Gitignore::empty(),
        }
    }

    /// Test a normalized path against the pattern.
    pub(crate) fn matches(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(path, false)
            .is_ignore()
    }
}

/// Escape everything gitignore would treat specially beyond `*`, `?` and `/`.
///
/// Leading `#` and `!` are escaped so the line is neither a comment nor a
/// negation; exception handling belongs to the rule set.
fn escape_pattern(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len() + 2);
    if pattern.starts_with('#') || pattern.starts_with('!') {
        escaped.push('\\');
    }
    for c in pattern.chars() {
        if matches!(c, '[' | ']' | '{' | '}') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        GlobPattern::compile(pattern)
            .expect("compile pattern")
            .matches(&normalize_path(path))
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("./data/x.csv"), "data/x.csv");
        assert_eq!(normalize_path("/data/x.csv"), "data/x.csv");
        assert_eq!(normalize_path("data\\sub\\x.csv"), "data/sub/x.csv");
        assert_eq!(normalize_path("././x"), "x");
    }

    #[test]
    fn test_basename_patterns() {
        assert!(matches("*.csv", "patients.csv"));
        assert!(matches("*.csv", "data/patients.csv"));
        assert!(matches("*.csv", ".csv"));
        assert!(!matches("*.csv", "readme.csv.txt"));
        assert!(matches("*.nii.gz", "scans/brain.nii.gz"));
        assert!(!matches("*.CSV", "data/patients.csv"));
        assert!(matches("data?.json", "data1.json"));
        assert!(!matches("data?.json", "data12.json"));
    }

    #[test]
    fn test_dotfile_literal() {
        assert!(matches(".env", ".env"));
        assert!(matches(".env", "config/.env"));
        assert!(!matches(".env", ".env.example"));
        assert!(!matches(".env", "my.env"));
        assert!(matches(".env*", ".env.local"));
    }

    #[test]
    fn test_path_patterns() {
        assert!(matches("data/*.csv", "data/patients.csv"));
        assert!(!matches("data/*.csv", "other/data/patients.csv"));
        assert!(!matches("data/*.csv", "data/sub/patients.csv"));
        assert!(matches("/secrets.txt", "secrets.txt"));
        assert!(matches("/secrets.txt", "./secrets.txt"));
        assert!(!matches("/secrets.txt", "nested/secrets.txt"));
    }

    #[test]
    fn test_directory_patterns() {
        assert!(matches("raw/", "raw/x.txt"));
        assert!(matches("raw/", "project/raw/deep/x.txt"));
        assert!(!matches("raw/", "raw"));
        assert!(!matches("raw/", "rawdata/x.txt"));
        assert!(matches("data/raw/", "data/raw/x.txt"));
        assert!(!matches("data/raw/", "other/data/raw/x.txt"));
    }

    #[test]
    fn test_name_matches_everything_below_it() {
        // With or without a slash, a matching directory covers its contents.
        assert!(matches("raw", "raw/x.txt"));
        assert!(matches("raw", "project/raw/x.txt"));
        assert!(matches("data/raw", "data/raw/x.txt"));
        assert!(matches("raw", "raw"));
        assert!(!matches("raw", "rawdata/x.txt"));
    }

    #[test]
    fn test_any_depth() {
        assert!(matches("**/*.sav", "a/b/c/study.sav"));
        assert!(matches("**/*.sav", "study.sav"));
        assert!(matches("exports/**/*.xlsx", "exports/2024/q1/list.xlsx"));
        assert!(matches("exports/**/*.xlsx", "exports/list.xlsx"));
        assert!(!matches("exports/**/*.xlsx", "imports/list.xlsx"));
    }

    #[test]
    fn test_brackets_and_braces_are_literal() {
        assert!(matches("data[1].csv", "data[1].csv"));
        assert!(!matches("data[1].csv", "data1.csv"));
        assert!(matches("{a,b}.txt", "{a,b}.txt"));
        assert!(!matches("{a,b}.txt", "a.txt"));
    }

    #[test]
    fn test_leading_hash_and_bang_are_literal() {
        assert!(matches("#notes.txt", "#notes.txt"));
        assert!(matches("!bang.txt", "docs/!bang.txt"));
    }

    #[test]
    fn test_empty_path_never_matches() {
        assert!(!matches("*", ""));
        assert!(!matches("*", "/"));
    }

    #[test]
    fn test_never_matches_nothing() {
        assert!(!GlobPattern::never().matches("a.txt"));
    }
}
