use crate::ConfigError;
use regex::{Regex, RegexBuilder};

/// A compiled set of exclusion patterns
///
/// Patterns use a small glob syntax: `*` matches any run of characters and
/// every other character, `?` included, is literal. A pattern matches when it
/// occurs anywhere in the candidate.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    patterns: Vec<CompiledPattern>,
    case_insensitive: bool,
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl PatternMatcher {
    /// Compiles case-sensitive patterns for matching links
    pub fn for_urls<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let mut matcher = Self::default();
        matcher.extend(patterns)?;
        Ok(matcher)
    }

    /// Compiles case-insensitive patterns for screening page bodies
    pub fn for_content<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let mut matcher = Self {
            patterns: Vec::new(),
            case_insensitive: true,
        };
        matcher.extend(patterns)?;
        Ok(matcher)
    }

    /// Adds more patterns to the matcher
    ///
    /// Patterns are trimmed first. Empty patterns and patterns that are
    /// already present are skipped.
    ///
    /// # Arguments
    ///
    /// * `patterns` - Raw glob patterns
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of patterns actually added
    /// * `Err(ConfigError)` - A pattern failed to compile
    pub fn extend<S: AsRef<str>>(&mut self, patterns: &[S]) -> Result<usize, ConfigError> {
        let mut added = 0;

        for raw in patterns {
            let source = raw.as_ref().trim();
            if source.is_empty() || self.patterns.iter().any(|p| p.source == source) {
                continue;
            }

            let regex = RegexBuilder::new(&glob_to_regex(source))
                .case_insensitive(self.case_insensitive)
                .build()
                .map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", source, e)))?;

            self.patterns.push(CompiledPattern {
                source: source.to_string(),
                regex,
            });
            added += 1;
        }

        Ok(added)
    }

    /// Returns true if any pattern occurs in the candidate
    pub fn matches_any(&self, candidate: &str) -> bool {
        self.first_match(candidate).is_some()
    }

    /// Returns the source text of the first pattern occurring in the candidate
    pub fn first_match(&self, candidate: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(candidate))
            .map(|p| p.source.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Translates a glob pattern into an unanchored regular expression
fn glob_to_regex(pattern: &str) -> String {
    pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*")
}
