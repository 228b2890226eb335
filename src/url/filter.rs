use crate::url::normalize::split_origin;
use crate::url::{PatternMatcher, SiteAddress};
use crate::ConfigError;
use std::fmt;

/// Why a discovered link was not accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Absolute link pointing at another host
    ForeignHost(String),
    /// Link lacks the root URL's path/query suffix
    OutsideScope(String),
    /// `javascript:`, `tel:` or `mailto:` link
    NotNavigable,
    /// Link has no Latin or Cyrillic letters at all
    NoLetters,
    /// Link matched an exclude pattern (user supplied or robots.txt)
    ExcludedPattern(String),
    /// Link points at an excluded file type
    ExcludedExtension(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::ForeignHost(host) => write!(f, "foreign host {}", host),
            Rejection::OutsideScope(uri) => write!(f, "outside of '{}'", uri),
            Rejection::NotNavigable => write!(f, "not a navigable link"),
            Rejection::NoLetters => write!(f, "no letters"),
            Rejection::ExcludedPattern(pattern) => write!(f, "excluded by rule '{}'", pattern),
            Rejection::ExcludedExtension(ext) => write!(f, "excluded extension .{}", ext),
        }
    }
}

const NON_NAVIGABLE_PREFIXES: &[&str] = &["javascript:", "tel:", "mailto:"];

/// Decides whether a discovered link belongs to the crawl
#[derive(Debug, Clone)]
pub struct LinkFilter {
    site: SiteAddress,
    uri: String,
    excludes: PatternMatcher,
    extensions: Vec<String>,
}

impl LinkFilter {
    /// Creates a filter for a site
    ///
    /// # Arguments
    ///
    /// * `site` - The crawl's root address
    /// * `exclude_patterns` - Glob patterns matched against each link
    /// * `exclude_extensions` - File extensions (without the dot) to skip
    pub fn new<P: AsRef<str>, E: AsRef<str>>(
        site: SiteAddress,
        exclude_patterns: &[P],
        exclude_extensions: &[E],
    ) -> Result<Self, ConfigError> {
        let uri = site.uri();
        Ok(Self {
            site,
            uri,
            excludes: PatternMatcher::for_urls(exclude_patterns)?,
            extensions: exclude_extensions
                .iter()
                .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        })
    }

    /// Registers additional exclude patterns, e.g. robots.txt `Disallow` rules
    pub fn add_exclude_patterns<S: AsRef<str>>(
        &mut self,
        patterns: &[S],
    ) -> Result<usize, ConfigError> {
        self.excludes.extend(patterns)
    }

    pub fn site(&self) -> &SiteAddress {
        &self.site
    }

    /// Runs every rule against a raw link, in order
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The link is in scope
    /// * `Err(Rejection)` - The first rule the link failed
    pub fn check(&self, link: &str) -> Result<(), Rejection> {
        let link = link.trim();

        if let Some((authority, _)) = split_origin(link) {
            if !self.site.is_same_authority(authority) {
                return Err(Rejection::ForeignHost(authority.to_string()));
            }
        }

        if !self.uri.is_empty() && !link.contains(&self.uri) {
            return Err(Rejection::OutsideScope(self.uri.clone()));
        }

        let lowered = link.to_ascii_lowercase();
        if NON_NAVIGABLE_PREFIXES
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
        {
            return Err(Rejection::NotNavigable);
        }

        if !link.chars().any(is_latin_or_cyrillic) {
            return Err(Rejection::NoLetters);
        }

        if let Some(pattern) = self.excludes.first_match(link) {
            return Err(Rejection::ExcludedPattern(pattern.to_string()));
        }

        if let Some(ext) = extension_of(link) {
            if self.extensions.iter().any(|e| *e == ext) {
                return Err(Rejection::ExcludedExtension(ext));
            }
        }

        Ok(())
    }

    /// Boolean shorthand for [`LinkFilter::check`]
    pub fn is_in_scope(&self, link: &str) -> bool {
        self.check(link).is_ok()
    }
}

fn is_latin_or_cyrillic(c: char) -> bool {
    if c.is_ascii_alphabetic() {
        return true;
    }
    if !c.is_alphabetic() {
        return false;
    }
    matches!(
        c,
        '\u{00C0}'..='\u{024F}'
            | '\u{1E00}'..='\u{1EFF}'
            | '\u{0400}'..='\u{052F}'
            | '\u{1C80}'..='\u{1C8F}'
            | '\u{2DE0}'..='\u{2DFF}'
            | '\u{A640}'..='\u{A69F}'
    )
}

/// Lowercased extension of the last path segment, if it has one
fn extension_of(link: &str) -> Option<String> {
    let path = match split_origin(link) {
        Some((_, rest)) => rest,
        None => link,
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();

    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}
