//! HTML parser for extracting links and metadata
//!
//! This module handles parsing HTML content to extract:
//! - Raw `href` values of anchors to follow
//! - The canonical URL
//! - The `robots` meta directives

use scraper::{Html, Selector};

/// Metadata the crawl engine needs from a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    /// Canonical URL, empty when the page does not declare one
    pub canonical: String,
    /// Content of `<meta name="robots">`, empty when absent
    pub robots: String,
}

impl PageMeta {
    /// Returns true if the robots directives contain `noindex`
    pub fn is_noindex(&self) -> bool {
        self.robots.to_ascii_lowercase().contains("noindex")
    }

    /// Returns true if the robots directives contain `nofollow`
    pub fn is_nofollow(&self) -> bool {
        self.robots.to_ascii_lowercase().contains("nofollow")
    }
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Raw `href` values, deduplicated, in document order
    pub links: Vec<String>,
    pub meta: PageMeta,
}

/// Turns an HTML document into links and metadata
pub trait PageExtractor: Send + Sync {
    fn parse(&self, html: &str) -> ParsedPage;
}

/// [`PageExtractor`] built on scraper
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `href` of every `<a>` element, unresolved
///
/// **Exclude:**
/// - Anchors whose `rel` contains `nofollow`
/// - Anchors with a `download` attribute
/// - Empty `href` values
///
/// Link legality (host, scheme, exclusions) is decided later by the link
/// filter, not here.
#[derive(Debug, Clone, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl PageExtractor for HtmlExtractor {
    fn parse(&self, html: &str) -> ParsedPage {
        let document = Html::parse_document(html);

        ParsedPage {
            links: extract_links(&document),
            meta: PageMeta {
                canonical: extract_canonical(&document).unwrap_or_default(),
                robots: extract_meta(&document, "robots").unwrap_or_default(),
            },
        }
    }
}

/// Extracts the `href` of every followable anchor
fn extract_links(document: &Html) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let value = element.value();

        if value.attr("download").is_some() {
            continue;
        }

        let nofollow = value
            .attr("rel")
            .map(|rel| {
                rel.split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("nofollow"))
            })
            .unwrap_or(false);
        if nofollow {
            continue;
        }

        if let Some(href) = value.attr("href") {
            let href = href.trim();
            if !href.is_empty() && !links.iter().any(|l| l == href) {
                links.push(href.to_string());
            }
        }
    }

    links
}

/// Extracts the canonical URL
///
/// `<link rel="canonical">` wins over `<meta name="canonical">`.
fn extract_canonical(document: &Html) -> Option<String> {
    if let Ok(selector) = Selector::parse("link[rel][href]") {
        let canonical = document
            .select(&selector)
            .find(|el| {
                el.value()
                    .attr("rel")
                    .map(|rel| {
                        rel.split_ascii_whitespace()
                            .any(|t| t.eq_ignore_ascii_case("canonical"))
                    })
                    .unwrap_or(false)
            })
            .and_then(|el| el.value().attr("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty());

        if canonical.is_some() {
            return canonical;
        }
    }

    extract_meta(document, "canonical")
}

/// Extracts the `content` of a `<meta name="...">` tag, name matched
/// case-insensitively
fn extract_meta(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse("meta[name][content]").ok()?;

    document
        .select(&selector)
        .filter(|el| {
            el.value()
                .attr("name")
                .map(|n| n.trim().eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
        .filter_map(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .last()
}
