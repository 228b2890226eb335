//! URL handling module for Sitemap-Crawler
//!
//! This module provides the crawl's root address, link normalization and
//! depth calculation, glob-style exclusion patterns, and the link legality
//! filter applied to every discovered link.

mod address;
mod filter;
mod matcher;
mod normalize;

pub use address::SiteAddress;
pub use filter::{LinkFilter, Rejection};
pub use matcher::PatternMatcher;
