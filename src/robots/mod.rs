//! Robots.txt handling module
//!
//! This module fetches a site's robots.txt and turns the `Disallow` rules of
//! its `User-agent: *` group into exclusion patterns.

mod parser;

pub use parser::ParsedRobots;

use crate::crawler::FetchClient;
use crate::url::SiteAddress;

/// Fetches and parses robots.txt for a site
///
/// robots.txt is always read from the site root, even when the crawl starts
/// at a sub-path. Every failure (no response, non-2xx status) is swallowed:
/// a site without robots.txt is crawled unrestricted.
///
/// # Arguments
///
/// * `fetcher` - HTTP transport
/// * `site` - The crawl's root address
///
/// # Returns
///
/// The parsed rules, or [`ParsedRobots::allow_all`] if none could be loaded
pub async fn load_robots(fetcher: &dyn FetchClient, site: &SiteAddress) -> ParsedRobots {
    let url = site.robots_url();

    match fetcher.get(&url).await {
        Ok(response) if (200..300).contains(&response.status) => {
            let robots = ParsedRobots::from_content(&response.body);
            tracing::info!(
                "Loaded {} disallow rules from {}",
                robots.disallow().len(),
                url
            );
            robots
        }
        Ok(response) => {
            tracing::info!("No robots file found at {} (status {})", url, response.status);
            ParsedRobots::allow_all()
        }
        Err(e) => {
            tracing::info!("No robots file found at {}: {}", url, e);
            ParsedRobots::allow_all()
        }
    }
}
