//! Output module for publishing crawl results
//!
//! This module handles:
//! - Writing stored links as sitemap XML files
//! - Writing the sitemap index for multi-file output
//! - Summarizing a finished crawl

mod error;
pub mod index;
pub mod report;
mod sitemap;

pub use error::{OutputError, OutputResult, SitemapOutput};
pub use index::INDEX_FILE_NAME;
pub use report::{print_report, CrawlReport};
pub use sitemap::{render_urlset, SitemapWriter, SITEMAP_NAMESPACE};
