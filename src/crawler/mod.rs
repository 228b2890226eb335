//! Crawler module for fetching and processing a site's pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`FetchClient`] trait
//! - HTML parsing and link extraction behind the [`PageExtractor`] trait
//! - The crawl frontier and batch scheduling
//! - Overall crawl coordination and progress reporting

mod coordinator;
mod fetcher;
mod parser;
mod progress;
mod scheduler;

pub use coordinator::{download_file_name, Crawler};
pub use fetcher::{FetchClient, FetchError, FetchResponse, HttpFetcher};
pub use parser::{HtmlExtractor, PageExtractor, PageMeta, ParsedPage};
pub use progress::{ProgressCallback, ProgressReporter, ProgressSnapshot};
pub use scheduler::{dispatch_delay, Frontier, QueueEntry};

pub use crate::output::CrawlReport;
