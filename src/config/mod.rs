//! Configuration module for Sitemap-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and turning the result into the runtime [`CrawlPolicy`].
//!
//! # Example
//!
//! ```no_run
//! use sitemap_crawler::config::{load_config, CrawlPolicy};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! let policy = CrawlPolicy::from_config(&config);
//! println!("Crawler will use max depth: {}", policy.max_depth);
//! ```

mod parser;
mod policy;
mod types;
mod validation;

// Re-export types
pub use policy::CrawlPolicy;
pub use types::{
    Config, CrawlerConfig, DownloadConfig, FilterConfig, ProgressConfig, StorageConfig,
    StoreBackend, TimeoutConfig, DEFAULT_EXCLUDE_EXTENSIONS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, SITEMAP_MAX_LINKS};
