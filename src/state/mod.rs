//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: The crawl's lifecycle (idle, seeding, draining, completed)
//! - `CrawlSession`: Queue, scanned set, policy and error log of one crawl
//! - `CrawlError`: Per-URL failures collected while the crawl runs

mod error;
mod phase;
mod session;

// Re-export main types
pub use error::{CrawlError, ErrorCode};
pub use phase::CrawlPhase;
pub use session::CrawlSession;
