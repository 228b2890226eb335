//! End-of-crawl report
//!
//! Summarizes a finished crawl from the session counters and its error log,
//! and prints the summary for the command line.

use crate::state::{CrawlError, ErrorCode};
use std::collections::HashMap;
use std::time::Duration;

/// Summary of one crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    /// Site key of the crawl
    pub site: String,

    /// URLs dequeued and processed
    pub scanned: usize,

    /// Links held by the store for the site
    pub stored: usize,

    /// Per-URL errors recorded during the crawl
    pub errors: usize,

    /// Error counts by code
    pub errors_by_code: HashMap<ErrorCode, usize>,

    /// Wall-clock time spent crawling
    pub elapsed: Duration,

    /// Concurrency limit after any backoff
    pub threads_limit: u32,

    /// Inter-request sleep after any backoff
    pub sleep: Duration,
}

impl CrawlReport {
    /// Builds a report from the crawl counters and its error log
    pub fn new(site: &str, scanned: usize, stored: usize, errors: &[CrawlError]) -> Self {
        let mut errors_by_code = HashMap::new();
        for error in errors {
            *errors_by_code.entry(error.code).or_insert(0) += 1;
        }

        Self {
            site: site.to_string(),
            scanned,
            stored,
            errors: errors.len(),
            errors_by_code,
            elapsed: Duration::ZERO,
            threads_limit: 0,
            sleep: Duration::ZERO,
        }
    }
}

/// Prints a crawl report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Site: {}", report.site);
    println!("  Pages scanned: {}", report.scanned);
    println!("  Links stored: {}", report.stored);
    println!("  Elapsed: {:.1}s", report.elapsed.as_secs_f64());
    println!();

    println!("Politeness:");
    println!("  Final threads limit: {}", report.threads_limit);
    println!("  Final request sleep: {:.2}s", report.sleep.as_secs_f64());
    println!();

    if report.errors > 0 {
        println!("Errors ({}):", report.errors);
        let mut error_counts: Vec<_> = report.errors_by_code.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

        for (code, count) in error_counts {
            println!("  {}: {}", code, count);
        }
        println!();
    }
}
