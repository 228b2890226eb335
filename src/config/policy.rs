use crate::config::types::Config;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime crawl policy derived from a validated [`Config`]
///
/// Only `threads_limit` and `sleep` change while a crawl runs; both are
/// adjusted by the adaptive backoff when the server throttles requests.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlPolicy {
    pub max_depth: u32,
    pub threads_limit: u32,
    pub request_timeout: Duration,
    pub sleep: Duration,
    pub total_link_limit: usize,
    pub links_per_file: usize,
    pub user_agent: String,
    pub exclude_patterns: Vec<String>,
    pub content_exclude_patterns: Vec<String>,
    pub exclude_extensions: Vec<String>,
    pub max_redirects: usize,
    pub max_retries: u32,
    pub backoff_step: Duration,
    pub backoff_cooldown: Duration,
    pub progress_frequency: usize,
    pub download_dir: Option<PathBuf>,
}

impl CrawlPolicy {
    /// Builds the runtime policy from a configuration
    ///
    /// The configuration is expected to have passed validation already, so
    /// the non-negative `sleep` and `backoff-step` values convert cleanly.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_depth: config.crawler.max_depth,
            threads_limit: config.crawler.threads.max(1),
            request_timeout: Duration::from_secs(config.timeouts.request),
            sleep: seconds(config.timeouts.sleep),
            total_link_limit: config.crawler.total_link_limit,
            links_per_file: config.crawler.links_per_file,
            user_agent: config.crawler.user_agent.clone(),
            exclude_patterns: config.filters.exclude_patterns.clone(),
            content_exclude_patterns: config.filters.content_exclude_patterns.clone(),
            exclude_extensions: config.filters.exclude_extensions.clone(),
            max_redirects: config.crawler.max_redirects,
            max_retries: config.crawler.max_retries,
            backoff_step: seconds(config.timeouts.backoff_step),
            backoff_cooldown: Duration::from_secs(config.timeouts.cooldown),
            progress_frequency: config.progress.frequency.max(1),
            download_dir: config.download.as_ref().map(|d| d.directory.clone()),
        }
    }

    /// Applies one step of adaptive backoff
    ///
    /// Decrements the threads limit (never below 1) and widens the
    /// inter-request sleep by `backoff_step`.
    pub fn throttle(&mut self) {
        if self.threads_limit > 1 {
            self.threads_limit -= 1;
        }
        self.sleep += self.backoff_step;
    }
}

impl Default for CrawlPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn seconds(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}
