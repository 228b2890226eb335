//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates all aspects of
//! a single-site crawl, including:
//! - Seeding the frontier from robots.txt and the root URL
//! - Dispatching each batch of fetches concurrently and waiting for all of them
//! - Applying batch results: storing pages, queueing links, retries and backoff
//! - Reporting progress and writing the sitemap

use crate::config::CrawlPolicy;
use crate::crawler::fetcher::{FetchClient, FetchError, FetchResponse, HttpFetcher};
use crate::crawler::parser::{HtmlExtractor, PageExtractor};
use crate::crawler::progress::{ProgressCallback, ProgressReporter, ProgressSnapshot};
use crate::crawler::scheduler::{dispatch_delay, QueueEntry};
use crate::output::{CrawlReport, SitemapOutput, SitemapWriter};
use crate::robots::load_robots;
use crate::state::{CrawlError, CrawlPhase, CrawlSession, ErrorCode};
use crate::storage::{LinkRecord, LinkStore, StoreResult};
use crate::url::SiteAddress;
use crate::SitemapError;
use chrono::{DateTime, SecondsFormat};
use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;

/// Crawls one site and collects its pages into a link store
pub struct Crawler {
    session: CrawlSession,
    store: Arc<dyn LinkStore>,
    fetcher: Arc<dyn FetchClient>,
    extractor: Arc<dyn PageExtractor>,
    progress: Option<ProgressReporter>,
}

impl Crawler {
    /// Creates a crawler using the reqwest fetcher and the scraper extractor
    ///
    /// # Arguments
    ///
    /// * `site` - Root address of the crawl
    /// * `policy` - Crawl limits, timeouts and filters
    /// * `store` - Store the crawled links are written to
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(SitemapError)` - The HTTP client or a filter pattern could not be built
    pub fn new(
        site: SiteAddress,
        policy: CrawlPolicy,
        store: Arc<dyn LinkStore>,
    ) -> Result<Self, SitemapError> {
        let fetcher = Arc::new(HttpFetcher::new(&policy)?);
        Self::with_components(site, policy, store, fetcher, Arc::new(HtmlExtractor::new()))
    }

    /// Creates a crawler with an explicit transport and HTML extractor
    pub fn with_components(
        site: SiteAddress,
        policy: CrawlPolicy,
        store: Arc<dyn LinkStore>,
        fetcher: Arc<dyn FetchClient>,
        extractor: Arc<dyn PageExtractor>,
    ) -> Result<Self, SitemapError> {
        let session = CrawlSession::new(site, policy)?;

        Ok(Self {
            session,
            store,
            fetcher,
            extractor,
            progress: None,
        })
    }

    /// Registers a progress callback
    ///
    /// The callback runs after every batch that brings the scanned count to
    /// a multiple of the policy's progress frequency, and once when the crawl
    /// completes.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(ProgressReporter::new(
            self.session.policy.progress_frequency,
            callback,
        ));
        self
    }

    /// Runs the crawl until the queue is empty
    ///
    /// A site that already has stored links is not crawled again; use
    /// [`Crawler::rescan`] to start over.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The crawl finished (or was already done)
    /// * `Err(SitemapError)` - The store failed; the crawl was aborted
    pub async fn crawl(&mut self) -> Result<CrawlReport, SitemapError> {
        if self.session.phase() == CrawlPhase::Completed {
            self.session.reset()?;
        }

        let site_key = self.session.site.site_key().to_string();

        if self.store.has_scan(&site_key)? {
            tracing::info!(
                "{} already has a completed scan, use rescan to crawl it again",
                site_key
            );
            self.session.transition(CrawlPhase::Completed)?;
            return self.report();
        }

        self.session.transition(CrawlPhase::Seeding)?;
        tracing::info!("Starting crawl of {}", site_key);
        self.seed().await;

        self.session.transition(CrawlPhase::Draining)?;
        while !self.session.frontier.is_empty() {
            if let Err(e) = self.run_batch().await {
                tracing::error!("Crawl of {} aborted: {}", site_key, e);
                self.session.transition(CrawlPhase::Completed)?;
                return Err(e);
            }
        }

        if let Some(progress) = &self.progress {
            progress.report(self.snapshot()?, true);
        }
        self.session.transition(CrawlPhase::Completed)?;

        let report = self.report()?;
        tracing::info!(
            "Crawl completed: {} pages scanned, {} links stored, {} errors in {:?}",
            report.scanned,
            report.stored,
            report.errors,
            report.elapsed
        );

        Ok(report)
    }

    /// Clears the site's stored links and crawls it from scratch
    pub async fn rescan(&mut self) -> Result<CrawlReport, SitemapError> {
        let site_key = self.session.site.site_key().to_string();
        tracing::info!("Clearing stored links for {}", site_key);
        self.store.clean(&site_key)?;
        self.crawl().await
    }

    /// Loads robots.txt rules and queues the root URL
    async fn seed(&mut self) {
        let robots = load_robots(self.fetcher.as_ref(), &self.session.site).await;
        match self.session.filter.add_exclude_patterns(robots.disallow()) {
            Ok(added) if added > 0 => {
                tracing::debug!("Added {} exclusion rules from robots.txt", added)
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Ignoring robots.txt rules: {}", e),
        }

        let root = self.session.site.normalize(self.session.site.site_key());
        self.session.frontier.push(&root);
    }

    /// Fetches one batch concurrently, then applies every result in order
    async fn run_batch(&mut self) -> Result<(), SitemapError> {
        let site_key = self.session.site.site_key().to_string();

        if self.store.count_links(&site_key)? >= self.session.policy.total_link_limit {
            tracing::info!(
                "Link limit of {} reached, dropping {} queued URLs",
                self.session.policy.total_link_limit,
                self.session.frontier.len()
            );
            self.session.frontier.clear();
            return Ok(());
        }

        let limit = self.session.policy.threads_limit.max(1) as usize;
        let max_depth = self.session.policy.max_depth;
        let batch = self
            .session
            .frontier
            .next_batch(limit, &self.session.site, max_depth);
        if batch.is_empty() {
            return Ok(());
        }

        tracing::debug!("Dispatching batch of {} URLs", batch.len());
        let sleep = self.session.policy.sleep;
        let fetcher = &self.fetcher;
        let fetches = batch.iter().enumerate().map(|(index, entry)| {
            let delay = dispatch_delay(sleep, index);
            async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                fetcher.get(&entry.url).await
            }
        });
        let results = join_all(fetches).await;

        let mut throttled = false;
        for (entry, result) in batch.iter().zip(results) {
            let error = match result {
                Ok(response) if response.status == 200 => {
                    self.process_page(entry, response).await?;
                    continue;
                }
                Ok(response) => CrawlError::from_status(&entry.url, response.status),
                Err(FetchError::InvalidUrl(message)) => {
                    CrawlError::new(ErrorCode::InvalidUrl, &entry.url, message)
                }
                Err(FetchError::Transport(message)) => {
                    CrawlError::new(ErrorCode::TransportFailure, &entry.url, message)
                }
                Err(FetchError::TooManyRedirects(message)) => {
                    CrawlError::new(ErrorCode::TooManyRedirects, &entry.url, message)
                }
            };

            throttled |= error.code == ErrorCode::RateLimited;
            let retryable = error.code.is_retryable();
            self.session.record_error(error);
            if retryable {
                self.retry(entry);
            }
        }

        if throttled {
            self.session.policy.throttle();
            tracing::warn!(
                "Server is throttling requests, threads limit now {} and sleep {:?}",
                self.session.policy.threads_limit,
                self.session.policy.sleep
            );

            let cooldown = self.session.policy.backoff_cooldown;
            if !cooldown.is_zero() {
                tracing::info!("Pausing for {:?} before the next batch", cooldown);
                tokio::time::sleep(cooldown).await;
            }
        }

        if let Some(progress) = &self.progress {
            progress.report(self.snapshot()?, false);
        }

        Ok(())
    }

    /// Applies a 200 response: stores the page and queues its links
    async fn process_page(
        &mut self,
        entry: &QueueEntry,
        response: FetchResponse,
    ) -> Result<(), SitemapError> {
        let site_key = self.session.site.site_key().to_string();

        if self.store.count_links(&site_key)? >= self.session.policy.total_link_limit {
            tracing::debug!("Link limit reached, not storing {}", entry.url);
            self.session.frontier.clear();
            return Ok(());
        }

        let parsed = self.extractor.parse(&response.body);
        let mut record = LinkRecord::new(&entry.url, &parsed.meta.canonical, &parsed.meta.robots);
        record.status = response.status;
        record.last_modified = response.header("last-modified").and_then(parse_last_modified);

        if parsed.meta.is_noindex() {
            tracing::debug!("Not indexing {}: robots noindex", entry.url);
        } else if let Some(pattern) = self.session.content_filter.first_match(&response.body) {
            tracing::debug!("Not indexing {}: content matches {}", entry.url, pattern);
        } else {
            self.download(&entry.url, &response.body).await;
            if let Err(e) = self.store.add_link(&site_key, &record) {
                self.session.record_error(CrawlError::new(
                    ErrorCode::StoreError,
                    &entry.url,
                    e.to_string(),
                ));
                return Err(e.into());
            }
            tracing::debug!("Stored {}", entry.url);
        }

        if parsed.meta.is_nofollow() {
            tracing::debug!("Not following links of {}: robots nofollow", entry.url);
            return Ok(());
        }

        let max_depth = self.session.policy.max_depth;
        let mut queued = 0;
        for link in &parsed.links {
            if let Err(rejection) = self.session.filter.check(link) {
                tracing::trace!("Rejected {}: {}", link, rejection);
                continue;
            }

            let normalized = self.session.site.normalize(link);
            if self.session.site.depth(&normalized) > max_depth {
                tracing::trace!("Rejected {}: deeper than {}", normalized, max_depth);
                continue;
            }

            if self.session.frontier.push(&normalized) {
                queued += 1;
            }
        }
        tracing::debug!("Queued {} new links from {}", queued, entry.url);

        Ok(())
    }

    /// Puts a failed entry back on the queue unless its retries are used up
    fn retry(&mut self, entry: &QueueEntry) {
        if self
            .session
            .frontier
            .requeue(entry, self.session.policy.max_retries)
        {
            tracing::debug!("Requeued {} (attempt {})", entry.url, entry.attempt + 1);
        } else {
            tracing::warn!(
                "Giving up on {} after {} attempts",
                entry.url,
                entry.attempt + 1
            );
        }
    }

    /// Saves a stored page's HTML when a download directory is configured
    async fn download(&mut self, url: &str, body: &str) {
        let Some(dir) = self.session.policy.download_dir.clone() else {
            return;
        };

        let path = dir.join(download_file_name(url));
        let written = match tokio::fs::create_dir_all(&dir).await {
            Ok(()) => tokio::fs::write(&path, body).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            self.session.record_error(CrawlError::new(
                ErrorCode::IoError,
                url,
                format!("Failed to save {}: {}", path.display(), e),
            ));
        }
    }

    fn snapshot(&self) -> StoreResult<ProgressSnapshot> {
        Ok(ProgressSnapshot {
            scanned: self.session.frontier.scanned_count(),
            stored: self.store.count_links(self.session.site.site_key())?,
            queued: self.session.frontier.len(),
        })
    }

    /// Summarizes the crawl so far
    pub fn report(&self) -> Result<CrawlReport, SitemapError> {
        let site_key = self.session.site.site_key();
        let mut report = CrawlReport::new(
            site_key,
            self.session.frontier.scanned_count(),
            self.store.count_links(site_key)?,
            self.session.errors(),
        );
        report.elapsed = self.session.elapsed();
        report.threads_limit = self.session.policy.threads_limit;
        report.sleep = self.session.policy.sleep;
        Ok(report)
    }

    /// Every link stored for the site, in insertion order
    pub fn links(&self) -> StoreResult<Vec<LinkRecord>> {
        self.store.load_scan(self.session.site.site_key())
    }

    /// Number of links stored for the site
    pub fn links_added(&self) -> StoreResult<usize> {
        self.store.count_links(self.session.site.site_key())
    }

    /// Returns true if a raw link would be followed by this crawl
    pub fn check_link(&self, link: &str) -> bool {
        self.session.filter.is_in_scope(link)
    }

    /// Writes the stored links as sitemap files into `dir`
    ///
    /// Failures are logged, never raised.
    ///
    /// # Returns
    ///
    /// * `Some(SitemapOutput)` - The written files (none for an empty store)
    /// * `None` - The links could not be loaded or a file could not be written
    pub fn save_xml(&self, dir: &Path) -> Option<SitemapOutput> {
        let links = match self.links() {
            Ok(links) => links,
            Err(e) => {
                tracing::error!("Failed to load links for {}: {}", self.site().site_key(), e);
                return None;
            }
        };

        let writer = SitemapWriter::new(&self.session.site, self.session.policy.links_per_file);
        match writer.write(&links, dir) {
            Ok(output) => {
                tracing::info!(
                    "Wrote {} links to {} sitemap files in {}",
                    links.len(),
                    output.sitemaps.len(),
                    dir.display()
                );
                Some(output)
            }
            Err(e) => {
                tracing::error!("Failed to write sitemap: {}", e);
                None
            }
        }
    }

    pub fn errors(&self) -> &[CrawlError] {
        self.session.errors()
    }

    /// Current policy, including any backoff adjustments
    pub fn policy(&self) -> &CrawlPolicy {
        &self.session.policy
    }

    pub fn phase(&self) -> CrawlPhase {
        self.session.phase()
    }

    pub fn site(&self) -> &SiteAddress {
        &self.session.site
    }
}

/// Converts an RFC 2822 `Last-Modified` value to RFC 3339 with second precision
fn parse_last_modified(value: &str) -> Option<String> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|modified| modified.to_rfc3339_opts(SecondsFormat::Secs, false))
}

/// File name a downloaded page is saved under
pub fn download_file_name(url: &str) -> String {
    let encoded: String = ::url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
    format!("{}.tmp.html", encoded)
}
