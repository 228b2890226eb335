//! Mutable state of a single crawl
//!
//! The session is owned by the coordinating task. Fetches running inside a
//! batch never touch it; results are applied after the batch completes.

use crate::config::CrawlPolicy;
use crate::crawler::Frontier;
use crate::state::{CrawlError, CrawlPhase};
use crate::url::{LinkFilter, PatternMatcher, SiteAddress};
use crate::{ConfigError, SitemapError};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct CrawlSession {
    pub site: SiteAddress,
    pub policy: CrawlPolicy,
    pub filter: LinkFilter,
    pub content_filter: PatternMatcher,
    pub frontier: Frontier,
    errors: Vec<CrawlError>,
    phase: CrawlPhase,
    started_at: Option<Instant>,
}

impl CrawlSession {
    /// Creates an idle session for a site
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSession)` - Session with compiled link and content filters
    /// * `Err(ConfigError)` - An exclusion pattern failed to compile
    pub fn new(site: SiteAddress, policy: CrawlPolicy) -> Result<Self, ConfigError> {
        let filter = LinkFilter::new(
            site.clone(),
            &policy.exclude_patterns,
            &policy.exclude_extensions,
        )?;
        let content_filter = PatternMatcher::for_content(&policy.content_exclude_patterns)?;

        Ok(Self {
            site,
            policy,
            filter,
            content_filter,
            frontier: Frontier::new(),
            errors: Vec::new(),
            phase: CrawlPhase::Idle,
            started_at: None,
        })
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves the session to another phase
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The transition was legal
    /// * `Err(SitemapError::InvalidTransition)` - It was not; the phase is unchanged
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), SitemapError> {
        if !self.phase.can_transition_to(next) {
            return Err(SitemapError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        if next == CrawlPhase::Seeding {
            self.started_at = Some(Instant::now());
        }
        self.phase = next;
        Ok(())
    }

    /// Appends a failure to the session's error log
    pub fn record_error(&mut self, error: CrawlError) {
        tracing::warn!("{}", error);
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[CrawlError] {
        &self.errors
    }

    /// Time since seeding began, zero if the crawl never started
    pub fn elapsed(&self) -> Duration {
        self.started_at
            .map(|started| started.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// Clears per-crawl state so the session can run again
    pub fn reset(&mut self) -> Result<(), SitemapError> {
        if self.phase == CrawlPhase::Completed {
            self.transition(CrawlPhase::Idle)?;
        }
        self.frontier.reset();
        self.errors.clear();
        self.started_at = None;
        Ok(())
    }
}
