//! Scheduler for managing the crawl frontier
//!
//! This module handles:
//! - The FIFO queue of URLs to crawl, which keeps traversal breadth-first
//! - The scanned set guaranteeing each URL is dispatched at most once
//! - Bounded re-queueing of throttled or unreachable URLs
//! - Batch formation for the crawl engine's dispatch loop

use crate::url::SiteAddress;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

/// A URL waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    /// Normalized absolute URL
    pub url: String,
    /// 0 for the first dispatch, incremented on every retry
    pub attempt: u32,
}

impl QueueEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            attempt: 0,
        }
    }

    pub fn is_retry(&self) -> bool {
        self.attempt > 0
    }
}

/// FIFO crawl frontier with scan deduplication
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<QueueEntry>,
    queued: HashSet<String>,
    scanned: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a newly discovered URL to the tail of the queue
    ///
    /// # Returns
    ///
    /// `false` if the URL was already scanned or is already waiting
    pub fn push(&mut self, url: &str) -> bool {
        if self.scanned.contains(url) || self.queued.contains(url) {
            return false;
        }
        self.queued.insert(url.to_string());
        self.queue.push_back(QueueEntry::new(url));
        true
    }

    /// Puts a failed entry back at the tail for another attempt
    ///
    /// Retries skip the scanned check but are bounded by `max_retries`.
    ///
    /// # Returns
    ///
    /// `false` if the entry has used up its retries and was dropped
    pub fn requeue(&mut self, entry: &QueueEntry, max_retries: u32) -> bool {
        if entry.attempt >= max_retries {
            return false;
        }
        self.queue.push_back(QueueEntry {
            url: entry.url.clone(),
            attempt: entry.attempt + 1,
        });
        true
    }

    /// Takes the next batch of entries to dispatch
    ///
    /// Entries are taken from the head. First-time entries that were already
    /// scanned, and entries deeper than `max_depth`, are discarded without
    /// counting against `limit`. Every returned entry is marked scanned.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of entries in the batch
    /// * `site` - Site the depth is measured against
    /// * `max_depth` - Maximum allowed URL depth
    pub fn next_batch(
        &mut self,
        limit: usize,
        site: &SiteAddress,
        max_depth: u32,
    ) -> Vec<QueueEntry> {
        let mut batch = Vec::with_capacity(limit);

        while batch.len() < limit {
            let Some(entry) = self.queue.pop_front() else {
                break;
            };
            self.queued.remove(&entry.url);

            if !entry.is_retry() && self.scanned.contains(&entry.url) {
                tracing::trace!("Skipping already scanned {}", entry.url);
                continue;
            }

            self.scanned.insert(entry.url.clone());

            if site.depth(&entry.url) > max_depth {
                tracing::trace!("Skipping {} deeper than {}", entry.url, max_depth);
                continue;
            }

            batch.push(entry);
        }

        batch
    }

    /// Drops every waiting entry
    pub fn clear(&mut self) {
        self.queue.clear();
        self.queued.clear();
    }

    /// Forgets all state, including the scanned set
    pub fn reset(&mut self) {
        self.clear();
        self.scanned.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_scanned(&self, url: &str) -> bool {
        self.scanned.contains(url)
    }

    pub fn scanned_count(&self) -> usize {
        self.scanned.len()
    }

    /// Iterates over waiting entries, head first
    pub fn entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.queue.iter()
    }
}

/// Delay before the `index`-th dispatch of a batch
///
/// Staggering by `(index + 1) * sleep` spaces dispatches the way sequential
/// sleeps between requests would.
pub fn dispatch_delay(sleep: Duration, index: usize) -> Duration {
    let steps = u32::try_from(index + 1).unwrap_or(u32::MAX);
    sleep.saturating_mul(steps)
}
