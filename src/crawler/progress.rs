//! Periodic progress reporting
//!
//! An optional observer invoked by the crawl engine after batches. It fires
//! whenever the scanned count is a multiple of the configured frequency, and
//! unconditionally when the crawl completes.

/// Counters passed to the progress callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    /// URLs dequeued and processed so far
    pub scanned: usize,
    /// Links stored for the site
    pub stored: usize,
    /// URLs still waiting in the queue
    pub queued: usize,
}

/// Callback invoked with each progress snapshot
pub type ProgressCallback = Box<dyn Fn(ProgressSnapshot) + Send + Sync>;

/// Decides when the progress callback fires
pub struct ProgressReporter {
    callback: ProgressCallback,
    frequency: usize,
}

impl ProgressReporter {
    pub fn new(frequency: usize, callback: ProgressCallback) -> Self {
        Self {
            callback,
            frequency: frequency.max(1),
        }
    }

    /// Invokes the callback if it is due
    ///
    /// Nothing is reported before the first URL is scanned.
    ///
    /// # Returns
    ///
    /// `true` if the callback was invoked
    pub fn report(&self, snapshot: ProgressSnapshot, force: bool) -> bool {
        if snapshot.scanned == 0 {
            return false;
        }
        if force || snapshot.scanned % self.frequency == 0 {
            (self.callback)(snapshot);
            return true;
        }
        false
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("frequency", &self.frequency)
            .finish_non_exhaustive()
    }
}
