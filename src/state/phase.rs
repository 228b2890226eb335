/// Crawl phase definitions
///
/// A crawl moves through `Idle -> Seeding -> Draining -> Completed`. A crawl
/// whose site already has a stored scan goes straight from `Idle` to
/// `Completed`, and a completed crawl returns to `Idle` before a rescan.
use std::fmt;

/// Represents the current phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrawlPhase {
    /// No queue activity
    #[default]
    Idle,

    /// robots.txt loaded, root URL being normalized and enqueued
    Seeding,

    /// Batches are being dispatched until the queue is empty
    Draining,

    /// The queue is empty, or the site already had a stored scan
    Completed,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Seeding)
                | (Self::Idle, Self::Completed)
                | (Self::Seeding, Self::Draining)
                | (Self::Draining, Self::Completed)
                | (Self::Completed, Self::Idle)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Seeding => "seeding",
            Self::Draining => "draining",
            Self::Completed => "completed",
        }
    }

    /// Returns all crawl phases
    pub fn all_phases() -> Vec<Self> {
        vec![Self::Idle, Self::Seeding, Self::Draining, Self::Completed]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(CrawlPhase::Idle.can_transition_to(CrawlPhase::Seeding));
        assert!(CrawlPhase::Seeding.can_transition_to(CrawlPhase::Draining));
        assert!(CrawlPhase::Draining.can_transition_to(CrawlPhase::Completed));
    }

    #[test]
    fn test_skip_and_reset_transitions() {
        assert!(CrawlPhase::Idle.can_transition_to(CrawlPhase::Completed));
        assert!(CrawlPhase::Completed.can_transition_to(CrawlPhase::Idle));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!CrawlPhase::Completed.can_transition_to(CrawlPhase::Draining));
        assert!(!CrawlPhase::Draining.can_transition_to(CrawlPhase::Seeding));
        assert!(!CrawlPhase::Idle.can_transition_to(CrawlPhase::Draining));
        assert!(!CrawlPhase::Seeding.can_transition_to(CrawlPhase::Completed));

        for phase in CrawlPhase::all_phases() {
            assert!(
                !phase.can_transition_to(phase),
                "Self transition allowed for {:?}",
                phase
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CrawlPhase::Idle), "idle");
        assert_eq!(format!("{}", CrawlPhase::Draining), "draining");
        assert_eq!(CrawlPhase::default(), CrawlPhase::Idle);
    }
}
