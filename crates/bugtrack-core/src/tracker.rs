//! Severity-ordered bug tracker
//!
//! `BugTracker` owns every queued `Bug`. `pop_highest` moves the most
//! severe one out to the caller; from then on the tracker holds no
//! reference to it. Destroying (or dropping) the tracker releases only
//! what is still queued.
//!
//! # Ordering
//!
//! Max severity first. Among equal severities the earliest inserted bug
//! wins: each bug gets an increasing sequence number and the heap key is
//! `(severity, Reverse(seq))`.

use std::cmp::{Ordering, Reverse};
use std::sync::Arc;

use crate::bug::{Bug, Severity};
use crate::config::TrackerConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::heap::MaxHeap;
use crate::kprint::{log_level, set_log_level, LogLevel};
use crate::ledger::{Ledger, Obligation};
use crate::seed::SeedBug;
use crate::{kdebug, ktrace};

/// Heap entry: orders by severity, then earliest sequence
#[derive(Debug)]
struct Queued(Bug);

impl Queued {
    #[inline]
    fn key(&self) -> (Severity, Reverse<u64>) {
        (self.0.severity(), Reverse(self.0.seq()))
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Max-priority queue of owned Bugs
#[derive(Debug)]
pub struct BugTracker {
    heap: MaxHeap<Queued>,

    /// Next insertion sequence number
    next_seq: u64,

    /// Shared with every Bug this tracker creates
    ledger: Arc<Ledger>,

    total_popped: u64,
    total_released_on_teardown: u64,
}

impl BugTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self {
            heap: MaxHeap::new(),
            next_seq: 0,
            ledger: Arc::new(Ledger::new()),
            total_popped: 0,
            total_released_on_teardown: 0,
        }
    }

    /// Create an empty tracker with room for `capacity` bugs
    pub fn with_capacity(capacity: usize) -> TrackerResult<Self> {
        let mut tracker = Self::new();
        tracker.heap = MaxHeap::try_with_capacity(capacity)?;
        Ok(tracker)
    }

    /// Create a tracker pre-populated with `seed`, inserted in order
    pub fn seeded(seed: &[SeedBug]) -> TrackerResult<Self> {
        let mut tracker = Self::with_capacity(seed.len())?;
        tracker.insert_all(seed)?;
        Ok(tracker)
    }

    /// Create a tracker from configuration
    ///
    /// Fails as a whole: if any seed insert fails, the partially built
    /// tracker is dropped (releasing what it had) and the error returned.
    pub fn from_config(config: &TrackerConfig) -> TrackerResult<Self> {
        config.validate()?;
        // Raise to debug, never lower a more verbose BT_LOG_LEVEL
        if config.debug_logging && log_level() < LogLevel::Debug {
            set_log_level(LogLevel::Debug);
        }

        let capacity = config.initial_capacity.max(config.seed.len());
        let mut tracker = Self::with_capacity(capacity)?;
        tracker.insert_all(&config.seed)?;

        kdebug!(
            "tracker created: {} seeded, capacity {}",
            tracker.len(),
            tracker.capacity()
        );
        Ok(tracker)
    }

    fn insert_all(&mut self, seed: &[SeedBug]) -> TrackerResult<()> {
        for s in seed {
            self.insert(s.id.clone(), s.severity)?;
        }
        Ok(())
    }

    /// Queue a new bug; the tracker owns it until it is popped
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        severity: impl Into<Severity>,
    ) -> TrackerResult<()> {
        let id = id.into();
        if !Bug::is_valid_id(&id) {
            return Err(TrackerError::InvalidId(id));
        }

        // Reserve before issuing the obligation so a failed insert leaves
        // the ledger untouched.
        self.heap.try_reserve(1)?;

        let seq = self.next_seq;
        self.next_seq += 1;
        let bug = Bug::new(id, severity.into(), seq, Obligation::issue(&self.ledger));
        ktrace!("insert {} (seq {})", bug, seq);

        self.heap.try_push(Queued(bug))?;
        Ok(())
    }

    /// Remove the most severe bug and hand ownership to the caller
    ///
    /// Returns `TrackerError::Empty` when nothing is queued.
    pub fn pop_highest(&mut self) -> TrackerResult<Bug> {
        let Queued(bug) = self.heap.pop().ok_or(TrackerError::Empty)?;
        self.total_popped += 1;
        ktrace!("pop {} ({} left)", bug, self.heap.len());
        Ok(bug)
    }

    /// Most severe queued bug, still owned by the tracker
    pub fn peek_highest(&self) -> Option<&Bug> {
        self.heap.peek().map(|q| &q.0)
    }

    /// Number of queued bugs
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Reserved heap slots (not shrunk by pop)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    /// Ledger shared with every Bug this tracker created
    ///
    /// Stays valid after the tracker is destroyed.
    pub fn ledger(&self) -> Arc<Ledger> {
        Arc::clone(&self.ledger)
    }

    /// Statistics snapshot
    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            queued: self.heap.len(),
            total_inserted: self.next_seq,
            total_popped: self.total_popped,
            total_released_on_teardown: self.total_released_on_teardown,
        }
    }

    /// Destroy the tracker, releasing every bug still queued
    ///
    /// Returns how many bugs were released. Bugs already popped are not
    /// touched.
    pub fn destroy(mut self) -> usize {
        self.release_queued()
    }

    fn release_queued(&mut self) -> usize {
        let released = self.heap.drain().count();
        self.total_released_on_teardown += released as u64;
        if released > 0 {
            kdebug!("teardown released {} queued bug(s)", released);
        }
        released
    }
}

impl Default for BugTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BugTracker {
    fn drop(&mut self) {
        self.release_queued();
    }
}

/// Statistics for BugTracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerStats {
    /// Bugs currently queued
    pub queued: usize,
    /// Total bugs inserted (lifetime)
    pub total_inserted: u64,
    /// Total bugs handed to callers (lifetime)
    pub total_popped: u64,
    /// Bugs released by teardown
    pub total_released_on_teardown: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_seed;

    #[test]
    fn test_pop_order() {
        let mut bt = BugTracker::seeded(&default_seed()).unwrap();

        let a = bt.pop_highest().unwrap();
        assert_eq!((a.id(), a.severity().get()), ("A", 9));
        let c = bt.pop_highest().unwrap();
        assert_eq!((c.id(), c.severity().get()), ("C", 5));
        let b = bt.pop_highest().unwrap();
        assert_eq!((b.id(), b.severity().get()), ("B", 2));

        assert_eq!(bt.pop_highest().unwrap_err(), TrackerError::Empty);
    }

    #[test]
    fn test_tie_break_earliest_first() {
        let mut bt = BugTracker::new();
        bt.insert("first", Severity::HIGH).unwrap();
        bt.insert("low", Severity::LOW).unwrap();
        bt.insert("second", Severity::HIGH).unwrap();
        bt.insert("third", Severity::HIGH).unwrap();

        let order: Vec<String> = std::iter::from_fn(|| bt.pop_highest().ok())
            .map(|b| b.id().to_string())
            .collect();
        assert_eq!(order, ["first", "second", "third", "low"]);
    }

    #[test]
    fn test_insert_rejects_bad_id() {
        let mut bt = BugTracker::new();
        assert_eq!(
            bt.insert("", Severity::LOW),
            Err(TrackerError::InvalidId(String::new()))
        );
        assert!(bt.insert("nul\0", Severity::LOW).is_err());
        assert!(bt.is_empty());
        assert_eq!(bt.ledger().allocated(), 0);
    }

    #[test]
    fn test_peek_does_not_transfer() {
        let mut bt = BugTracker::seeded(&default_seed()).unwrap();
        assert_eq!(bt.peek_highest().map(|b| b.id()), Some("A"));
        assert_eq!(bt.len(), 3);
        assert_eq!(bt.pop_highest().unwrap().id(), "A");
    }

    #[test]
    fn test_destroy_releases_only_queued() {
        let mut bt = BugTracker::seeded(&default_seed()).unwrap();
        let ledger = bt.ledger();

        let a = bt.pop_highest().unwrap();
        assert_eq!(bt.destroy(), 2);

        // Popped bug survives the tracker
        assert_eq!(a.id(), "A");
        assert_eq!(ledger.outstanding(), 1);

        a.release();
        assert!(ledger.is_balanced());
        assert_eq!(ledger.allocated(), 3);
    }

    #[test]
    fn test_drop_releases_queued() {
        let bt = BugTracker::seeded(&default_seed()).unwrap();
        let ledger = bt.ledger();
        drop(bt);
        assert!(ledger.is_balanced());
        assert_eq!(ledger.released(), 3);
    }

    #[test]
    fn test_stats() {
        let mut bt = BugTracker::seeded(&default_seed()).unwrap();
        let _a = bt.pop_highest().unwrap();

        let stats = bt.stats();
        assert_eq!(stats.queued, 2);
        assert_eq!(stats.total_inserted, 3);
        assert_eq!(stats.total_popped, 1);
        assert_eq!(stats.total_released_on_teardown, 0);
    }

    #[test]
    fn test_from_config_unseeded() {
        let config = TrackerConfig::new().unseeded().initial_capacity(32);
        let bt = BugTracker::from_config(&config).unwrap();
        assert!(bt.is_empty());
        assert!(bt.capacity() >= 32);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = TrackerConfig::new().seed(vec![SeedBug::new("", Severity::LOW)]);
        assert!(matches!(
            BugTracker::from_config(&config),
            Err(TrackerError::InvalidId(_))
        ));
    }

    #[test]
    fn test_with_capacity_exhausted() {
        assert_eq!(
            BugTracker::with_capacity(usize::MAX).unwrap_err(),
            TrackerError::Exhausted
        );
    }

    #[test]
    fn test_capacity_retained() {
        let mut bt = BugTracker::seeded(&default_seed()).unwrap();
        let cap = bt.capacity();
        while bt.pop_highest().is_ok() {}
        assert_eq!(bt.capacity(), cap);
    }
}
