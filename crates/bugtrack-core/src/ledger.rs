//! Allocation ledger for Bugs
//!
//! Every Bug a tracker creates carries an `Obligation` issued against the
//! tracker's `Ledger`. The obligation is discharged exactly once, when the
//! Bug is dropped, whoever owns it at that point (the tracker during
//! teardown, or the caller after a pop). `outstanding() == 0` after all
//! owners are gone means nothing leaked.
//!
//! The ledger is shared through an `Arc` so it outlives the tracker: popped
//! Bugs can be released after the tracker is destroyed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Allocation/release counters for one tracker's Bugs
#[derive(Debug, Default)]
pub struct Ledger {
    allocated: AtomicU64,
    released: AtomicU64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total Bugs created (lifetime)
    #[inline]
    pub fn allocated(&self) -> u64 {
        self.allocated.load(Ordering::Relaxed)
    }

    /// Total Bugs released (lifetime)
    #[inline]
    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    /// Bugs created but not yet released
    #[inline]
    pub fn outstanding(&self) -> u64 {
        self.allocated().saturating_sub(self.released())
    }

    /// True when every allocation has been matched by a release
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.allocated() == self.released()
    }
}

/// One release obligation
///
/// Not `Clone`: one allocation, one release.
#[derive(Debug)]
pub(crate) struct Obligation {
    ledger: Arc<Ledger>,
}

impl Obligation {
    pub(crate) fn issue(ledger: &Arc<Ledger>) -> Self {
        ledger.allocated.fetch_add(1, Ordering::Relaxed);
        Self {
            ledger: Arc::clone(ledger),
        }
    }
}

impl Drop for Obligation {
    fn drop(&mut self) {
        self.ledger.released.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_discharge() {
        let ledger = Arc::new(Ledger::new());

        let a = Obligation::issue(&ledger);
        let b = Obligation::issue(&ledger);
        assert_eq!(ledger.allocated(), 2);
        assert_eq!(ledger.outstanding(), 2);
        assert!(!ledger.is_balanced());

        drop(a);
        assert_eq!(ledger.outstanding(), 1);

        drop(b);
        assert!(ledger.is_balanced());
        assert_eq!(ledger.released(), 2);
    }

    #[test]
    fn test_ledger_outlives_owner() {
        let ledger = Arc::new(Ledger::new());
        let ob = Obligation::issue(&ledger);
        let weak = Arc::downgrade(&ledger);

        drop(ledger);
        // Obligation keeps the ledger alive until it is discharged
        assert!(weak.upgrade().is_some());

        drop(ob);
        assert!(weak.upgrade().is_none());
    }
}
