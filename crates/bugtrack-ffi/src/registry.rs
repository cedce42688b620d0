//! Registry of live C handles
//!
//! Every pointer handed across the C boundary is recorded here and
//! removed when it is freed. Frees and field reads check membership
//! first, so a double free, a free of a pointer we never issued, or a read
//! after free is reported as a `Violation` instead of touching memory.
//!
//! Tracking is by address. Freed boxes are held in the `quarantine` for a
//! while so the allocator cannot hand the same address to a newer handle
//! as long as a stale pointer is likely to come back.
//!
//! Built with `feature = "unchecked-handles"` the membership checks
//! compile to nothing; only the live counters remain.

use core::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Kind of handle crossing the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandleKind {
    Tracker,
    Bug,
}

impl HandleKind {
    pub fn name(&self) -> &'static str {
        match self {
            HandleKind::Tracker => "BugTracker",
            HandleKind::Bug => "Bug",
        }
    }

    fn counter(&self) -> &'static AtomicUsize {
        match self {
            HandleKind::Tracker => &LIVE_TRACKERS,
            HandleKind::Bug => &LIVE_BUGS,
        }
    }
}

/// Ownership contract breach detected at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub kind: HandleKind,
    pub addr: usize,
    /// Entry point that detected it
    pub op: &'static str,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:#x} is not a live {} handle (double free, use after free, or foreign pointer)",
            self.op,
            self.addr,
            self.kind.name()
        )
    }
}

impl std::error::Error for Violation {}

static LIVE_TRACKERS: AtomicUsize = AtomicUsize::new(0);
static LIVE_BUGS: AtomicUsize = AtomicUsize::new(0);

/// Number of live handles of `kind`
pub fn live(kind: HandleKind) -> usize {
    kind.counter().load(Ordering::Relaxed)
}

cfg_if::cfg_if! {
    if #[cfg(feature = "unchecked-handles")] {
        /// Record a newly issued handle
        pub fn register(kind: HandleKind, _addr: usize) {
            kind.counter().fetch_add(1, Ordering::Relaxed);
        }

        /// Take a handle out of the live set (on free)
        pub fn claim(kind: HandleKind, _addr: usize, _op: &'static str) -> Result<(), Violation> {
            kind.counter().fetch_sub(1, Ordering::Relaxed);
            Ok(())
        }

        /// Check a handle is live (on read)
        pub fn check(_kind: HandleKind, _addr: usize, _op: &'static str) -> Result<(), Violation> {
            Ok(())
        }
    } else {
        use std::collections::BTreeSet;
        use std::sync::{Mutex, MutexGuard};

        static LIVE: Mutex<BTreeSet<(HandleKind, usize)>> = Mutex::new(BTreeSet::new());

        fn live_set() -> MutexGuard<'static, BTreeSet<(HandleKind, usize)>> {
            // A panic while holding the lock cannot leave the set half-updated
            LIVE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        /// Record a newly issued handle
        pub fn register(kind: HandleKind, addr: usize) {
            if live_set().insert((kind, addr)) {
                kind.counter().fetch_add(1, Ordering::Relaxed);
            }
        }

        /// Take a handle out of the live set (on free)
        pub fn claim(kind: HandleKind, addr: usize, op: &'static str) -> Result<(), Violation> {
            if live_set().remove(&(kind, addr)) {
                kind.counter().fetch_sub(1, Ordering::Relaxed);
                Ok(())
            } else {
                Err(Violation { kind, addr, op })
            }
        }

        /// Check a handle is live (on read)
        pub fn check(kind: HandleKind, addr: usize, op: &'static str) -> Result<(), Violation> {
            if live_set().contains(&(kind, addr)) {
                Ok(())
            } else {
                Err(Violation { kind, addr, op })
            }
        }
    }
}
