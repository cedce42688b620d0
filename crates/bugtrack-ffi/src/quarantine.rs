//! Delayed deallocation of freed handles
//!
//! A freed handle's box is parked here instead of going straight back to
//! the allocator. While it is parked no new handle can be issued at the
//! same address, so a stale pointer passed to `free_bug` or
//! `free_bugtracker` still fails the registry check instead of aliasing
//! a newer live handle. The oldest box is deallocated once more than
//! `RETIRE_LIMIT` are parked.
//!
//! Parked boxes are emptied first: the Bug payload is released and the
//! tracker's queue torn down before parking, so only the shells wait.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::{Bug, BugTracker};

cfg_if::cfg_if! {
    if #[cfg(feature = "unchecked-handles")] {
        /// No live-handle checks to protect; free immediately
        pub const RETIRE_LIMIT: usize = 0;
    } else {
        /// Freed shells parked per handle kind
        pub const RETIRE_LIMIT: usize = 1024;
    }
}

/// Bounded FIFO of retired allocations
#[derive(Debug)]
pub struct Quarantine<T> {
    parked: VecDeque<T>,
    limit: usize,
}

impl<T> Quarantine<T> {
    pub const fn new(limit: usize) -> Self {
        Self {
            parked: VecDeque::new(),
            limit,
        }
    }

    /// Park `item`, returning the entry evicted to make room (if any)
    ///
    /// The caller drops the evicted entry, outside any lock.
    #[must_use]
    pub fn park(&mut self, item: T) -> Option<T> {
        if self.limit == 0 {
            return Some(item);
        }
        let evicted = if self.parked.len() >= self.limit {
            self.parked.pop_front()
        } else {
            None
        };
        self.parked.push_back(item);
        evicted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parked.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parked.is_empty()
    }
}

/// Emptied `Bug` shell
struct RetiredBug {
    _shell: Box<Bug>,
}

// SAFETY: the only non-Send field is `id`, which is nulled before parking;
// the CString it pointed into has been replaced and the payload released.
unsafe impl Send for RetiredBug {}

static RETIRED_BUGS: Mutex<Quarantine<RetiredBug>> =
    Mutex::new(Quarantine::new(RETIRE_LIMIT));
static RETIRED_TRACKERS: Mutex<Quarantine<Box<BugTracker>>> =
    Mutex::new(Quarantine::new(RETIRE_LIMIT));

fn lock<T>(q: &'static Mutex<Quarantine<T>>) -> MutexGuard<'static, Quarantine<T>> {
    q.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Park a freed bug shell; `id` must already be null
pub(crate) fn retire_bug(shell: Box<Bug>) {
    debug_assert!(shell.id.is_null());
    let evicted = lock(&RETIRED_BUGS).park(RetiredBug { _shell: shell });
    drop(evicted);
}

/// Park a freed tracker shell; its queue must already be torn down
pub(crate) fn retire_tracker(shell: Box<BugTracker>) {
    let evicted = lock(&RETIRED_TRACKERS).park(shell);
    drop(evicted);
}
