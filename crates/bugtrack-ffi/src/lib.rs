//! # bugtrack-ffi
//!
//! C ABI over `bugtrack-core`. Header: `include/bug_tracker.h`.
//!
//! ## Ownership contract
//!
//! - `new_bugtracker*` returns a tracker the caller must pass to
//!   `free_bugtracker` exactly once.
//! - `get_next_bug` moves the most severe bug out of the tracker; the
//!   caller must pass it to `free_bug` exactly once. It stays valid after
//!   its tracker is freed.
//! - `free_bugtracker` frees the tracker and the bugs still queued in it,
//!   never bugs already handed out.
//!
//! NULL is accepted everywhere and treated as "nothing". Any other pointer
//! that is not a live handle of the right kind (double free, use after
//! free, a `Bug*` passed as a tracker) is logged and the process aborts.
//! Freed handles are parked in a `quarantine` before their memory is
//! returned, so a stale pointer cannot collide with a newer handle.

use std::ffi::{CStr, CString};
use std::ptr;
use std::sync::Arc;

use libc::{c_char, size_t};

use bugtrack_core::{kerror, ktrace};
use bugtrack_core::{Ledger, TrackerConfig, TrackerError};

pub mod quarantine;
pub mod registry;

use registry::{HandleKind, Violation};

/// Opaque tracker handle
pub struct BugTracker {
    inner: bugtrack_core::BugTracker,
}

impl BugTracker {
    /// Ledger of the wrapped tracker (for leak checks from Rust)
    pub fn ledger(&self) -> Arc<Ledger> {
        self.inner.ledger()
    }
}

/// Bug handle
///
/// C sees `id` and `severity` only; the rest is private to Rust.
#[repr(C)]
pub struct Bug {
    /// NUL-terminated id, valid until `free_bug`
    pub id: *const c_char,
    pub severity: u8,
    name: CString,
    /// `None` once freed and parked
    inner: Option<bugtrack_core::Bug>,
}

/// Status codes returned by `bugtracker_insert`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtStatus {
    Ok = 0,
    /// Tracker or id pointer was NULL
    ErrNull = 1,
    /// Id is empty or not UTF-8
    ErrInvalidId = 2,
    /// Storage could not grow
    ErrExhausted = 3,
}

impl From<&TrackerError> for BtStatus {
    fn from(e: &TrackerError) -> Self {
        match e {
            TrackerError::Exhausted => BtStatus::ErrExhausted,
            _ => BtStatus::ErrInvalidId,
        }
    }
}

fn or_abort<T>(result: Result<T, Violation>) -> T {
    match result {
        Ok(v) => v,
        Err(v) => {
            bugtrack_core::kprint::set_flush_enabled(true);
            kerror!("{}", v);
            std::process::abort();
        }
    }
}

fn into_handle(inner: bugtrack_core::BugTracker) -> *mut BugTracker {
    let ptr = Box::into_raw(Box::new(BugTracker { inner }));
    registry::register(HandleKind::Tracker, ptr as usize);
    ptr
}

fn create(config: &TrackerConfig) -> *mut BugTracker {
    match bugtrack_core::BugTracker::from_config(config) {
        Ok(inner) => into_handle(inner),
        Err(e) => {
            kerror!("tracker construction failed: {}", e);
            ptr::null_mut()
        }
    }
}

/// Create a tracker seeded from `BT_SEED` (default `A:9,B:2,C:5`)
///
/// Returns NULL if the configuration is invalid or storage is exhausted.
#[no_mangle]
pub extern "C" fn new_bugtracker() -> *mut BugTracker {
    match TrackerConfig::from_env() {
        Ok(config) => create(&config),
        Err(e) => {
            kerror!("new_bugtracker: {}", e);
            ptr::null_mut()
        }
    }
}

/// Create an empty tracker
#[no_mangle]
pub extern "C" fn new_bugtracker_empty() -> *mut BugTracker {
    create(&TrackerConfig::default().unseeded())
}

unsafe fn tracker_mut<'a>(
    bt: *mut BugTracker,
    op: &'static str,
) -> Result<&'a mut BugTracker, Violation> {
    registry::check(HandleKind::Tracker, bt as usize, op)?;
    Ok(&mut *bt)
}

unsafe fn tracker_ref<'a>(
    bt: *const BugTracker,
    op: &'static str,
) -> Result<&'a BugTracker, Violation> {
    registry::check(HandleKind::Tracker, bt as usize, op)?;
    Ok(&*bt)
}

unsafe fn bug_ref<'a>(bug: *const Bug, op: &'static str) -> Result<&'a Bug, Violation> {
    registry::check(HandleKind::Bug, bug as usize, op)?;
    Ok(&*bug)
}

unsafe fn try_insert(
    bt: *mut BugTracker,
    id: *const c_char,
    severity: u8,
) -> Result<BtStatus, Violation> {
    if bt.is_null() || id.is_null() {
        return Ok(BtStatus::ErrNull);
    }
    let tracker = tracker_mut(bt, "bugtracker_insert")?;
    let Ok(id) = CStr::from_ptr(id).to_str() else {
        return Ok(BtStatus::ErrInvalidId);
    };
    Ok(match tracker.inner.insert(id, severity) {
        Ok(()) => BtStatus::Ok,
        Err(e) => BtStatus::from(&e),
    })
}

/// Queue a new bug; the tracker copies `id`
///
/// # Safety
/// `bt` must be NULL or a live tracker; `id` must be NULL or a valid
/// NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn bugtracker_insert(
    bt: *mut BugTracker,
    id: *const c_char,
    severity: u8,
) -> BtStatus {
    or_abort(try_insert(bt, id, severity))
}

unsafe fn try_next_bug(bt: *mut BugTracker) -> Result<*mut Bug, Violation> {
    if bt.is_null() {
        return Ok(ptr::null_mut());
    }
    let tracker = tracker_mut(bt, "get_next_bug")?;
    let Ok(inner) = tracker.inner.pop_highest() else {
        return Ok(ptr::null_mut());
    };

    // Ids are checked NUL-free on insert
    let name = match CString::new(inner.id()) {
        Ok(name) => name,
        Err(e) => {
            kerror!("get_next_bug: id of {} not representable: {}", inner, e);
            return Ok(ptr::null_mut());
        }
    };

    let mut bug = Box::new(Bug {
        id: ptr::null(),
        severity: inner.severity().get(),
        name,
        inner: Some(inner),
    });
    // CString's buffer is heap-owned and does not move with the Box
    bug.id = bug.name.as_ptr();

    let handle = Box::into_raw(bug);
    registry::register(HandleKind::Bug, handle as usize);
    ktrace!("get_next_bug -> {:p}", handle);
    Ok(handle)
}

/// Pop the most severe bug, transferring ownership to the caller
///
/// Returns NULL when the tracker is empty.
///
/// # Safety
/// `bt` must be NULL or a live tracker.
#[no_mangle]
pub unsafe extern "C" fn get_next_bug(bt: *mut BugTracker) -> *mut Bug {
    or_abort(try_next_bug(bt))
}

unsafe fn try_free_bug(bug: *mut Bug) -> Result<(), Violation> {
    if bug.is_null() {
        return Ok(());
    }
    registry::claim(HandleKind::Bug, bug as usize, "free_bug")?;
    let mut shell = Box::from_raw(bug);
    if let Some(inner) = shell.inner.take() {
        inner.release();
    }
    shell.id = ptr::null();
    shell.name = CString::default();
    quarantine::retire_bug(shell);
    Ok(())
}

/// Free a bug returned by `get_next_bug`
///
/// # Safety
/// `bug` must be NULL or a live bug handle; it must not be used afterward.
#[no_mangle]
pub unsafe extern "C" fn free_bug(bug: *mut Bug) {
    or_abort(try_free_bug(bug))
}

unsafe fn try_free_tracker(bt: *mut BugTracker) -> Result<usize, Violation> {
    if bt.is_null() {
        return Ok(0);
    }
    registry::claim(HandleKind::Tracker, bt as usize, "free_bugtracker")?;
    let mut shell = Box::from_raw(bt);
    let released = std::mem::take(&mut shell.inner).destroy();
    quarantine::retire_tracker(shell);
    Ok(released)
}

/// Free a tracker and every bug still queued in it
///
/// # Safety
/// `bt` must be NULL or a live tracker; it must not be used afterward.
#[no_mangle]
pub unsafe extern "C" fn free_bugtracker(bt: *mut BugTracker) {
    let released = or_abort(try_free_tracker(bt));
    if released > 0 {
        ktrace!("free_bugtracker released {} queued bug(s)", released);
    }
}

/// Number of bugs still queued
///
/// # Safety
/// `bt` must be NULL or a live tracker.
#[no_mangle]
pub unsafe extern "C" fn bugtracker_len(bt: *const BugTracker) -> size_t {
    if bt.is_null() {
        return 0;
    }
    or_abort(tracker_ref(bt, "bugtracker_len")).inner.len()
}

/// Id of a bug (borrowed; valid until `free_bug`)
///
/// # Safety
/// `bug` must be NULL or a live bug handle.
#[no_mangle]
pub unsafe extern "C" fn bug_id(bug: *const Bug) -> *const c_char {
    if bug.is_null() {
        return ptr::null();
    }
    or_abort(bug_ref(bug, "bug_id")).id
}

/// Severity of a bug
///
/// # Safety
/// `bug` must be NULL or a live bug handle.
#[no_mangle]
pub unsafe extern "C" fn bug_severity(bug: *const Bug) -> u8 {
    if bug.is_null() {
        return 0;
    }
    or_abort(bug_ref(bug, "bug_severity")).severity
}

/// Bug handles currently owned by C callers (leak diagnostic)
#[no_mangle]
pub extern "C" fn bugtrack_live_bugs() -> size_t {
    registry::live(HandleKind::Bug)
}

/// Tracker handles not yet freed (leak diagnostic)
#[no_mangle]
pub extern "C" fn bugtrack_live_trackers() -> size_t {
    registry::live(HandleKind::Tracker)
}
