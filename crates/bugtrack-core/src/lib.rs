//! # bugtrack-core
//!
//! Core types for the bugtrack severity-ordered issue tracker.
//!
//! This crate has no FFI and no platform-specific code. The C boundary
//! (opaque handles, registry of live pointers) lives in `bugtrack-ffi`.
//!
//! ## Modules
//!
//! - `bug` - `Bug` value and `Severity` level
//! - `heap` - Vec-backed binary max-heap
//! - `tracker` - `BugTracker` (ownership-transferring priority queue)
//! - `ledger` - Allocation/release accounting for Bugs
//! - `seed` - Seed list parsing (`ID:SEV,ID:SEV`)
//! - `config` - Tracker configuration and environment helpers
//! - `error` - Error types
//! - `kprint` - Kernel-style debug printing macros
//!
//! ## Ownership
//!
//! ```text
//!   BugTracker ──owns──▶ queued Bugs          (released on destroy/drop)
//!        │
//!        └─ pop_highest() ──moves──▶ caller   (released by Bug::release / drop)
//! ```
//!
//! A popped `Bug` is a plain owned value: releasing it consumes it, so a
//! second release or a read after release does not compile.

pub mod bug;
pub mod heap;
pub mod tracker;
pub mod ledger;
pub mod seed;
pub mod config;
pub mod error;
pub mod kprint;

// Re-exports for convenience
pub use bug::{Bug, Severity};
pub use tracker::{BugTracker, TrackerStats};
pub use ledger::Ledger;
pub use seed::{default_seed, parse_seed, SeedBug};
pub use config::{env_get, env_get_bool, env_get_opt, TrackerConfig};
pub use error::{SeedError, TrackerError, TrackerResult};
pub use kprint::{init as init_logging, set_flush_enabled, set_log_level, LogLevel};

/// Tracker-wide constants
pub mod constants {
    /// Default initial heap capacity
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Upper bound accepted for a configured initial capacity
    pub const MAX_INITIAL_CAPACITY: usize = 1 << 24;

    /// Separator between entries in a seed list
    pub const SEED_ENTRY_SEPARATOR: char = ',';

    /// Separator between id and severity inside a seed entry
    pub const SEED_FIELD_SEPARATOR: char = ':';
}
