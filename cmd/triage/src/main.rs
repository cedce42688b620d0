//! Triage example
//!
//! Builds a tracker from the environment, pops the `N` most severe bugs
//! (default 2), releases them, then destroys the tracker and prints the
//! allocation ledger.
//!
//! # Environment Variables
//!
//! - `BT_SEED=A:9,B:2,C:5` - bugs to seed (see `bugtrack_core::seed`)
//! - `BT_LOG_LEVEL=debug` - log level (off, error, warn, info, debug, trace)

use bugtrack_core::{kerror, kinfo};
use bugtrack_core::{BugTracker, TrackerConfig, TrackerError};

// BT_LOG_LEVEL=trace cargo run -p bugtrack-triage -- 2
fn main() {
    println!("=== Bug Triage ===\n");

    let take: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2);

    let config = match TrackerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            kerror!("bad configuration: {}", e);
            std::process::exit(2);
        }
    };

    let mut tracker = match BugTracker::from_config(&config) {
        Ok(tracker) => tracker,
        Err(e) => {
            kerror!("cannot build tracker: {}", e);
            std::process::exit(1);
        }
    };
    let ledger = tracker.ledger();
    kinfo!("tracker ready with {} bug(s)", tracker.len());

    let mut popped = Vec::with_capacity(take);
    for rank in 1..=take {
        match tracker.pop_highest() {
            Ok(bug) => {
                println!("#{} bug id {}", rank, bug.id());
                println!("#{} bug severity {}", rank, bug.severity());
                popped.push(bug);
            }
            Err(TrackerError::Empty) => {
                println!("#{} no bugs left", rank);
                break;
            }
            Err(e) => {
                kerror!("pop failed: {}", e);
                break;
            }
        }
    }

    for bug in popped {
        bug.release();
    }

    let stats = tracker.stats();
    let remaining = tracker.destroy();
    println!("\nreleased {} queued bug(s) with the tracker", remaining);
    println!(
        "inserted {}, popped {}, allocations {}, releases {}",
        stats.total_inserted,
        stats.total_popped,
        ledger.allocated(),
        ledger.released()
    );

    if !ledger.is_balanced() {
        kerror!("{} bug(s) leaked", ledger.outstanding());
        std::process::exit(1);
    }
    println!("\n=== All bugs released ===");
}
