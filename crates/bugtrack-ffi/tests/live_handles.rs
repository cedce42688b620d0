//! Global live-handle counters
//!
//! Kept in its own test binary: the counters are process-wide.

use bugtrack_ffi::*;

#[test]
fn counters_track_outstanding_handles() {
    assert_eq!(bugtrack_live_trackers(), 0);
    assert_eq!(bugtrack_live_bugs(), 0);

    unsafe {
        let bt = new_bugtracker();
        assert_eq!(bugtrack_live_trackers(), 1);

        let a = get_next_bug(bt);
        let c = get_next_bug(bt);
        assert_eq!(bugtrack_live_bugs(), 2);

        free_bugtracker(bt);
        assert_eq!(bugtrack_live_trackers(), 0);
        // Handed-out bugs are untouched by the tracker free
        assert_eq!(bugtrack_live_bugs(), 2);

        free_bug(a);
        free_bug(c);
    }

    assert_eq!(bugtrack_live_bugs(), 0);
}
