//! C caller example
//!
//! Runs `csrc/triage.c` (the classic "C program using a Rust library"
//! flow) and checks that every handle it was given came back.

use libc::c_int;

extern "C" {
    fn bt_triage() -> c_int;
}

fn main() {
    println!("=== C Caller ===\n");

    let rc = unsafe { bt_triage() };
    if rc != 0 {
        eprintln!("bt_triage returned {}", rc);
        std::process::exit(rc);
    }

    let bugs = bugtrack_ffi::bugtrack_live_bugs();
    let trackers = bugtrack_ffi::bugtrack_live_trackers();
    println!("\nlive handles after C run: {} bug(s), {} tracker(s)", bugs, trackers);

    if bugs != 0 || trackers != 0 {
        eprintln!("C caller leaked handles");
        std::process::exit(1);
    }
    println!("\n=== No handles leaked ===");
}
