//! Build script for bugtrack-c-caller
//!
//! Compiles the C triage program against `bug_tracker.h`. The Rust side
//! of the ABI comes from the `bugtrack-ffi` dependency at link time.

use std::env;
use std::path::PathBuf;

fn main() {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let include_dir = manifest_dir.join("../../crates/bugtrack-ffi/include");

    println!("cargo:rerun-if-changed=csrc/triage.c");
    println!("cargo:rerun-if-changed={}", include_dir.join("bug_tracker.h").display());

    cc::Build::new()
        .file("csrc/triage.c")
        .include(&include_dir)
        .warnings(true)
        .compile("bt_triage");
}
