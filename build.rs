// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build script for BlogFlow.
//!
//! Refuses to build with a compiler older than the declared minimum
//! supported Rust version.

use std::process;

/// Minimum supported Rust version, kept in sync with `rust-version`.
const MIN_RUST_VERSION: &str = "1.74.0";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if version_check::is_min_version(MIN_RUST_VERSION) != Some(true) {
        eprintln!(
            "BlogFlow requires Rust {} or newer.",
            MIN_RUST_VERSION
        );
        process::exit(1);
    }
}
