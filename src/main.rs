// Copyright © 2024 BlogFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # BlogFlow CLI
//!
//! This is the main entry point for the BlogFlow command-line interface.
//! It parses arguments, initialises the logger and runs the requested
//! subcommand.

use anyhow::Context;
use blogflow::cli;
use log::{info, LevelFilter};

/// Initialises `env_logger`; `RUST_LOG` wins over the `-v` count.
fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Runs the parsed command, writing its report to stdout.
fn run() -> anyhow::Result<()> {
    let matches = cli::build().get_matches();
    init_logger(matches.get_count("verbose"));
    info!("Starting BlogFlow v{}", cli::VERSION);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::execute(&matches, &mut out).context("BlogFlow command failed")?;

    Ok(())
}

/// The main entry point for the BlogFlow CLI.
fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
