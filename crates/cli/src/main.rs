// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! trident - local monitoring and automation daemon
//!
//! Loads one section of a JSON configuration file, applies command-line
//! overrides, builds the daemon, and runs every enabled plugin to
//! completion. A termination signal triggers the ordered stop path and
//! exits 0.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod builtins;
mod logging;

use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use trident_config::{load_config, Overrides};
use trident_engine::TridentDaemon;

#[derive(Debug, Parser)]
#[command(
    name = "trident",
    version,
    about = "Trident - local monitoring and automation daemon"
)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long)]
    config: PathBuf,

    /// Named config section to load
    #[arg(long, default_value = "trident")]
    section: String,

    /// Force DEBUG logging
    #[arg(long)]
    verbose: bool,

    /// Disable logging entirely
    #[arg(long)]
    quiet: bool,

    /// Worker pool size
    #[arg(long)]
    workers: Option<usize>,

    /// Disable on-disk persistence
    #[arg(long)]
    no_store: bool,

    /// Shared store file for all runners
    #[arg(long)]
    global_store: Option<PathBuf>,

    /// Per-runner store directory
    #[arg(long)]
    path_store: Option<PathBuf>,

    /// Drop accumulated results on plugin error
    #[arg(long)]
    dont_store_on_error: bool,

    /// Keep only results whose string form matches any of these patterns
    #[arg(long, num_args = 1..)]
    filter_results: Vec<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            verbose: self.verbose,
            quiet: self.quiet,
            workers: self.workers,
            no_store: self.no_store,
            global_store: self.global_store.clone(),
            path_store: self.path_store.clone(),
            dont_store_on_error: self.dont_store_on_error,
            filter_results: self.filter_results.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => {
            // --help / --version
            let _ = e.print();
            std::process::exit(0);
        }
    };
    std::process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    let mut settings = match load_config(&cli.config, &cli.section) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };
    settings.apply_overrides(&cli.overrides());
    logging::init(&settings);
    tracing::info!(section = %cli.section, "starting trident");

    let registry = builtins::registry();
    let mut daemon = match TridentDaemon::new(settings, &registry) {
        Ok(daemon) => daemon,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize daemon");
            eprintln!("Error: {e}");
            return 1;
        }
    };

    let start = Instant::now();
    daemon.start_all_runners();

    let joined = tokio::select! {
        result = daemon.wait_for_runners() => Some(result),
        _ = shutdown_signal() => None,
    };
    let outcome = match joined {
        Some(result) => result,
        None => {
            tracing::warn!("interrupt signal sent, stopping all runners");
            daemon.stop_all_runners();
            Ok(())
        }
    };

    let code = match outcome {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "daemon failed with unrecoverable error");
            eprintln!("Error: {e}");
            1
        }
    };
    tracing::info!(
        elapsed_seconds = start.elapsed().as_secs_f64(),
        "trident finished execution"
    );
    code
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = ctrl_c => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(_) => {
            let _ = ctrl_c.await;
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
