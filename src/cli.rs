// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Targets are numbered from 1 on the command line, the way `list` shows
// them. Everything inside the program counts from 0.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "site-pulse",
    version = "0.1.0",
    about = "Checks whether a short list of websites is reachable",
    long_about = "site-pulse sends a single GET request to a site and reports whether it answered \
                  with success, a client error, a server error, or not at all."
)]
pub struct Cli {
    /// TOML file with `timeout_secs` and a `[[targets]]` list
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Print debug diagnostics to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the configured targets
    List {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check one target and print the response log
    ///
    /// Example: site-pulse check 2
    Check {
        /// Target number, as shown by `list`
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        number: u64,

        /// Output a JSON report instead of the log
        #[arg(long)]
        json: bool,
    },

    /// Check any URL, listed or not
    ///
    /// Example: site-pulse probe https://example.com --name Example
    Probe {
        /// URL to check
        url: String,

        /// Name shown in the log header (defaults to the URL)
        #[arg(long)]
        name: Option<String>,

        /// Output a JSON report instead of the log
        #[arg(long)]
        json: bool,
    },

    /// Check every target concurrently and print a status table
    CheckAll {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Interactive session: rename, check, open, clear and watch the log
    Session,
}

// Converts a 1-based target number from the user into an index
//
// A number too big for usize maps to usize::MAX, which no list reaches,
// so the lookup fails with "no target" instead of wrapping around.
pub fn to_index(number: u64) -> usize {
    usize::try_from(number.saturating_sub(1)).unwrap_or(usize::MAX)
}
