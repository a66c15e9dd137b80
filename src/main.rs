// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up tracing (diagnostics on stderr)
// 3. Load the config (targets + timeout)
// 4. Dispatch to the appropriate subcommand handler
// 5. Exit with proper code (0 = site OK, 1 = not OK, 2 = error)
//
// Rust concepts used:
// - async/await: The requests run on the tokio runtime
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - the GET request and its classification
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - timeout and target list
mod opener; // src/opener.rs - "open in browser"
mod output; // src/output.rs - tables, JSON and the log block
mod repl; // src/repl.rs - the interactive session loop
mod session; // src/session/ - app state, response log, controller
mod target; // src/target.rs - name + URL pairs

use anyhow::{bail, Context, Result};
use checker::{CheckError, CheckReport, Checker};
use clap::Parser; // Parser trait enables the parse() method
use cli::{Cli, Commands};
use config::Config;
use session::Controller;
use target::Target;
use tracing_subscriber::EnvFilter;

// The #[tokio::main] attribute creates a tokio runtime and runs main inside it
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Diagnostics go to stderr; RUST_LOG overrides the default filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "site_pulse=debug"
    } else {
        "site_pulse=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// This is the main application logic
// Returns:
//   Ok(0) = the check(s) succeeded
//   Ok(1) = at least one target is not OK
//   Err = unexpected error (exit code 2)
async fn run(cli: Cli) -> Result<i32> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(timeout) = cli.timeout {
        if timeout == 0 {
            bail!("--timeout must be at least 1 second");
        }
        config.timeout_secs = timeout;
    }

    let checker = Checker::new(config.timeout()).context("Failed to create HTTP client")?;
    tracing::debug!(
        timeout_secs = config.timeout_secs,
        targets = config.targets.len(),
        "config loaded"
    );

    match cli.command {
        Commands::List { json } => {
            output::print_targets(&config.targets, json)?;
            Ok(0)
        }
        Commands::Check { number, json } => {
            let controller = Controller::new(config.targets, checker);
            let target = controller.state().target(cli::to_index(number))?.clone();
            handle_check(controller, target, json).await
        }
        Commands::Probe { url, name, json } => {
            let target = Target::new(name.unwrap_or_else(|| url.clone()), url);
            let controller = Controller::new(config.targets, checker);
            handle_check(controller, target, json).await
        }
        Commands::CheckAll { json } => handle_check_all(&checker, &config.targets, json).await,
        Commands::Session => {
            repl::run(Controller::new(config.targets, checker)).await?;
            Ok(0)
        }
    }
}

// Handles 'check' and 'probe': one check, then print the log (or JSON)
async fn handle_check(mut controller: Controller, target: Target, json: bool) -> Result<i32> {
    let outcome = match controller.check_target(&target) {
        Ok(_) => controller.settle().await,
        // The log now holds the "Invalid URL" line
        Err(CheckError::MalformedUrl { .. }) => None,
        Err(e) => return Err(e.into()),
    };

    if json {
        let report = match outcome {
            Some(outcome) => CheckReport::new(&target, outcome),
            None => CheckReport::invalid_url(&target),
        };
        output::print_report(&report)?;
    } else {
        println!("{}", controller.state().log().render());
    }

    match outcome {
        Some(outcome) if outcome.is_success() => Ok(0),
        _ => Ok(1),
    }
}

// Handles 'check-all': every target concurrently, then a table (or JSON)
async fn handle_check_all(checker: &Checker, targets: &[Target], json: bool) -> Result<i32> {
    if !json {
        println!("🌐 Checking {} target(s)...\n", targets.len());
    }

    let reports = checker::check_all(checker, targets).await;
    output::print_reports(&reports, json)?;

    if reports.iter().all(|r| r.is_ok()) {
        Ok(0)
    } else {
        Ok(1)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does main() not return Result?
//    - We want exit code 2 for errors, and 0/1 for the check result
//    - std::process::exit lets us pick the code ourselves
//
// 2. What does cli.config.as_deref() do?
//    - Turns Option<PathBuf> into Option<&Path>
//    - So we can borrow the path instead of moving it
//
// 3. Why print diagnostics to stderr?
//    - stdout is for results (the log, tables, JSON)
//    - `site-pulse check-all --json > out.json` stays valid JSON even with -v
// -----------------------------------------------------------------------------
