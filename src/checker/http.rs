// src/checker/http.rs
// =============================================================================
// This module checks whether a website answers by making an HTTP GET request.
//
// Key functionality:
// - One GET per check, with a total timeout (10 seconds by default)
// - No retries, default redirect handling, no custom headers
// - Sorts whatever happens into a CheckOutcome (see outcome.rs)
// - Can check a whole target list concurrently for the status table
//
// Rust concepts:
// - async/await: For network I/O
// - Enums: To represent the different outcomes
// - Streams: For checking many targets concurrently
// =============================================================================

use super::outcome::CheckOutcome;
use crate::target::Target;
use futures::stream::{self, StreamExt}; // StreamExt gives us .buffered()
use reqwest::Client;
use serde::Serialize;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

// How many targets `check_all` probes at the same time
const MAX_IN_FLIGHT: usize = 8;

// Makes the actual requests
//
// Client is a handle around a connection pool, so cloning a Checker is cheap
// and every spawned check task gets its own clone.
#[derive(Debug, Clone)]
pub struct Checker {
    client: Client,
    timeout: Duration,
}

impl Checker {
    /// Builds a checker whose requests give up after `timeout` in total.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Checker { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // Sends one GET to `url` and classifies the result
    //
    // Never fails: network problems are outcomes too.
    pub async fn probe(&self, url: &Url) -> CheckOutcome {
        debug!(%url, "sending GET");

        match self.client.get(url.clone()).send().await {
            Ok(response) => {
                // Got a response! The status code decides the bucket
                let outcome = CheckOutcome::from_status(response.status().as_u16());
                debug!(%url, status = response.status().as_u16(), "response received");
                outcome
            }
            Err(e) => categorize_error(url, &e),
        }
    }
}

// Sorts a reqwest error into SERVER DOWN or Invalid response
//
// reqwest errors can happen for many reasons (timeout, DNS, refused
// connection, TLS, ...). All of those collapse into ServerDown. The one
// exception is a peer that answered with bytes that aren't HTTP: hyper
// reports that as a parse error somewhere in the source chain.
fn categorize_error(url: &Url, error: &reqwest::Error) -> CheckOutcome {
    if !error.is_timeout() && is_unparseable_response(error) {
        info!(%url, error = %error_chain(error), "response is not HTTP");
        return CheckOutcome::InvalidResponse;
    }

    info!(
        %url,
        timeout = error.is_timeout(),
        connect = error.is_connect(),
        error = %error_chain(error),
        "request failed"
    );
    CheckOutcome::ServerDown
}

// Walks the error's source chain looking for hyper's parse errors
//
// Matches the text of hyper 0.14's `Parse` kinds (pulled in by reqwest 0.11):
// "invalid HTTP method parsed", "invalid HTTP version parsed",
// "invalid HTTP status-code parsed", "invalid HTTP header parsed" and
// "message head is too large". A reqwest/hyper upgrade that rewords them
// breaks test_garbage_response_is_invalid.
fn is_unparseable_response(error: &reqwest::Error) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);

    while let Some(err) = current {
        let text = err.to_string();
        if text.contains("invalid HTTP") || text.contains("message head is too large") {
            return true;
        }
        current = err.source();
    }

    false
}

// Joins the error and all its sources into one line for the diagnostics
fn error_chain(error: &reqwest::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut current = error.source();

    while let Some(err) = current {
        parts.push(err.to_string());
        current = err.source();
    }

    parts.join(": ")
}

// The result of checking one target, as printed by `check-all` and `--json`
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub name: String,
    pub url: String,
    /// None when the URL didn't parse and no request was sent
    #[serde(flatten)]
    pub outcome: Option<CheckOutcome>,
    /// The log line for this result
    pub line: String,
}

impl CheckReport {
    pub fn new(target: &Target, outcome: CheckOutcome) -> Self {
        CheckReport {
            name: target.name.clone(),
            url: target.url.clone(),
            outcome: Some(outcome),
            line: outcome.to_string(),
        }
    }

    pub fn invalid_url(target: &Target) -> Self {
        CheckReport {
            name: target.name.clone(),
            url: target.url.clone(),
            outcome: None,
            line: format!("Invalid URL: {}", target.url),
        }
    }

    /// Only 2xx counts as OK
    pub fn is_ok(&self) -> bool {
        self.outcome.map_or(false, |o| o.is_success())
    }
}

// Checks one target, turning a bad URL into a report instead of a request
pub async fn check_target(checker: &Checker, target: &Target) -> CheckReport {
    match target.parse_url() {
        Ok(url) => CheckReport::new(target, checker.probe(&url).await),
        Err(e) => {
            debug!(name = %target.name, error = %e, "skipping target");
            CheckReport::invalid_url(target)
        }
    }
}

// Checks every target concurrently
//
// .buffered(N) runs up to N checks at once but hands the results back in
// the order of `targets`, so the table lines up with `list`.
pub async fn check_all(checker: &Checker, targets: &[Target]) -> Vec<CheckReport> {
    let futures = targets.iter().map(|target| check_target(checker, target));

    stream::iter(futures)
        .buffered(MAX_IN_FLIGHT)
        .collect()
        .await
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does probe() return CheckOutcome and not Result?
//    - For this tool a dead server is a normal answer, not a failure
//    - Every check must produce exactly one log line, so every path
//      produces a value
//
// 2. What is Option<&(dyn StdError + 'static)>?
//    - A reference to "some error type", decided at runtime
//    - .source() returns the error that caused this one (or None)
//    - Following source() repeatedly walks the whole cause chain
//
// 3. buffered vs buffer_unordered:
//    - buffer_unordered returns results as they finish
//    - buffered returns them in the original order
//    - Both run up to N futures at the same time
// -----------------------------------------------------------------------------
