// src/checker/mod.rs
// =============================================================================
// This module contains the reachability check.
//
// Submodules:
// - http: Makes the GET request and sorts the result into an outcome
// - outcome: The possible outcomes, their log lines, and the check errors
//
// This file (mod.rs) is the module root - it re-exports the public API.
// =============================================================================

mod http;
mod outcome;

pub use http::{check_all, CheckReport, Checker};
pub use outcome::{CheckError, CheckOutcome};
