// src/session/mod.rs
// =============================================================================
// This module holds the state of an interactive session.
//
// Submodules:
// - log: The response log shown to the user
// - state: Targets + log + generation counter, in one struct
// - controller: Starts checks and applies their results to the state
// =============================================================================

mod controller;
mod log;
mod state;

pub use controller::Controller;
