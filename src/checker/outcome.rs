// src/checker/outcome.rs
// =============================================================================
// This module defines what a single reachability check can end with.
//
// Every check ends in exactly one outcome, and every outcome has exactly
// one human-readable log line:
// - 200-299: ✅ SUCCESS
// - 400-499: ⚠️ CLIENT ERROR
// - 500-599: ❌ SERVER ERROR
// - anything else (1xx, 3xx, ...): ❓ UNKNOWN
// - no answer at all: Error: ❌ SERVER DOWN
// - an answer that isn't HTTP: Invalid response
//
// Rust concepts:
// - Enums with data: each status bucket carries the status code
// - Display trait: so an outcome can be turned into its log line with format!
// - Range patterns: 200..=299 in a match arm
// =============================================================================

use serde::Serialize;
use std::fmt;
use thiserror::Error;

// The terminal state of one check
//
// #[serde(tag = "outcome")] puts the variant name into an "outcome" field,
// so Success { code: 200 } becomes {"outcome": "success", "code": 200}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// 2xx
    Success { code: u16 },
    /// 4xx
    ClientError { code: u16 },
    /// 5xx
    ServerError { code: u16 },
    /// Any other status code (1xx, 3xx, out of range)
    Unknown { code: u16 },
    /// DNS failure, connection refused, timeout, TLS failure, ...
    ServerDown,
    /// Bytes came back, but not as an HTTP response with a status code
    InvalidResponse,
}

impl CheckOutcome {
    /// Sorts an HTTP status code into its bucket.
    pub fn from_status(code: u16) -> Self {
        match code {
            200..=299 => CheckOutcome::Success { code },
            400..=499 => CheckOutcome::ClientError { code },
            500..=599 => CheckOutcome::ServerError { code },
            _ => CheckOutcome::Unknown { code },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CheckOutcome::Success { .. })
    }

    /// The status code, if a response with one was received
    pub fn code(&self) -> Option<u16> {
        match self {
            CheckOutcome::Success { code }
            | CheckOutcome::ClientError { code }
            | CheckOutcome::ServerError { code }
            | CheckOutcome::Unknown { code } => Some(*code),
            CheckOutcome::ServerDown | CheckOutcome::InvalidResponse => None,
        }
    }
}

// Formats the outcome as the line that goes into the response log
impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Success { code } => write!(f, "✅ SUCCESS: Status code: {}", code),
            CheckOutcome::ClientError { code } => {
                write!(f, "⚠️ CLIENT ERROR: Status code: {}", code)
            }
            CheckOutcome::ServerError { code } => {
                write!(f, "❌ SERVER ERROR: Status code: {}", code)
            }
            CheckOutcome::Unknown { code } => write!(f, "❓ UNKNOWN: Status code: {}", code),
            CheckOutcome::ServerDown => write!(f, "Error: ❌ SERVER DOWN"),
            CheckOutcome::InvalidResponse => write!(f, "Invalid response"),
        }
    }
}

// Errors that stop a check before any request is sent
//
// Network failures are NOT errors here: they become CheckOutcome::ServerDown
// or CheckOutcome::InvalidResponse and end up in the log like any other result.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The target's URL string is not an absolute URL
    #[error("Invalid URL: {url}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The index doesn't point at any target in the list
    #[error("no target #{} (the list has {len})", .index + 1)]
    NoSuchTarget { index: usize, len: usize },
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is 200..=299?
//    - An inclusive range pattern: matches 200, 201, ... 299
//    - 200..299 (without =) would stop at 298
//
// 2. Why derive Copy?
//    - Every variant holds at most a u16, so copying is as cheap as a reference
//    - The outcome can be passed around (and logged) without clone()
//
// 3. What does #[source] do?
//    - thiserror wires the field up as the error's source()
//    - Tools that print error chains (like anyhow) will show the parse error too
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_buckets() {
        assert_eq!(CheckOutcome::from_status(200), CheckOutcome::Success { code: 200 });
        assert_eq!(CheckOutcome::from_status(299), CheckOutcome::Success { code: 299 });
        assert_eq!(CheckOutcome::from_status(404), CheckOutcome::ClientError { code: 404 });
        assert_eq!(CheckOutcome::from_status(499), CheckOutcome::ClientError { code: 499 });
        assert_eq!(CheckOutcome::from_status(500), CheckOutcome::ServerError { code: 500 });
        assert_eq!(CheckOutcome::from_status(599), CheckOutcome::ServerError { code: 599 });
    }

    #[test]
    fn test_everything_else_is_unknown() {
        for code in [100, 101, 199, 300, 302, 399, 600, 999] {
            assert_eq!(CheckOutcome::from_status(code), CheckOutcome::Unknown { code });
        }
    }

    #[test]
    fn test_log_lines() {
        assert_eq!(
            CheckOutcome::from_status(200).to_string(),
            "✅ SUCCESS: Status code: 200"
        );
        assert_eq!(
            CheckOutcome::from_status(404).to_string(),
            "⚠️ CLIENT ERROR: Status code: 404"
        );
        assert_eq!(
            CheckOutcome::from_status(500).to_string(),
            "❌ SERVER ERROR: Status code: 500"
        );
        assert_eq!(
            CheckOutcome::from_status(101).to_string(),
            "❓ UNKNOWN: Status code: 101"
        );
        assert_eq!(CheckOutcome::ServerDown.to_string(), "Error: ❌ SERVER DOWN");
        assert_eq!(CheckOutcome::InvalidResponse.to_string(), "Invalid response");
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(CheckOutcome::from_status(404)).unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "client_error", "code": 404}));

        let json = serde_json::to_value(CheckOutcome::ServerDown).unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "server_down"}));
    }

    #[test]
    fn test_malformed_url_message() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = CheckError::MalformedUrl {
            url: "not a url".to_string(),
            source,
        };
        assert_eq!(err.to_string(), "Invalid URL: not a url");
    }
}
