// src/target.rs
// =============================================================================
// A target is one site the user can check: a display name plus a URL.
//
// The list of targets is seeded once at startup (either the built-in list
// below or the one from the config file). Afterwards only the names change.
// =============================================================================

use crate::checker::CheckError;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Display label, editable by the user
    pub name: String,
    /// Expected to be an absolute URL, but not validated until it's used
    pub url: String,
}

impl Target {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Target {
            name: name.into(),
            url: url.into(),
        }
    }

    // Parses the URL string
    //
    // Both the check and the "open externally" action go through here,
    // so neither of them can panic on a bad URL.
    pub fn parse_url(&self) -> Result<Url, CheckError> {
        Url::parse(&self.url).map_err(|source| CheckError::MalformedUrl {
            url: self.url.clone(),
            source,
        })
    }
}

// The sites that are seeded when no config file is given
pub fn default_targets() -> Vec<Target> {
    vec![
        Target::new("Homepage", "https://ksbrwsk.de"),
        Target::new("QR Code Generator", "https://ksbrwsk.de:9080"),
        Target::new("Vokabeltrainer", "https://ksbrwsk.de:8080"),
        Target::new("App Status", "https://ksbrwsk.de:9060"),
        Target::new("Free TV Player", "https://ksbrwsk.de:9070"),
    ]
}
