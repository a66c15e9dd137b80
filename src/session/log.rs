// src/session/log.rs
// =============================================================================
// The response log: the block of text the user watches while checking sites.
//
// It's a single String. Lines are joined with '\n'. An empty log is shown
// as "No responses yet".
// =============================================================================

/// Shown in place of an empty log
pub const PLACEHOLDER: &str = "No responses yet";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseLog {
    text: String,
}

impl ResponseLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line. No leading newline when the log is empty.
    pub fn append(&mut self, line: &str) {
        if self.text.is_empty() {
            self.text = line.to_string();
        } else {
            self.text.push('\n');
            self.text.push_str(line);
        }
    }

    /// Throws away everything and starts over with `text`.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// What the user sees: the text, or the placeholder.
    pub fn render(&self) -> &str {
        if self.is_empty() {
            PLACEHOLDER
        } else {
            self.as_str()
        }
    }
}
