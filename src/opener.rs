// src/opener.rs
// =============================================================================
// "Open externally": hands a target's URL to the platform's URL opener
// (the default browser, usually).
//
// The URL is parsed first, so a broken URL is reported as an error instead
// of being passed to the shell.
// =============================================================================

use crate::target::Target;
use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use tracing::debug;
use url::Url;

// Opens the target's URL and returns the parsed URL that was opened
pub fn open_target(target: &Target) -> Result<Url> {
    let url = target.parse_url()?;

    let mut command = opener_command(&url);
    debug!(%url, ?command, "opening externally");

    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to open {}", url))?;

    Ok(url)
}

// Builds the platform's "open this URL" command
fn opener_command(url: &Url) -> Command {
    if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(url.as_str());
        command
    } else if cfg!(target_os = "windows") {
        // The empty "" is the window title `start` expects first
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", url.as_str()]);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(url.as_str());
        command
    }
}
