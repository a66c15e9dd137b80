// src/output.rs
// =============================================================================
// Printing helpers: target lists, check reports and the response log.
//
// Everything here writes to stdout. Diagnostics go through tracing to
// stderr, so `--json` output stays clean.
// =============================================================================

use crate::checker::CheckReport;
use crate::session::Controller;
use crate::target::Target;
use anyhow::Result;

// Prints the targets, numbered from 1
pub fn print_targets(targets: &[Target], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(targets)?);
        return Ok(());
    }

    println!("{:<4} {:<24} {}", "#", "NAME", "URL");
    println!("{}", "=".repeat(70));
    for (i, target) in targets.iter().enumerate() {
        println!("{:<4} {:<24} {}", i + 1, truncate(&target.name, 24), target.url);
    }
    Ok(())
}

pub fn print_report(report: &CheckReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

// Prints the results of `check-all` either as a table or JSON
pub fn print_reports(reports: &[CheckReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else {
        print_table(reports);
    }
    Ok(())
}

fn print_table(reports: &[CheckReport]) {
    println!("{:<24} {:<40} {:<8} {}", "NAME", "URL", "STATUS", "RESULT");
    println!("{}", "=".repeat(110));

    for report in reports {
        let status = report
            .outcome
            .and_then(|o| o.code())
            .map(|code| code.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<24} {:<40} {:<8} {}",
            truncate(&report.name, 24),
            truncate(&report.url, 40),
            status,
            report.line
        );
    }

    println!();

    let ok_count = reports.iter().filter(|r| r.is_ok()).count();
    let failing = reports.len() - ok_count;

    println!("📊 Summary:");
    println!("   ✅ OK: {}", ok_count);
    println!("   ❌ Failing: {}", failing);
    println!("   📋 Total: {}", reports.len());
}

// Prints the response log the way the session shows it
pub fn print_log(controller: &Controller) {
    println!("{}", "-".repeat(40));
    println!("{}", controller.state().log().render());
    if controller.is_pending() {
        println!("⏳ waiting for a response...");
    }
    println!("{}", "-".repeat(40));
}

// Shortens `text` to `max` characters, ending in "..." when cut
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Homepage", 24), "Homepage");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        // Counts characters, not bytes
        assert_eq!(truncate("äöüäöüäöü", 6), "äöü...");
    }
}
