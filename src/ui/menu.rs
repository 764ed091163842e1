//! Text rendering of crawl results
//!
//! Formats the result list as the compact listing and the numbered
//! selection menu, and summarises a finished crawl.

use crate::crawler::CrawlReport;
use crate::state::ResultList;

/// Longest file name shown in the menu before truncation
pub const MAX_DISPLAY_NAME: usize = 60;

const RULE_WIDTH: usize = 70;

/// Truncates a name to `max` characters, appending `...` when shortened
pub fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let mut truncated: String = name.chars().take(max).collect();
    truncated.push_str("...");
    truncated
}

/// Formats the compact listing printed right after a crawl
pub fn format_compact(results: &ResultList) -> String {
    let mut out = String::new();
    out.push_str("\nCompact results:\n");
    out.push_str("[No.]  FILE NAME\n\n");
    for (i, candidate) in results.iter().enumerate() {
        out.push_str(&format!("[{:2}]  {}\n", i + 1, candidate.name));
    }
    out
}

/// Formats the numbered selection menu
pub fn format_menu(results: &ResultList) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let mut out = String::new();
    out.push('\n');
    out.push_str(&heavy);
    out.push_str("\n         DOWNLOADS FOUND\n");
    out.push_str(&heavy);
    out.push_str("\n     [No.] | FILE NAME\n");
    out.push_str(&light);
    out.push('\n');
    for (i, candidate) in results.iter().enumerate() {
        out.push_str(&format!(
            "    [{:2}] | {}\n",
            i + 1,
            truncate_name(&candidate.name, MAX_DISPLAY_NAME)
        ));
    }
    out.push_str(&light);
    out.push('\n');
    out
}

/// Formats the closing summary of a crawl
pub fn format_crawl_summary(report: &CrawlReport) -> String {
    let mut out = format!(
        "[*] Crawl {}: {} pages crawled, {} downloads found",
        report.state,
        report.pages_processed,
        report.results.len()
    );
    if !report.failures.is_empty() {
        out.push_str(&format!(", {} pages failed", report.failures.len()));
    }
    if report.is_interrupted() {
        out.push_str(" (partial results)");
    }
    out.push('\n');
    out
}
