//! Rendering of the compaction context handed to the LLM, and of the terse
//! inventory shown to humans.

use super::backend::{UncompactedIssue, UncompactedIssues};
use serde::Serialize;

pub const CONTEXT_TITLE: &str = "# Feature Compaction Context";
pub const MISSING_SUMMARY_PLACEHOLDER: &str =
    "_No compact.md exists yet. This is the first compaction._";
pub const NOTHING_TO_COMPACT: &str = "No uncompacted issues found. Nothing to compact.";

const UNKNOWN_STATUS: &str = "unknown";

/// Everything the LLM needs for one compaction round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactionContext {
    pub instructions: String,
    /// `None` when the project has no compact document yet.
    pub current_summary: Option<String>,
    pub issues: Vec<UncompactedIssue>,
}

impl CompactionContext {
    /// Render the full context document: title, instructions, current
    /// summary, then one block per issue, always in that order.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = vec![
            CONTEXT_TITLE.to_string(),
            String::new(),
            "## Instructions".to_string(),
            String::new(),
            self.instructions.trim_end().to_string(),
            String::new(),
            "## Current Features Summary".to_string(),
            String::new(),
            self.current_summary
                .as_deref()
                .map_or(MISSING_SUMMARY_PLACEHOLDER, str::trim_end)
                .to_string(),
            String::new(),
            format!("## Uncompacted Issues ({})", self.issues.len()),
            String::new(),
        ];
        for issue in &self.issues {
            lines.extend(issue_block(issue));
        }

        let mut doc = lines.join("\n");
        doc.push('\n');
        doc
    }
}

fn issue_block(issue: &UncompactedIssue) -> Vec<String> {
    let heading = match display_number(issue) {
        Some(n) => format!("### #{n} {}", issue.title),
        None => format!("### {}", issue.title),
    };
    let mut block = vec![
        heading,
        String::new(),
        format!("- **ID**: {}", issue.id),
        format!("- **Status**: {}", status_label(issue)),
        String::new(),
    ];
    let description = issue.description.trim();
    if !description.is_empty() {
        block.push(description.to_string());
        block.push(String::new());
    }
    block.push("---".to_string());
    block.push(String::new());
    block
}

fn display_number(issue: &UncompactedIssue) -> Option<u32> {
    (issue.display_number != 0).then_some(issue.display_number)
}

fn status_label(issue: &UncompactedIssue) -> &str {
    issue
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(UNKNOWN_STATUS)
}

/// `#<displayNumber> [<status>] <title>`
#[must_use]
pub fn inventory_line(issue: &UncompactedIssue) -> String {
    let number = display_number(issue).map_or_else(|| "-".to_string(), |n| n.to_string());
    format!("#{number} [{}] {}", status_label(issue), issue.title)
}

/// Human inventory: a count header plus one line per issue, or a single
/// notice when there is nothing to compact.
#[must_use]
pub fn render_inventory(listing: &UncompactedIssues) -> String {
    if listing.issues.is_empty() {
        return NOTHING_TO_COMPACT.to_string();
    }
    let count = usize::try_from(listing.total_count)
        .unwrap_or(usize::MAX)
        .max(listing.issues.len());
    let mut lines = vec![format!("Uncompacted issues ({count}):")];
    lines.extend(listing.issues.iter().map(inventory_line));
    lines.join("\n")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry<'issue> {
    pub id: &'issue str,
    pub display_number: u32,
    pub title: &'issue str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'issue str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport<'issue> {
    pub issues: Vec<InventoryEntry<'issue>>,
    pub total_count: u32,
}

/// Machine-readable inventory. Emitted even when there are no issues so
/// scripts always receive JSON.
pub fn render_inventory_json(listing: &UncompactedIssues) -> Result<String, serde_json::Error> {
    let report = InventoryReport {
        issues: listing
            .issues
            .iter()
            .map(|issue| InventoryEntry {
                id: &issue.id,
                display_number: issue.display_number,
                title: &issue.title,
                status: issue.status.as_deref(),
            })
            .collect(),
        total_count: listing.total_count,
    };
    serde_json::to_string_pretty(&report)
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod context_tests;
