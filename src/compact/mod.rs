//! Feature compaction: fold finished issues into a single features summary
//! with an LLM in the loop.
//!
//! One round trip is two invocations. The first assembles a context document
//! for the LLM; the second applies the LLM's reply by saving a migration
//! record, replacing the summary, and marking the referenced issues.
mod apply;
mod backend;
mod context;
mod dispatch;
mod ids;
mod parser;

#[cfg(test)]
mod test_support;

pub use apply::{apply_compaction, ApplyError, ApplyReport, ApplyStep, NO_ISSUE_IDS_WARNING};
pub use backend::{
    BackendError, CompactBackend, CurrentSummary, SavedMigration, UncompactedIssue,
    UncompactedIssues,
};
pub use context::{
    render_inventory, render_inventory_json, CompactionContext, CONTEXT_TITLE,
    MISSING_SUMMARY_PLACEHOLDER, NOTHING_TO_COMPACT,
};
pub use dispatch::{run_compact, CompactError, CompactMode, CompactOptions, STDIN_PATH};
pub use ids::extract_issue_ids;
pub use parser::{parse_llm_response, ParseError, ParsedResponse, Section};
