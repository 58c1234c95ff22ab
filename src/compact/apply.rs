//! Commits a parsed LLM reply to the project.
//!
//! The three effects run strictly in [`ApplyStep::ORDER`] and the runner
//! stops at the first failure. Nothing is compensated: a migration record
//! saved before a later failure stays on disk, so the audit trail always
//! shows what was attempted.

use super::backend::{BackendError, CompactBackend};
use super::parser::ParsedResponse;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

pub const NO_ISSUE_IDS_WARNING: &str =
    "No issue IDs found in migration; issues not marked as compacted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStep {
    SaveMigration,
    UpdateSummary,
    MarkCompacted,
}

impl ApplyStep {
    pub const ORDER: [ApplyStep; 3] = [
        ApplyStep::SaveMigration,
        ApplyStep::UpdateSummary,
        ApplyStep::MarkCompacted,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ApplyStep::SaveMigration => "save-migration",
            ApplyStep::UpdateSummary => "update-summary",
            ApplyStep::MarkCompacted => "mark-compacted",
        }
    }

    /// Prefix used when this step fails, e.g. `Failed to save migration`.
    #[must_use]
    pub fn failure_prefix(self) -> &'static str {
        match self {
            ApplyStep::SaveMigration => "Failed to save migration",
            ApplyStep::UpdateSummary => "Failed to update summary",
            ApplyStep::MarkCompacted => "Failed to mark issues as compacted",
        }
    }
}

impl fmt::Display for ApplyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one successful step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Skipped { reason: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("{}: {error}", .step.failure_prefix())]
    Step {
        step: ApplyStep,
        error: BackendError,
    },
}

impl ApplyError {
    #[must_use]
    pub fn step(&self) -> ApplyStep {
        match self {
            ApplyError::Step { step, .. } => *step,
        }
    }
}

/// What a completed apply did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub migration_filename: Option<String>,
    /// `None` when marking was skipped.
    pub marked_count: Option<u32>,
    pub warnings: Vec<String>,
}

impl ApplyReport {
    /// The single confirmation line printed after a successful apply.
    #[must_use]
    pub fn confirmation(&self) -> String {
        let migration = self.migration_filename.as_deref().unwrap_or("-");
        match self.marked_count {
            Some(count) => format!(
                "Compaction applied: migration saved as {migration}, summary updated, \
                 {count} issue(s) marked as compacted"
            ),
            None => format!(
                "Compaction applied: migration saved as {migration}, summary updated, \
                 no issues marked"
            ),
        }
    }
}

/// Run every step in order against `backend`, stopping at the first failure.
pub async fn apply_compaction(
    backend: &dyn CompactBackend,
    project_path: &Path,
    parsed: &ParsedResponse,
) -> Result<ApplyReport, ApplyError> {
    let mut report = ApplyReport::default();

    for step in ApplyStep::ORDER {
        match run_step(step, backend, project_path, parsed, &mut report).await {
            Ok(StepOutcome::Completed) => info!(%step, "Compaction step completed"),
            Ok(StepOutcome::Skipped { reason }) => {
                warn!(%step, "{reason}");
                report.warnings.push(reason.to_string());
            }
            Err(err) => {
                error!(%step, code = %err.code, error = %err, "Compaction step failed");
                return Err(ApplyError::Step { step, error: err });
            }
        }
    }

    Ok(report)
}

async fn run_step(
    step: ApplyStep,
    backend: &dyn CompactBackend,
    project_path: &Path,
    parsed: &ParsedResponse,
    report: &mut ApplyReport,
) -> Result<StepOutcome, BackendError> {
    match step {
        ApplyStep::SaveMigration => {
            let saved = backend
                .save_migration(project_path, &parsed.migration.raw_content)
                .await?;
            report.migration_filename = Some(saved.filename);
            Ok(StepOutcome::Completed)
        }
        ApplyStep::UpdateSummary => {
            backend
                .update_compact(project_path, &parsed.compact.raw_content)
                .await?;
            Ok(StepOutcome::Completed)
        }
        ApplyStep::MarkCompacted => {
            if parsed.migration.issue_ids.is_empty() {
                return Ok(StepOutcome::Skipped {
                    reason: NO_ISSUE_IDS_WARNING,
                });
            }
            let issue_ids: Vec<String> = parsed.migration.issue_ids.iter().cloned().collect();
            let marked = backend
                .mark_issues_compacted(project_path, &issue_ids)
                .await?;
            report.marked_count = Some(marked);
            Ok(StepOutcome::Completed)
        }
    }
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod apply_tests;
