//! The collaborator seam for compaction.
//!
//! Every persistent effect and every read of project state goes through
//! [`CompactBackend`]. The protocol code never touches the filesystem layout
//! of a project directly, so it can be driven by the local file store, a
//! daemon client, or a recording double in tests.

use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// An issue that has not been folded into the compact document yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncompactedIssue {
    pub id: String,
    /// `0` means the issue has no display number.
    pub display_number: u32,
    pub title: String,
    pub description: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UncompactedIssues {
    pub issues: Vec<UncompactedIssue>,
    pub total_count: u32,
}

/// The current compact document, if one exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentSummary {
    pub exists: bool,
    pub content: String,
}

impl CurrentSummary {
    #[must_use]
    pub fn as_content(&self) -> Option<&str> {
        self.exists.then_some(self.content.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedMigration {
    pub filename: String,
}

/// Uniform failure shape for every collaborator call.
///
/// Whatever error type a backend produces internally is flattened into a
/// stable code plus a human-readable message before it reaches the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub code: String,
    pub message: String,
}

impl BackendError {
    #[must_use]
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Normalise any displayable failure into a `BackendError`.
    #[must_use]
    pub fn from_display<E: fmt::Display + ?Sized>(code: &str, err: &E) -> Self {
        Self::new(code, err.to_string())
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BackendError {}

/// Operations the compaction flow consumes from the project store.
#[async_trait]
pub trait CompactBackend: Send + Sync {
    /// Whether the project has been initialized.
    async fn is_initialized(&self, project_path: &Path) -> Result<bool, BackendError>;

    async fn list_uncompacted_issues(
        &self,
        project_path: &Path,
    ) -> Result<UncompactedIssues, BackendError>;

    /// Instructions handed to the LLM; backends fall back to a default text.
    async fn get_instruction(&self, project_path: &Path) -> Result<String, BackendError>;

    async fn get_compact(&self, project_path: &Path) -> Result<CurrentSummary, BackendError>;

    /// Append a migration record and return the name it was stored under.
    async fn save_migration(
        &self,
        project_path: &Path,
        content: &str,
    ) -> Result<SavedMigration, BackendError>;

    /// Replace the compact document wholesale.
    async fn update_compact(&self, project_path: &Path, content: &str)
        -> Result<(), BackendError>;

    /// Mark issues as compacted. Returns how many issues changed state.
    async fn mark_issues_compacted(
        &self,
        project_path: &Path,
        issue_ids: &[String],
    ) -> Result<u32, BackendError>;
}
