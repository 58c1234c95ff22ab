//! Recording in-memory backend shared by the compaction unit tests.

use super::backend::{
    BackendError, CompactBackend, CurrentSummary, SavedMigration, UncompactedIssue,
    UncompactedIssues,
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    IsInitialized,
    ListUncompacted,
    GetInstruction,
    GetCompact,
    SaveMigration(String),
    UpdateCompact(String),
    MarkCompacted(Vec<String>),
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub initialized: bool,
    pub issues: Vec<UncompactedIssue>,
    pub instruction: String,
    pub summary: Option<String>,
    pub fail_save: Option<BackendError>,
    pub fail_update: Option<BackendError>,
    pub fail_mark: Option<BackendError>,
    pub calls: Mutex<Vec<Call>>,
}

impl RecordingBackend {
    pub fn initialized() -> Self {
        Self {
            initialized: true,
            instruction: "Compact the issues.".to_string(),
            ..Self::default()
        }
    }

    pub fn with_issues(mut self, issues: Vec<UncompactedIssue>) -> Self {
        self.issues = issues;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }
}

pub fn issue(display_number: u32, title: &str) -> UncompactedIssue {
    UncompactedIssue {
        id: format!("aaaaaaaa-bbbb-4ccc-8ddd-{display_number:012}"),
        display_number,
        title: title.to_string(),
        description: format!("{title} description"),
        status: Some("closed".to_string()),
    }
}

#[async_trait]
impl CompactBackend for RecordingBackend {
    async fn is_initialized(&self, _project_path: &Path) -> Result<bool, BackendError> {
        self.record(Call::IsInitialized);
        Ok(self.initialized)
    }

    async fn list_uncompacted_issues(
        &self,
        _project_path: &Path,
    ) -> Result<UncompactedIssues, BackendError> {
        self.record(Call::ListUncompacted);
        Ok(UncompactedIssues {
            issues: self.issues.clone(),
            total_count: u32::try_from(self.issues.len()).unwrap(),
        })
    }

    async fn get_instruction(&self, _project_path: &Path) -> Result<String, BackendError> {
        self.record(Call::GetInstruction);
        Ok(self.instruction.clone())
    }

    async fn get_compact(&self, _project_path: &Path) -> Result<CurrentSummary, BackendError> {
        self.record(Call::GetCompact);
        Ok(self.summary.clone().map_or_else(CurrentSummary::default, |content| {
            CurrentSummary {
                exists: true,
                content,
            }
        }))
    }

    async fn save_migration(
        &self,
        _project_path: &Path,
        content: &str,
    ) -> Result<SavedMigration, BackendError> {
        self.record(Call::SaveMigration(content.to_string()));
        match &self.fail_save {
            Some(err) => Err(err.clone()),
            None => Ok(SavedMigration {
                filename: "2026-01-02T03-04-05.md".to_string(),
            }),
        }
    }

    async fn update_compact(&self, _project_path: &Path, content: &str) -> Result<(), BackendError> {
        self.record(Call::UpdateCompact(content.to_string()));
        match &self.fail_update {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn mark_issues_compacted(
        &self,
        _project_path: &Path,
        issue_ids: &[String],
    ) -> Result<u32, BackendError> {
        self.record(Call::MarkCompacted(issue_ids.to_vec()));
        match &self.fail_mark {
            Some(err) => Err(err.clone()),
            None => Ok(u32::try_from(issue_ids.len()).unwrap()),
        }
    }
}
