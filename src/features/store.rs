use super::crud::{
    get_compact, get_instruction, list_uncompacted_issues, mark_issues_compacted,
    save_migration, update_compact, FeatureError,
};
use crate::compact::{
    BackendError, CompactBackend, CurrentSummary, SavedMigration, UncompactedIssue,
    UncompactedIssues,
};
use crate::utils::get_manifest_path;
use async_trait::async_trait;
use std::path::Path;

/// [`CompactBackend`] backed by the project's own `.centy/` folder.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFeatureStore;

impl LocalFeatureStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl From<FeatureError> for BackendError {
    fn from(err: FeatureError) -> Self {
        let code = match &err {
            FeatureError::IoError(_) => "IO_ERROR",
            FeatureError::ManifestError(_) => "MANIFEST_ERROR",
            FeatureError::IssueError(_) => "ISSUE_ERROR",
            FeatureError::NotInitialized => "NOT_INITIALIZED",
            FeatureError::FeaturesNotInitialized => "FEATURES_NOT_INITIALIZED",
            FeatureError::MigrationNameExhausted(_) => "MIGRATION_NAME_EXHAUSTED",
        };
        BackendError::from_display(code, &err)
    }
}

#[async_trait]
impl CompactBackend for LocalFeatureStore {
    async fn is_initialized(&self, project_path: &Path) -> Result<bool, BackendError> {
        Ok(get_manifest_path(project_path).exists())
    }

    async fn list_uncompacted_issues(
        &self,
        project_path: &Path,
    ) -> Result<UncompactedIssues, BackendError> {
        let issues: Vec<UncompactedIssue> = list_uncompacted_issues(project_path)
            .await?
            .into_iter()
            .map(|issue| UncompactedIssue {
                id: issue.id,
                display_number: issue.metadata.display_number.unwrap_or(0),
                title: issue.title,
                description: issue.description,
                status: issue.metadata.status,
            })
            .collect();
        let total_count = u32::try_from(issues.len()).unwrap_or(u32::MAX);
        Ok(UncompactedIssues {
            issues,
            total_count,
        })
    }

    async fn get_instruction(&self, project_path: &Path) -> Result<String, BackendError> {
        Ok(get_instruction(project_path).await?)
    }

    async fn get_compact(&self, project_path: &Path) -> Result<CurrentSummary, BackendError> {
        Ok(match get_compact(project_path).await? {
            Some(content) => CurrentSummary {
                exists: true,
                content,
            },
            None => CurrentSummary::default(),
        })
    }

    async fn save_migration(
        &self,
        project_path: &Path,
        content: &str,
    ) -> Result<SavedMigration, BackendError> {
        let (filename, _relative_path) = save_migration(project_path, content).await?;
        Ok(SavedMigration { filename })
    }

    async fn update_compact(
        &self,
        project_path: &Path,
        content: &str,
    ) -> Result<(), BackendError> {
        Ok(update_compact(project_path, content).await?)
    }

    async fn mark_issues_compacted(
        &self,
        project_path: &Path,
        issue_ids: &[String],
    ) -> Result<u32, BackendError> {
        Ok(mark_issues_compacted(project_path, issue_ids).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_error_maps_to_stable_codes() {
        let err: BackendError = FeatureError::NotInitialized.into();
        assert_eq!(err.code, "NOT_INITIALIZED");
        assert_eq!(err.message, "Centy not initialized. Run 'centy init' first.");

        let err: BackendError = FeatureError::FeaturesNotInitialized.into();
        assert_eq!(err.code, "FEATURES_NOT_INITIALIZED");
    }

    #[tokio::test]
    async fn test_is_initialized_false_for_empty_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = LocalFeatureStore::new();
        assert!(!store.is_initialized(dir.path()).await.unwrap());
    }
}
