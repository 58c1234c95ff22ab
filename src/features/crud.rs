use crate::issue::{list_issues, mark_issue_compacted, Issue, IssueError};
use crate::manifest::{read_manifest, touch_manifest, CentyManifest};
use crate::utils::{atomic_write, get_features_path, now_iso};
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

use super::instruction::DEFAULT_INSTRUCTION_CONTENT;

/// Upper bound on `-N` suffixes tried when several migrations land in the
/// same second.
const MAX_MIGRATION_SUFFIX: u32 = 1000;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Manifest error: {0}")]
    ManifestError(#[from] crate::manifest::ManifestError),

    #[error("Issue error: {0}")]
    IssueError(#[from] IssueError),

    #[error("Centy not initialized. Run 'centy init' first.")]
    NotInitialized,

    #[error("Features not initialized")]
    FeaturesNotInitialized,

    #[error("Could not allocate a migration filename for {0}")]
    MigrationNameExhausted(String),
}

async fn require_manifest(project_path: &Path) -> Result<CentyManifest, FeatureError> {
    read_manifest(project_path)
        .await?
        .ok_or(FeatureError::NotInitialized)
}

/// List all issues that have not been compacted yet
pub async fn list_uncompacted_issues(project_path: &Path) -> Result<Vec<Issue>, FeatureError> {
    let all_issues = list_issues(project_path).await.map_err(|e| match e {
        IssueError::NotInitialized => FeatureError::NotInitialized,
        other => FeatureError::IssueError(other),
    })?;

    Ok(all_issues
        .into_iter()
        .filter(|issue| !issue.metadata.compacted)
        .collect())
}

/// Get the current compact.md content
pub async fn get_compact(project_path: &Path) -> Result<Option<String>, FeatureError> {
    require_manifest(project_path).await?;

    let compact_path = get_features_path(project_path).join("compact.md");
    if !compact_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&compact_path).await?;
    Ok(Some(content))
}

/// Replace compact.md wholesale
pub async fn update_compact(project_path: &Path, content: &str) -> Result<(), FeatureError> {
    let manifest = require_manifest(project_path).await?;

    let features_path = get_features_path(project_path);
    if !features_path.exists() {
        return Err(FeatureError::FeaturesNotInitialized);
    }

    atomic_write(&features_path.join("compact.md"), content).await?;
    touch_manifest(project_path, manifest).await?;

    info!(bytes = content.len(), "Replaced compact.md");
    Ok(())
}

/// Get the instruction.md content, or the built-in default
pub async fn get_instruction(project_path: &Path) -> Result<String, FeatureError> {
    require_manifest(project_path).await?;

    let instruction_path = get_features_path(project_path).join("instruction.md");
    if !instruction_path.exists() {
        debug!("instruction.md not found; using default instructions");
        return Ok(DEFAULT_INSTRUCTION_CONTENT.to_string());
    }

    let content = fs::read_to_string(&instruction_path).await?;
    Ok(content)
}

/// Save a migration record under a timestamped filename.
///
/// Records are append-only: an existing file is never overwritten, a `-N`
/// suffix is added instead. Returns the filename and the project-relative path.
pub async fn save_migration(
    project_path: &Path,
    content: &str,
) -> Result<(String, String), FeatureError> {
    let manifest = require_manifest(project_path).await?;

    let migrations_path = get_features_path(project_path).join("migrations");
    fs::create_dir_all(&migrations_path).await?;

    let stem = migration_stem(&now_iso());
    let filename = write_new_migration(&migrations_path, &stem, content).await?;

    touch_manifest(project_path, manifest).await?;

    let relative_path = format!(".centy/features/migrations/{filename}");
    info!(%relative_path, "Saved migration record");
    Ok((filename, relative_path))
}

async fn write_new_migration(
    migrations_path: &Path,
    stem: &str,
    content: &str,
) -> Result<String, FeatureError> {
    use tokio::io::AsyncWriteExt;

    for suffix in 0..=MAX_MIGRATION_SUFFIX {
        let filename = migration_filename(stem, suffix);
        let open = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(migrations_path.join(&filename))
            .await;
        match open {
            Ok(mut file) => {
                file.write_all(content.as_bytes()).await?;
                file.flush().await?;
                return Ok(filename);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(FeatureError::MigrationNameExhausted(stem.to_string()))
}

/// Mark issues as compacted. Unknown ids and already-compacted issues are
/// skipped, so re-running after a partial failure is safe.
pub async fn mark_issues_compacted(
    project_path: &Path,
    issue_ids: &[String],
) -> Result<u32, FeatureError> {
    let manifest = require_manifest(project_path).await?;

    let now = now_iso();
    let mut marked_count: u32 = 0;
    for issue_id in issue_ids {
        if mark_issue_compacted(project_path, issue_id, &now).await? {
            marked_count = marked_count.saturating_add(1);
        }
    }

    touch_manifest(project_path, manifest).await?;
    Ok(marked_count)
}

/// Convert an ISO timestamp to a filename-safe stem.
///
/// `2025-12-06T19:30:00.123456+00:00` -> `2025-12-06T19-30-00`
fn migration_stem(timestamp: &str) -> String {
    timestamp
        .chars()
        .take(19)
        .map(|c| if c == ':' { '-' } else { c })
        .collect()
}

fn migration_filename(stem: &str, suffix: u32) -> String {
    if suffix == 0 {
        format!("{stem}.md")
    } else {
        format!("{stem}-{suffix}.md")
    }
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod crud_tests;
