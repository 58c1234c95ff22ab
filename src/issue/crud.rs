use super::id::issue_id_from_filename;
use super::metadata::IssueFrontmatter;
use crate::common::{generate_frontmatter, parse_frontmatter, FrontmatterError};
use crate::manifest::read_manifest;
use crate::utils::{atomic_write, get_issues_path};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum IssueError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Manifest error: {0}")]
    ManifestError(#[from] crate::manifest::ManifestError),
    #[error("YAML frontmatter error: {0}")]
    FrontmatterError(#[from] FrontmatterError),
    #[error("Centy not initialized. Run 'centy init' first.")]
    NotInitialized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub metadata: IssueFrontmatter,
}

/// Read a single `<uuid>.md` issue file.
pub async fn read_issue(issue_file_path: &Path, issue_id: &str) -> Result<Issue, IssueError> {
    let content = fs::read_to_string(issue_file_path).await?;
    let (metadata, title, description): (IssueFrontmatter, String, String) =
        parse_frontmatter(&content)?;
    Ok(Issue {
        id: issue_id.to_string(),
        title,
        description,
        metadata,
    })
}

/// List every non-deleted issue of a project, ordered by display number.
///
/// Files that fail to parse are skipped with a warning rather than failing
/// the whole listing.
pub async fn list_issues(project_path: &Path) -> Result<Vec<Issue>, IssueError> {
    read_manifest(project_path)
        .await?
        .ok_or(IssueError::NotInitialized)?;
    let issues_path = get_issues_path(project_path);
    if !issues_path.exists() {
        return Ok(Vec::new());
    }

    let mut issues = Vec::new();
    let mut entries = fs::read_dir(&issues_path).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(issue_id) = file_name.to_str().and_then(issue_id_from_filename) else {
            continue;
        };
        match read_issue(&entry.path(), issue_id).await {
            Ok(issue) if issue.metadata.deleted_at.is_none() => issues.push(issue),
            Ok(_) => debug!(issue_id, "Skipping soft-deleted issue"),
            Err(e) => warn!(issue_id, error = %e, "Skipping unreadable issue file"),
        }
    }

    // Unnumbered issues sort last
    issues.sort_by_key(|i| (i.metadata.display_number.is_none(), i.metadata.display_number));
    Ok(issues)
}

/// Flip one issue to `compacted`, stamping `compactedAt` and `updatedAt`.
///
/// Returns `Ok(false)` without touching the file when the issue does not
/// exist or is already compacted.
pub async fn mark_issue_compacted(
    project_path: &Path,
    issue_id: &str,
    now: &str,
) -> Result<bool, IssueError> {
    let Some((issue_path, file_id)) = find_issue_file(project_path, issue_id).await? else {
        debug!(issue_id, "No issue file for id; nothing to mark");
        return Ok(false);
    };

    let mut issue = read_issue(&issue_path, &file_id).await?;
    if issue.metadata.compacted {
        debug!(issue_id, "Issue already compacted");
        return Ok(false);
    }

    issue.metadata.compacted = true;
    issue.metadata.compacted_at = Some(now.to_string());
    issue.metadata.updated_at = Some(now.to_string());

    let content = generate_frontmatter(&issue.metadata, &issue.title, &issue.description)?;
    atomic_write(&issue_path, &content).await?;
    Ok(true)
}

/// Locate the file for `issue_id`, matching the UUID case-insensitively.
///
/// Returns the path and the id as spelled in the filename.
async fn find_issue_file(
    project_path: &Path,
    issue_id: &str,
) -> Result<Option<(PathBuf, String)>, IssueError> {
    let issues_path = get_issues_path(project_path);
    let exact = issues_path.join(format!("{issue_id}.md"));
    if exact.is_file() {
        return Ok(Some((exact, issue_id.to_string())));
    }
    if !issues_path.exists() {
        return Ok(None);
    }

    let mut entries = fs::read_dir(&issues_path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name();
        let Some(file_id) = file_name.to_str().and_then(issue_id_from_filename) else {
            continue;
        };
        if file_id.eq_ignore_ascii_case(issue_id) && entry.file_type().await?.is_file() {
            return Ok(Some((entry.path(), file_id.to_string())));
        }
    }
    Ok(None)
}

#[cfg(test)]
#[path = "crud_tests.rs"]
mod crud_tests;
