//! Common test utilities

use centy_compact::common::generate_frontmatter;
use centy_compact::issue::IssueFrontmatter;
use centy_compact::manifest::{create_manifest, write_manifest};
use std::path::Path;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Lay out a minimal initialized project: manifest, issues/ and features/.
pub async fn init_centy_project(project_path: &Path) {
    let centy_path = project_path.join(".centy");
    tokio::fs::create_dir_all(centy_path.join("issues"))
        .await
        .expect("Failed to create issues folder");
    tokio::fs::create_dir_all(centy_path.join("features"))
        .await
        .expect("Failed to create features folder");
    write_manifest(project_path, &create_manifest())
        .await
        .expect("Failed to write manifest");
}

/// Write an issue file and return its id.
pub async fn write_issue(
    project_path: &Path,
    display_number: u32,
    title: &str,
    status: &str,
) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    let metadata = IssueFrontmatter {
        display_number: Some(display_number),
        status: Some(status.to_string()),
        ..IssueFrontmatter::default()
    };
    let content = generate_frontmatter(&metadata, title, &format!("Work done for {title}."))
        .expect("Failed to render issue");
    tokio::fs::write(issue_path(project_path, &id), content)
        .await
        .expect("Failed to write issue");
    id
}

pub fn issue_path(project_path: &Path, id: &str) -> std::path::PathBuf {
    project_path.join(".centy").join("issues").join(format!("{id}.md"))
}

/// Read the raw frontmatter of an issue back.
#[allow(dead_code)] // Not every integration test binary inspects issues
pub async fn read_issue_metadata(project_path: &Path, id: &str) -> IssueFrontmatter {
    let content = tokio::fs::read_to_string(issue_path(project_path, id))
        .await
        .expect("Failed to read issue");
    let (metadata, _title, _body) =
        centy_compact::common::parse_frontmatter::<IssueFrontmatter>(&content)
            .expect("Failed to parse issue");
    metadata
}

/// A well-formed LLM reply naming `ids` in the migration section.
#[allow(dead_code)] // Not every integration test binary applies replies
pub fn llm_reply(ids: &[String], compact: &str) -> String {
    let refs: String = ids.iter().map(|id| format!("  - id: {id}\n")).collect();
    format!(
        "Here is the compaction you asked for.\n\n\
         ### MIGRATION_CONTENT\n\n```yaml\n---\ncompactedIssues:\n{refs}---\n\n## Added\n- Things\n```\n\n\
         ### COMPACT_CONTENT\n\n```markdown\n{compact}\n```\n"
    )
}
