mod types;

pub use types::CentyManifest;

use crate::utils::{get_manifest_path, now_iso, CENTY_VERSION};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Read the manifest from the project path
pub async fn read_manifest(project_path: &Path) -> Result<Option<CentyManifest>, ManifestError> {
    let manifest_path = get_manifest_path(project_path);

    if !manifest_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&manifest_path).await?;
    let manifest: CentyManifest = serde_json::from_str(&content)?;
    Ok(Some(manifest))
}

/// Write the manifest to the project path
pub async fn write_manifest(
    project_path: &Path,
    manifest: &CentyManifest,
) -> Result<(), ManifestError> {
    let manifest_path = get_manifest_path(project_path);
    let content = serde_json::to_string_pretty(manifest)?;
    fs::write(&manifest_path, content).await?;
    Ok(())
}

/// Create a new empty manifest
#[must_use]
pub fn create_manifest() -> CentyManifest {
    let now = now_iso();
    CentyManifest {
        schema_version: 1,
        centy_version: CENTY_VERSION.to_string(),
        created_at: now.clone(),
        updated_at: now,
    }
}

/// Bump the manifest's `updatedAt` and write it back.
pub async fn touch_manifest(
    project_path: &Path,
    mut manifest: CentyManifest,
) -> Result<(), ManifestError> {
    manifest.updated_at = now_iso();
    write_manifest(project_path, &manifest).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_manifest() {
        let manifest = create_manifest();

        assert_eq!(manifest.schema_version, 1);
        assert_eq!(manifest.centy_version, CENTY_VERSION);
        assert!(!manifest.created_at.is_empty());
        assert_eq!(manifest.created_at, manifest.updated_at);
    }

    #[tokio::test]
    async fn test_read_manifest_missing_returns_none() {
        let temp_dir = tempdir().expect("Should create temp dir");
        let manifest = read_manifest(temp_dir.path())
            .await
            .expect("Missing manifest is not an error");
        assert!(manifest.is_none());
    }

    #[tokio::test]
    async fn test_write_and_read_manifest() {
        let manifest = create_manifest();
        let temp_dir = tempdir().expect("Should create temp dir");
        fs::create_dir_all(temp_dir.path().join(".centy"))
            .await
            .expect("Should create .centy dir");

        write_manifest(temp_dir.path(), &manifest)
            .await
            .expect("Should write manifest");

        let read_back = read_manifest(temp_dir.path())
            .await
            .expect("Should read manifest")
            .expect("Manifest should exist");
        assert_eq!(read_back, manifest);
    }

    #[tokio::test]
    async fn test_touch_manifest_bumps_updated_at() {
        let temp_dir = tempdir().expect("Should create temp dir");
        fs::create_dir_all(temp_dir.path().join(".centy"))
            .await
            .expect("Should create .centy dir");
        let mut manifest = create_manifest();
        manifest.updated_at = "2020-01-01T00:00:00+00:00".to_string();

        touch_manifest(temp_dir.path(), manifest.clone())
            .await
            .expect("Should touch manifest");

        let read_back = read_manifest(temp_dir.path())
            .await
            .expect("Should read manifest")
            .expect("Manifest should exist");
        assert_eq!(read_back.created_at, manifest.created_at);
        assert_ne!(read_back.updated_at, manifest.updated_at);
    }
}
