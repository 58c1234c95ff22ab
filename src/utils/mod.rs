mod atomic;

pub use atomic::atomic_write;

use std::path::{Path, PathBuf};

/// The name of the centy folder
pub const CENTY_FOLDER: &str = ".centy";

/// The name of the manifest file
pub const MANIFEST_FILE: &str = ".centy-manifest.json";

/// Current centy version
pub const CENTY_VERSION: &str = "0.1.0";

/// Get the path to the .centy folder
#[must_use]
pub fn get_centy_path(project_path: &Path) -> PathBuf {
    project_path.join(CENTY_FOLDER)
}

/// Get the path to the manifest file
#[must_use]
pub fn get_manifest_path(project_path: &Path) -> PathBuf {
    get_centy_path(project_path).join(MANIFEST_FILE)
}

/// Get the path to the features folder (`.centy/features`)
#[must_use]
pub fn get_features_path(project_path: &Path) -> PathBuf {
    get_centy_path(project_path).join("features")
}

/// Get the path to the issues folder (`.centy/issues`)
#[must_use]
pub fn get_issues_path(project_path: &Path) -> PathBuf {
    get_centy_path(project_path).join("issues")
}

/// Get current timestamp in ISO 8601 format
#[must_use]
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Format a path for display, replacing home directory with ~/
#[must_use]
pub fn format_display_path(path: &str) -> String {
    replace_homedir::replace_homedir(path, "~")
}
