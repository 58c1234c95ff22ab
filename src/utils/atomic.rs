//! Atomic file write operations.
//!
//! The compact document is replaced wholesale; writing through a temp file in
//! the same directory means readers see either the old or the new document.

use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write content to a file atomically using a temporary file.
///
/// The temp file is created next to the target (required for an atomic
/// rename) and is removed automatically if any step fails.
///
/// # Errors
///
/// Returns an `io::Error` if the parent directory cannot be determined, the
/// temp file cannot be written, or the final rename fails.
pub async fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no parent directory"))?
        .to_path_buf();
    let target_path = path.to_path_buf();
    let content_owned = content.to_string();

    tokio::task::spawn_blocking(move || -> io::Result<()> {
        use std::io::Write;

        let mut temp_file = NamedTempFile::new_in(&parent)?;
        temp_file.write_all(content_owned.as_bytes())?;
        temp_file.flush()?;
        // Consumes the NamedTempFile, preventing auto-deletion
        temp_file.persist(&target_path)?;

        Ok(())
    })
    .await
    .map_err(io::Error::other)?
}
