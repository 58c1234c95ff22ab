//! Issue ID utilities for UUID-named issue files.
use uuid::Uuid;

/// Check if a string is a valid UUID
#[must_use]
pub fn is_uuid(s: &str) -> bool {
    Uuid::parse_str(s).is_ok()
}

/// Extract the issue ID from a markdown filename (removes .md extension)
#[must_use]
pub fn issue_id_from_filename(name: &str) -> Option<&str> {
    let id = name.strip_suffix(".md")?;
    if is_uuid(id) {
        Some(id)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
